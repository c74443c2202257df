use eframe::egui;

/// Square toolbar button showing a single glyph, greyed out when disabled
pub struct IconButton {
    pub icon: &'static str,
    pub tooltip: &'static str,
    pub enabled: bool,
    pub active: bool,
}

impl IconButton {
    pub fn new(icon: &'static str, tooltip: &'static str) -> Self {
        Self {
            icon,
            tooltip,
            enabled: true,
            active: false,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Highlight, e.g. while a job started from this button is running
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let button_size = egui::vec2(32.0, 32.0);
        let sense = if self.enabled {
            egui::Sense::click()
        } else {
            egui::Sense::hover()
        };
        let (rect, response) = ui.allocate_exact_size(button_size, sense);

        if ui.is_rect_visible(rect) {
            let bg_color = if self.active {
                egui::Color32::from_rgb(100, 181, 246)
            } else if self.enabled && response.hovered() {
                egui::Color32::from_gray(40)
            } else {
                egui::Color32::from_gray(30)
            };
            ui.painter().rect_filled(rect, 4.0, bg_color);

            let text_color = match (self.enabled, self.active) {
                (false, _) => egui::Color32::from_gray(90),
                (true, true) => egui::Color32::BLACK,
                (true, false) => egui::Color32::WHITE,
            };
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                self.icon,
                egui::FontId::proportional(20.0),
                text_color,
            );

            if self.active {
                ui.painter().rect_stroke(
                    rect,
                    4.0,
                    egui::Stroke::new(2.0, egui::Color32::from_rgb(33, 150, 243)),
                );
            }
        }

        response.on_hover_text(self.tooltip)
    }
}
