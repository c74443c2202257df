use crate::ComposeApp;
use crate::components::IconButton;

/// What the user asked for from the toolbar this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    Export,
    Generate,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    ResizeCanvas,
}

pub fn toolbar(app: &mut ComposeApp, ctx: &egui::Context) -> Option<ToolbarAction> {
    let mut action = None;

    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let has_layers = !app.state.document().is_empty();
            let generating = app.state.is_generating();

            if IconButton::new("💾", "Export PNG")
                .enabled(has_layers)
                .show(ui)
                .clicked()
            {
                action = Some(ToolbarAction::Export);
            }

            let can_generate = app.generator.is_some() && has_layers && !generating;
            let tooltip = if app.generator.is_some() {
                "Generate from the composite"
            } else {
                "No generation backend configured"
            };
            if IconButton::new("✨", tooltip)
                .enabled(can_generate)
                .active(generating)
                .show(ui)
                .clicked()
            {
                action = Some(ToolbarAction::Generate);
            }

            ui.separator();

            if IconButton::new("➖", "Zoom out").show(ui).clicked() {
                action = Some(ToolbarAction::ZoomOut);
            }
            if ui
                .button(format!("{:.0}%", app.view.zoom() * 100.0))
                .on_hover_text("Reset zoom")
                .clicked()
            {
                action = Some(ToolbarAction::ZoomReset);
            }
            if IconButton::new("➕", "Zoom in").show(ui).clicked() {
                action = Some(ToolbarAction::ZoomIn);
            }

            ui.separator();

            let doc = app.state.document();
            if ui
                .button(format!("{} × {}", doc.width(), doc.height()))
                .on_hover_text("Resize canvas")
                .clicked()
            {
                action = Some(ToolbarAction::ResizeCanvas);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if generating {
                    ui.spinner();
                }
                ui.label(&app.status);
            });
        });
    });

    action
}
