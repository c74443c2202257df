use egui::Vec2;

use crate::ComposeApp;
use crate::command::Command;
use crate::document::Document;

const NUDGE_STEP: f32 = 1.0;

/// Side panel listing layers topmost first, with per-layer actions and the
/// selected layer's properties. Returns the commands the user triggered.
pub fn layers_panel(app: &mut ComposeApp, ctx: &egui::Context) -> Vec<Command> {
    let mut commands = Vec::new();

    egui::SidePanel::right("layers_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Layers");
            ui.separator();

            let doc = app.state.document();
            if doc.is_empty() {
                ui.label("Drop images onto the window to add layers.");
                return;
            }

            egui::ScrollArea::vertical()
                .max_height(ui.available_height() * 0.6)
                .show(ui, |ui| layer_list(ui, doc, &mut commands));

            ui.separator();
            selected_properties(ui, doc, &mut commands);
        });

    commands
}

/// Layers in display order (topmost first) paired with their store index
fn display_order(doc: &Document) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..doc.len()).collect();
    indices.sort_by_key(|&i| std::cmp::Reverse(doc.layers()[i].z_index));
    indices
}

fn layer_list(ui: &mut egui::Ui, doc: &Document, commands: &mut Vec<Command>) {
    let last = doc.len() - 1;
    for index in display_order(doc) {
        let layer = &doc.layers()[index];
        ui.horizontal(|ui| {
            let mut visible = layer.visible;
            if ui.checkbox(&mut visible, "").on_hover_text("Visible").changed() {
                commands.push(Command::ToggleVisibility(layer.id.clone()));
            }

            let label = format!("Layer {}", layer.id.short_name());
            if ui.selectable_label(doc.is_selected(&layer.id), label).clicked() {
                commands.push(Command::SelectLayer(Some(layer.id.clone())));
            }

            if ui.add_enabled(index < last, egui::Button::new("⬆")).clicked() {
                commands.push(Command::ReorderLayer {
                    from: index,
                    to: index + 1,
                });
            }
            if ui.add_enabled(index > 0, egui::Button::new("⬇")).clicked() {
                commands.push(Command::ReorderLayer {
                    from: index,
                    to: index - 1,
                });
            }
            if ui.small_button("📋").on_hover_text("Duplicate").clicked() {
                commands.push(Command::DuplicateLayer(layer.id.clone()));
            }
            if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                commands.push(Command::DeleteLayer(layer.id.clone()));
            }
        });
    }
}

fn selected_properties(ui: &mut egui::Ui, doc: &Document, commands: &mut Vec<Command>) {
    let Some(layer) = doc.selected() else {
        ui.label("No layer selected");
        return;
    };

    egui::Grid::new("layer_properties")
        .num_columns(2)
        .spacing([12.0, 4.0])
        .show(ui, |ui| {
            ui.label("Position");
            ui.label(format!("{:.0}, {:.0}", layer.x, layer.y));
            ui.end_row();

            let size = layer.scaled_size();
            ui.label("Size");
            ui.label(format!("{:.0} × {:.0}", size.x, size.y));
            ui.end_row();

            ui.label("Scale");
            ui.label(format!("{:.0}%", layer.scale() * 100.0));
            ui.end_row();

            ui.label("Source");
            ui.label(format!("{} × {}", layer.natural_width, layer.natural_height));
            ui.end_row();
        });

    let mut degrees = layer.rotation;
    let slider = egui::Slider::new(&mut degrees, -180.0..=180.0).suffix("°").text("Rotation");
    if ui.add(slider).changed() {
        commands.push(Command::SetRotation {
            layer_id: layer.id.clone(),
            degrees,
        });
    }

    ui.horizontal(|ui| {
        ui.label("Nudge");
        for (label, delta) in [
            ("⬅", Vec2::new(-NUDGE_STEP, 0.0)),
            ("➡", Vec2::new(NUDGE_STEP, 0.0)),
            ("⬆", Vec2::new(0.0, -NUDGE_STEP)),
            ("⬇", Vec2::new(0.0, NUDGE_STEP)),
        ] {
            if ui.small_button(label).clicked() {
                commands.push(Command::NudgeLayer {
                    layer_id: layer.id.clone(),
                    delta,
                });
            }
        }
    });
}
