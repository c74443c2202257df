use crate::ComposeApp;
use crate::document::{MAX_CANVAS_SIZE, MIN_CANVAS_SIZE};
use crate::error::EditorError;

/// Pending values of the canvas-size window
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeDialog {
    pub width: u32,
    pub height: u32,
    pub message: Option<String>,
}

impl ResizeDialog {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            message: None,
        }
    }
}

/// Text shown in the error window. Generation failures keep every detail the
/// backend reported.
pub fn describe_error(error: &EditorError) -> String {
    match error {
        EditorError::Generation(e) => {
            let mut text = format!("Type: {}\n", e.kind);
            if let Some(node) = &e.node {
                text += &format!("Node: {}\n", node);
            }
            text += &format!("Message: {}", e.message);
            if let Some(trace) = &e.trace {
                text += &format!("\n\n{}", trace);
            }
            text
        }
        other => other.to_string(),
    }
}

pub fn resize_dialog(app: &mut ComposeApp, ctx: &egui::Context) {
    let Some(dialog) = app.resize_dialog.as_mut() else {
        return;
    };

    let mut open = true;
    let mut apply = false;
    egui::Window::new("Canvas size")
        .collapsible(false)
        .resizable(false)
        .open(&mut open)
        .show(ctx, |ui| {
            let range = MIN_CANVAS_SIZE..=MAX_CANVAS_SIZE;
            egui::Grid::new("canvas_size_grid").num_columns(2).show(ui, |ui| {
                ui.label("Width");
                ui.add(
                    egui::DragValue::new(&mut dialog.width)
                        .range(range.clone())
                        .suffix(" px"),
                );
                ui.end_row();
                ui.label("Height");
                ui.add(
                    egui::DragValue::new(&mut dialog.height)
                        .range(range)
                        .suffix(" px"),
                );
                ui.end_row();
            });
            if let Some(message) = &dialog.message {
                ui.colored_label(egui::Color32::RED, message);
            }
            apply = ui.button("Apply").clicked();
        });

    if apply {
        let (width, height) = (dialog.width, dialog.height);
        match app.state.resize_canvas(width, height) {
            Ok(()) => {
                if let Err(e) = app.config.set_canvas_size(width, height) {
                    log::warn!("{}", e);
                }
                app.status = format!("Canvas resized to {} × {}", width, height);
                app.resize_dialog = None;
            }
            Err(e) => {
                log::warn!("{}", e);
                dialog.message = Some(e.to_string());
            }
        }
    } else if !open {
        app.resize_dialog = None;
    }
}

pub fn error_window(app: &mut ComposeApp, ctx: &egui::Context) {
    let Some(message) = app.error.clone() else {
        return;
    };

    let mut open = true;
    let mut dismissed = false;
    egui::Window::new("Error")
        .collapsible(false)
        .resizable(true)
        .open(&mut open)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                ui.monospace(&message);
            });
            dismissed = ui.button("Close").clicked();
        });

    if dismissed || !open {
        app.error = None;
    }
}
