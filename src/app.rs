use std::sync::Arc;

use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::file_handler::{self, FileHandler};
use crate::generation::Generator;
use crate::input::{CanvasView, InputHandler};
use crate::panels::{self, ResizeDialog, ToolbarAction};
use crate::state::EditorState;
use crate::texture_manager::CanvasTexture;

/// The eframe application: editor core plus the egui shell around it
pub struct ComposeApp {
    pub(crate) config: EditorConfig,
    pub(crate) state: EditorState,
    pub(crate) view: CanvasView,
    pub(crate) input: InputHandler,
    pub(crate) files: FileHandler,
    pub(crate) texture: CanvasTexture,
    pub(crate) generator: Option<Arc<dyn Generator>>,
    pub(crate) resize_dialog: Option<ResizeDialog>,
    pub(crate) error: Option<String>,
    pub(crate) status: String,
}

impl Default for ComposeApp {
    fn default() -> Self {
        Self::with_config(EditorConfig::default(), None)
    }
}

impl ComposeApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, generator: Option<Arc<dyn Generator>>) -> Self {
        let config: EditorConfig = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        Self::with_config(config.sanitized(), generator)
    }

    pub fn with_config(config: EditorConfig, generator: Option<Arc<dyn Generator>>) -> Self {
        log::info!(
            "🎨 Starting with a {}x{} canvas",
            config.canvas_width,
            config.canvas_height
        );
        Self {
            state: EditorState::new(config.canvas_width, config.canvas_height),
            view: CanvasView::new(egui::Pos2::ZERO, config.view_zoom),
            input: InputHandler::new(),
            files: FileHandler::new(),
            texture: CanvasTexture::new(),
            generator,
            resize_dialog: None,
            error: None,
            status: String::new(),
            config,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub(crate) fn report(&mut self, error: EditorError) {
        log::error!("{}", error);
        self.error = Some(panels::describe_error(&error));
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        self.files.preview_files_being_dropped(ctx);
        if !self.files.check_for_dropped_files(ctx) {
            return;
        }
        for image in self.files.take_images() {
            match self.state.add_image_bytes(&image.bytes) {
                Ok(Some(id)) => self.status = format!("Added {}", id),
                Ok(None) => self.status = format!("{} is already on the canvas", image.name),
                Err(e) => self.report(e),
            }
        }
    }

    fn handle_generation(&mut self, ctx: &egui::Context) {
        if !self.state.is_generating() {
            return;
        }
        match self.state.poll_generation() {
            None => ctx.request_repaint_after(std::time::Duration::from_millis(250)),
            Some(Ok(Some(id))) => self.status = format!("Generated image added as {}", id),
            Some(Ok(None)) => self.status = "Generated image was already placed".to_owned(),
            Some(Err(e)) => self.report(e),
        }
    }

    fn apply_toolbar_action(&mut self, action: ToolbarAction) {
        match action {
            ToolbarAction::Export => {
                let saved = self
                    .state
                    .render_to_blob()
                    .map_err(EditorError::from)
                    .and_then(|png| {
                        file_handler::save_export(&self.config.export_dir, &png)
                            .map_err(EditorError::from)
                    });
                match saved {
                    Ok(path) => self.status = format!("Exported {}", path.display()),
                    Err(e) => self.report(e),
                }
            }
            ToolbarAction::Generate => {
                let Some(generator) = self.generator.clone() else {
                    return;
                };
                match self.state.start_generation(generator) {
                    Ok(()) => self.status = "Generating...".to_owned(),
                    Err(e) => self.report(e),
                }
            }
            ToolbarAction::ZoomIn => self.view.zoom_in(),
            ToolbarAction::ZoomOut => self.view.zoom_out(),
            ToolbarAction::ZoomReset => self.view.reset_zoom(),
            ToolbarAction::ResizeCanvas => {
                let doc = self.state.document();
                self.resize_dialog = Some(ResizeDialog::new(doc.width(), doc.height()));
            }
        }
        self.config.view_zoom = self.view.zoom();
    }
}

impl eframe::App for ComposeApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.config);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.handle_generation(ctx);

        if let Some(action) = panels::toolbar(self, ctx) {
            self.apply_toolbar_action(action);
        }
        for command in panels::layers_panel(self, ctx) {
            self.state.execute(command);
        }
        panels::central_panel(self, ctx);
        panels::resize_dialog(self, ctx);
        panels::error_window(self, ctx);
    }
}
