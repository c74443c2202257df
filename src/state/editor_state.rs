//! The editor core: one owner for the layer store, the transform tool, the
//! renderer and the in-flight generation job.
//!
//! Everything that mutates the document goes through [`EditorState::execute`]
//! or the add paths, which bump `version`. The shell compares versions to
//! decide when the canvas texture needs a fresh render.

use std::sync::Arc;

use egui::{CursorIcon, Pos2};
use log::{info, warn};
use tiny_skia::Pixmap;

use crate::bitmap::{Bitmap, BitmapRef};
use crate::command::Command;
use crate::document::Document;
use crate::error::{EditorError, EditorResult, ExportError};
use crate::generation::{GenerationTask, Generator};
use crate::input::CanvasEvent;
use crate::layer::LayerId;
use crate::renderer::{RenderOptions, Renderer};
use crate::tools::SelectionTool;

#[derive(Debug)]
pub struct EditorState {
    document: Document,
    tool: SelectionTool,
    renderer: Renderer,
    generation: Option<GenerationTask>,
    version: u64,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::with_document(Document::default())
    }
}

impl EditorState {
    pub fn new(canvas_width: u32, canvas_height: u32) -> Self {
        Self::with_document(Document::new(canvas_width, canvas_height))
    }

    pub fn with_document(document: Document) -> Self {
        Self {
            document,
            tool: SelectionTool::new(),
            renderer: Renderer::new(),
            generation: None,
            version: 0,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn tool(&self) -> &SelectionTool {
        &self.tool
    }

    /// Increments on every change that affects what the canvas shows
    pub fn version(&self) -> u64 {
        self.version
    }

    fn mark_modified(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Decode dropped bytes and place them as a new layer.
    ///
    /// `Ok(None)` means the same image was already placed at the same spot.
    pub fn add_image_bytes(&mut self, bytes: &[u8]) -> EditorResult<Option<LayerId>> {
        let bitmap = Bitmap::decode(bytes).inspect_err(|e| warn!("Rejected dropped file: {}", e))?;
        Ok(self.add_bitmap(Arc::new(bitmap)))
    }

    pub fn add_bitmap(&mut self, image: BitmapRef) -> Option<LayerId> {
        let id = self.document.add(image)?;
        self.mark_modified();
        Some(id)
    }

    /// Apply a command, bumping the version if the document changed
    pub fn execute(&mut self, command: Command) -> bool {
        let changed = command.execute(&mut self.document);
        if changed {
            self.mark_modified();
        }
        changed
    }

    /// Feed one canvas-space input event through the selection tool
    pub fn handle_event(&mut self, event: CanvasEvent) -> bool {
        match event {
            CanvasEvent::PointerDown(pos) => self.pointer_down(pos),
            CanvasEvent::PointerMove(pos) => self.pointer_move(pos),
            CanvasEvent::PointerUp(_) => {
                self.pointer_up();
                false
            }
            CanvasEvent::Wheel { pos, delta_y } => self.wheel(pos, delta_y),
        }
    }

    pub fn pointer_down(&mut self, pos: Pos2) -> bool {
        match self.tool.on_pointer_down(pos, &self.document) {
            Some(command) => self.execute(command),
            None => false,
        }
    }

    pub fn pointer_move(&mut self, pos: Pos2) -> bool {
        match self.tool.on_pointer_move(pos, &self.document) {
            Some(command) => self.execute(command),
            None => false,
        }
    }

    pub fn pointer_up(&mut self) {
        self.tool.on_pointer_up();
    }

    pub fn wheel(&mut self, pos: Pos2, delta_y: f32) -> bool {
        match self.tool.on_wheel(pos, delta_y, &self.document) {
            Some(command) => self.execute(command),
            None => false,
        }
    }

    pub fn cursor_at(&self, pos: Pos2) -> CursorIcon {
        self.tool.cursor_at(pos, &self.document)
    }

    pub fn resize_canvas(&mut self, width: u32, height: u32) -> EditorResult<()> {
        self.document.resize_canvas(width, height)?;
        self.mark_modified();
        Ok(())
    }

    /// On-screen render: transparent background, selection chrome
    pub fn render_live(&self) -> Result<Pixmap, ExportError> {
        self.renderer.render(&self.document, RenderOptions::live())
    }

    pub fn render_to_blob(&self) -> Result<Vec<u8>, ExportError> {
        self.renderer.render_to_blob(&self.document)
    }

    pub fn render_to_data_url(&self) -> Result<String, ExportError> {
        self.renderer.render_to_data_url(&self.document)
    }

    pub fn is_generating(&self) -> bool {
        self.generation.is_some()
    }

    /// Export the composite and hand it to `generator`. Only one job runs at a time.
    pub fn start_generation(&mut self, generator: Arc<dyn Generator>) -> EditorResult<()> {
        if self.generation.is_some() {
            warn!("Generation requested while another is running");
            return Err(EditorError::GenerationInFlight);
        }
        let png = self.render_to_blob()?;
        self.generation = Some(GenerationTask::spawn(generator, png)?);
        Ok(())
    }

    /// Pick up a finished job, placing its image as a new layer.
    ///
    /// Returns `None` while nothing has finished. The job slot is freed whatever
    /// the outcome.
    pub fn poll_generation(&mut self) -> Option<EditorResult<Option<LayerId>>> {
        let outcome = self.generation.as_mut()?.poll()?;
        self.generation = None;

        Some(match outcome {
            Ok(image) => {
                info!("📥 Placing generated image {}", image.reference);
                self.add_image_bytes(&image.bytes)
            }
            Err(e) => Err(e.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn state_with_layer() -> (EditorState, LayerId) {
        let mut state = EditorState::new(800, 600);
        let image = Arc::new(Bitmap::solid(100, 50, [0, 0, 0, 255]).unwrap());
        let id = state.add_bitmap(image).unwrap();
        (state, id)
    }

    #[test]
    fn test_version_tracks_changes() {
        let (mut state, id) = state_with_layer();
        let v = state.version();

        // Selecting what is already selected changes nothing
        assert!(!state.execute(Command::SelectLayer(Some(id.clone()))));
        assert_eq!(state.version(), v);

        assert!(state.execute(Command::ToggleVisibility(id)));
        assert_eq!(state.version(), v + 1);
    }

    #[test]
    fn test_garbage_bytes_are_rejected() {
        let mut state = EditorState::default();
        let result = state.add_image_bytes(b"definitely not an image");
        assert!(matches!(result, Err(EditorError::Decode(_))));
        assert!(state.document().is_empty());
        assert_eq!(state.version(), 0);
    }

    #[test]
    fn test_pointer_drag_cycle() {
        let (mut state, id) = state_with_layer();
        // Layer sits at (350, 275)
        assert!(!state.handle_event(CanvasEvent::PointerDown(pos2(360.0, 285.0))));
        assert!(state.handle_event(CanvasEvent::PointerMove(pos2(370.0, 295.0))));
        state.handle_event(CanvasEvent::PointerUp(pos2(370.0, 295.0)));

        assert_eq!(state.document().get(&id).unwrap().position(), pos2(360.0, 285.0));
        assert!(state.tool().is_idle());
    }

    #[test]
    fn test_resize_canvas_validation_surfaces() {
        let (mut state, _) = state_with_layer();
        assert!(matches!(
            state.resize_canvas(10, 10),
            Err(EditorError::Validation(_))
        ));
        assert!(state.resize_canvas(400, 300).is_ok());
        assert_eq!(state.document().width(), 400);
    }
}
