use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::document::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, validate_canvas_size};
use crate::error::ValidationError;
use crate::input::{DEFAULT_VIEW_ZOOM, clamp_view_zoom};

/// Settings that survive a restart. Stored through eframe's storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // fields added later fall back to their defaults when loading old state
pub struct EditorConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Where exported PNGs are written
    pub export_dir: PathBuf,
    pub view_zoom: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            export_dir: PathBuf::from("."),
            view_zoom: DEFAULT_VIEW_ZOOM,
        }
    }
}

impl EditorConfig {
    /// Replace out-of-range values from a stale or hand-edited store with defaults
    pub fn sanitized(mut self) -> Self {
        if validate_canvas_size(self.canvas_width, self.canvas_height).is_err() {
            log::warn!(
                "Ignoring stored canvas size {}x{}",
                self.canvas_width,
                self.canvas_height
            );
            self.canvas_width = DEFAULT_CANVAS_WIDTH;
            self.canvas_height = DEFAULT_CANVAS_HEIGHT;
        }
        self.view_zoom = clamp_view_zoom(self.view_zoom);
        self
    }

    pub fn set_canvas_size(&mut self, width: u32, height: u32) -> Result<(), ValidationError> {
        validate_canvas_size(width, height)?;
        self.canvas_width = width;
        self.canvas_height = height;
        Ok(())
    }
}
