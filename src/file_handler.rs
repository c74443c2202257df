use std::io;
use std::path::{Path, PathBuf};

use eframe::egui;

use crate::util::time::timestamp_millis;

/// A dropped file that looks like an image, with its bytes loaded
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedImage {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Collects image files dropped onto the window
#[derive(Debug, Default)]
pub struct FileHandler {
    pending: Vec<egui::DroppedFile>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue files dropped this frame. Returns true if any arrived.
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return false;
        }
        self.pending.extend(dropped);
        true
    }

    /// Drain the queue into loaded images, skipping anything that is not an image
    /// or cannot be read
    pub fn take_images(&mut self) -> Vec<DroppedImage> {
        self.pending
            .drain(..)
            .filter_map(|file| {
                let name = display_name(&file);
                if !is_image_file(&file) {
                    log::warn!("Dropped file is not a supported type: {}", name);
                    return None;
                }
                match read_bytes(&file) {
                    Ok(Some(bytes)) => {
                        log::info!("Processing image: {} ({} bytes)", name, bytes.len());
                        Some(DroppedImage { name, bytes })
                    }
                    Ok(None) => {
                        log::warn!("Dropped file has no accessible data: {}", name);
                        None
                    }
                    Err(err) => {
                        log::error!("Failed to read image file: {}: {}", name, err);
                        None
                    }
                }
            })
            .collect()
    }

    /// Darken the window and list the files while they hover over it
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, FontId, Id, LayerId, Order};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }
        let text = ctx.input(|i| {
            let mut text = "Dropping files:\n".to_owned();
            for file in &i.raw.hovered_files {
                match &file.path {
                    Some(path) => text += &format!("\n{}", path.display()),
                    None if !file.mime.is_empty() => text += &format!("\n{}", file.mime),
                    None => text += "\n(Path not available)",
                }
            }
            text
        });

        let layer = LayerId::new(Order::Foreground, Id::new("file_drop_target"));
        let painter = ctx.layer_painter(layer);
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(20.0),
            Color32::WHITE,
        );
    }
}

fn display_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Check if a file is an image based on MIME type or extension
pub fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }
    let name = file
        .path
        .as_deref()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&file.name));
    name.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp"))
}

/// In-memory bytes if egui captured them, else the file on disk
fn read_bytes(file: &egui::DroppedFile) -> io::Result<Option<Vec<u8>>> {
    if let Some(bytes) = &file.bytes {
        return Ok(Some(bytes.to_vec()));
    }
    match &file.path {
        Some(path) => std::fs::read(path).map(Some),
        None => Ok(None),
    }
}

/// `canvas-export-<millis>.png`
pub fn export_file_name() -> String {
    format!("canvas-export-{}.png", timestamp_millis())
}

/// Write an exported PNG into `dir`, creating it if needed
pub fn save_export(dir: &Path, png: &[u8]) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name());
    std::fs::write(&path, png)?;
    log::info!("💾 Exported composite to {}", path.display());
    Ok(path)
}
