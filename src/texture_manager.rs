use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use log::debug;
use tiny_skia::Pixmap;

use crate::error::ExportError;

/// Convert a rendered pixmap into an egui image. Both are premultiplied RGBA8.
pub fn pixmap_to_color_image(pixmap: &Pixmap) -> ColorImage {
    let size = [pixmap.width() as usize, pixmap.height() as usize];
    ColorImage::from_rgba_premultiplied(size, pixmap.data())
}

/// The live canvas as one GPU texture, re-uploaded only when the
/// document version it was rendered from changes
#[derive(Default)]
pub struct CanvasTexture {
    handle: Option<TextureHandle>,
    version: Option<u64>,
    uploads: u64,
}

impl CanvasTexture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture for `version`, calling `render` only when it is stale
    pub fn get_or_upload<F>(
        &mut self,
        ctx: &Context,
        version: u64,
        render: F,
    ) -> Result<TextureId, ExportError>
    where
        F: FnOnce() -> Result<ColorImage, ExportError>,
    {
        if let (Some(handle), Some(cached)) = (&self.handle, self.version) {
            if cached == version {
                return Ok(handle.id());
            }
        }

        let image = render()?;
        match &mut self.handle {
            Some(handle) => handle.set(image, TextureOptions::LINEAR),
            None => {
                self.handle = Some(ctx.load_texture("canvas", image, TextureOptions::LINEAR));
            }
        }
        self.version = Some(version);
        self.uploads += 1;
        debug!("Uploaded canvas texture for version {}", version);

        self.handle
            .as_ref()
            .map(TextureHandle::id)
            .ok_or(ExportError::InvalidDimensions { width: 0, height: 0 })
    }

    /// How many times pixels were sent to the GPU
    #[cfg(test)]
    pub fn upload_count(&self) -> u64 {
        self.uploads
    }
}
