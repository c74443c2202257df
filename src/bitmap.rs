use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use log::debug;
use tiny_skia::{ColorU8, Pixmap, PixmapRef};

use crate::error::DecodeError;

/// Decoded, immutable bitmap shared between layers.
///
/// Pixels are stored premultiplied so they can be composited directly.
/// The fingerprint identifies the source content and is what the layer
/// store compares when rejecting a repeated drop of the same file.
pub struct Bitmap {
    pixmap: Pixmap,
    fingerprint: u64,
}

// Define a reference-counted type alias for Bitmap
pub type BitmapRef = Arc<Bitmap>;

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("fingerprint", &format_args!("{:016x}", self.fingerprint))
            .finish()
    }
}

impl Bitmap {
    /// Decode PNG/JPEG/GIF/WebP/BMP bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let decoded = image::load_from_memory(bytes)?;
        let rgba = decoded.to_rgba8();
        debug!("Decoded image: {}x{}", rgba.width(), rgba.height());
        Self::from_rgba(rgba.width(), rgba.height(), rgba.as_raw(), fingerprint(bytes))
    }

    /// Build a bitmap from straight (non-premultiplied) RGBA8 pixels.
    pub fn from_rgba(
        width: u32,
        height: u32,
        rgba: &[u8],
        fingerprint: u64,
    ) -> Result<Self, DecodeError> {
        let expected = (width as usize) * (height as usize) * 4;
        if rgba.len() != expected {
            return Err(DecodeError::Empty { width, height });
        }
        let mut pixmap = Pixmap::new(width, height).ok_or(DecodeError::Empty { width, height })?;

        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.chunks_exact(4)) {
            *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }

        Ok(Self { pixmap, fingerprint })
    }

    /// Single-color bitmap, mostly useful for placeholders and tests.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, DecodeError> {
        let pixels: Vec<u8> = rgba
            .iter()
            .copied()
            .cycle()
            .take((width as usize) * (height as usize) * 4)
            .collect();
        let print = fingerprint(&[&rgba[..], &width.to_le_bytes(), &height.to_le_bytes()].concat());
        Self::from_rgba(width, height, &pixels, print)
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub(crate) fn pixmap(&self) -> PixmapRef<'_> {
        self.pixmap.as_ref()
    }
}

/// Content hash of the encoded source bytes
pub fn fingerprint(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}
