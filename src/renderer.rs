use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use log::debug;
use tiny_skia::{
    Color, FillRule, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, StrokeDash,
    Transform,
};

use crate::document::Document;
use crate::error::ExportError;
use crate::layer::Layer;
use crate::widgets::resize_handle::{HANDLE_RADIUS, handle_positions};

/// Selection outline and handle stroke, #1890ff
pub const SELECTION_COLOR: [u8; 3] = [0x18, 0x90, 0xff];
const OUTLINE_DASH: [f32; 2] = [5.0, 5.0];
const OUTLINE_WIDTH: f32 = 1.0;

/// What a render pass draws besides the layers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Fill color, or `None` to leave the surface transparent
    pub background: Option<Color>,
    /// Outline and handles around the selected layer
    pub selection_chrome: bool,
}

impl RenderOptions {
    /// On-screen view: transparent surface with selection chrome
    pub fn live() -> Self {
        Self {
            background: None,
            selection_chrome: true,
        }
    }

    /// Exported composite: opaque white, no chrome
    pub fn export() -> Self {
        Self {
            background: Some(Color::WHITE),
            selection_chrome: false,
        }
    }
}

/// Rasterizes a `Document` into a pixmap the size of its canvas.
#[derive(Debug, Clone)]
pub struct Renderer {
    chrome_color: Color,
}

impl Default for Renderer {
    fn default() -> Self {
        let [r, g, b] = SELECTION_COLOR;
        Self {
            chrome_color: Color::from_rgba8(r, g, b, 255),
        }
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Redraw the whole canvas from the document's current state
    pub fn render(
        &self,
        document: &Document,
        options: RenderOptions,
    ) -> Result<Pixmap, ExportError> {
        let (width, height) = (document.width(), document.height());
        let mut pixmap =
            Pixmap::new(width, height).ok_or(ExportError::InvalidDimensions { width, height })?;

        if let Some(background) = options.background {
            pixmap.fill(background);
        }

        let layers = document.render_order();
        for layer in &layers {
            draw_layer(&mut pixmap, layer);
        }

        if options.selection_chrome {
            if let Some(layer) = document.selected().filter(|layer| layer.visible) {
                self.draw_selection(&mut pixmap, layer);
            }
        }

        debug!("Rendered {} layers at {}x{}", layers.len(), width, height);
        Ok(pixmap)
    }

    /// Export composite as PNG bytes
    pub fn render_to_blob(&self, document: &Document) -> Result<Vec<u8>, ExportError> {
        let pixmap = self.render(document, RenderOptions::export())?;
        pixmap
            .encode_png()
            .map_err(|e| ExportError::Png(e.to_string()))
    }

    /// Export composite as a `data:image/png;base64,...` URL
    pub fn render_to_data_url(&self, document: &Document) -> Result<String, ExportError> {
        let png = self.render_to_blob(document)?;
        Ok(format!("data:image/png;base64,{}", BASE64_STANDARD.encode(png)))
    }

    fn draw_selection(&self, pixmap: &mut Pixmap, layer: &Layer) {
        let bounds = layer.bounds();
        let (x, y) = (bounds.min.x, bounds.min.y);
        let Some(rect) = tiny_skia::Rect::from_xywh(x, y, bounds.width(), bounds.height()) else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(self.chrome_color);
        paint.anti_alias = true;

        let outline = Stroke {
            width: OUTLINE_WIDTH,
            dash: StrokeDash::new(OUTLINE_DASH.to_vec(), 0.0),
            ..Stroke::default()
        };
        let path = PathBuilder::from_rect(rect);
        pixmap.stroke_path(&path, &paint, &outline, Transform::identity(), None);

        let mut fill = Paint::default();
        fill.set_color(Color::WHITE);
        fill.anti_alias = true;
        let ring = Stroke {
            width: OUTLINE_WIDTH,
            ..Stroke::default()
        };

        for (_, center) in handle_positions(bounds) {
            let Some(circle) = PathBuilder::from_circle(center.x, center.y, HANDLE_RADIUS) else {
                continue;
            };
            pixmap.fill_path(&circle, &fill, FillRule::Winding, Transform::identity(), None);
            pixmap.stroke_path(&circle, &paint, &ring, Transform::identity(), None);
        }
    }
}

/// Draw one layer: scale the bitmap to its box, place it, then rotate about the box center
fn draw_layer(pixmap: &mut Pixmap, layer: &Layer) {
    let image = layer.image.pixmap();
    let size = layer.scaled_size();
    let center = layer.center();

    let transform = Transform::from_rotate_at(layer.rotation, center.x, center.y)
        .pre_translate(layer.x, layer.y)
        .pre_scale(
            size.x / image.width() as f32,
            size.y / image.height() as f32,
        );

    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    pixmap.draw_pixmap(0, 0, image, &paint, transform, None);
}
