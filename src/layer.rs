use std::fmt;

use egui::{Pos2, Rect, Vec2};

use crate::bitmap::BitmapRef;
use crate::id_generator;

/// Hard limits for `Layer::scale`, independent of any UI
pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 5.0;

/// Share of the canvas a freshly added image may occupy
pub const FIT_RATIO: f32 = 0.8;

/// Offset applied to a duplicated layer
pub const DUPLICATE_OFFSET: Vec2 = Vec2::new(20.0, 20.0);

/// Stable identifier for a layer, `layer-<millis>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(String);

impl LayerId {
    pub fn generate() -> Self {
        Self(format!("layer-{}", id_generator::next_stamp()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric part after `layer-`, used as the display name
    pub fn short_name(&self) -> &str {
        self.0.strip_prefix("layer-").unwrap_or(&self.0)
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Clamp a scale factor into the supported range. NaN collapses to the minimum.
pub fn clamp_scale(scale: f32) -> f32 {
    if scale.is_nan() {
        MIN_SCALE
    } else {
        scale.clamp(MIN_SCALE, MAX_SCALE)
    }
}

/// One placed image within the composite.
///
/// `x`, `y`, `width` and `height` describe the unscaled box; the drawn box is
/// `width * scale` by `height * scale` starting at `(x, y)`, rotated by
/// `rotation` degrees around its center.
#[derive(Clone)]
pub struct Layer {
    pub id: LayerId,
    pub image: BitmapRef,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    scale: f32,
    pub rotation: f32,
    pub natural_width: u32,
    pub natural_height: u32,
    pub z_index: i32,
    pub visible: bool,
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer")
            .field("id", &self.id)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("scale", &self.scale)
            .field("rotation", &self.rotation)
            .field("z_index", &self.z_index)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

impl Layer {
    /// Create a layer at `position` with the given base size, scale 1 and no rotation
    pub fn new(id: LayerId, image: BitmapRef, position: Pos2, size: Vec2, z_index: i32) -> Self {
        let natural_width = image.width();
        let natural_height = image.height();
        Self {
            id,
            image,
            x: position.x,
            y: position.y,
            width: size.x,
            height: size.y,
            scale: 1.0,
            rotation: 0.0,
            natural_width,
            natural_height,
            z_index,
            visible: true,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = clamp_scale(scale);
    }

    pub fn position(&self) -> Pos2 {
        Pos2::new(self.x, self.y)
    }

    pub fn set_position(&mut self, position: Pos2) {
        self.x = position.x;
        self.y = position.y;
    }

    pub fn scaled_size(&self) -> Vec2 {
        Vec2::new(self.width * self.scale, self.height * self.scale)
    }

    /// The unrotated, scaled box
    pub fn bounds(&self) -> Rect {
        Rect::from_min_size(self.position(), self.scaled_size())
    }

    pub fn center(&self) -> Pos2 {
        self.bounds().center()
    }

    /// Axis-aligned box enclosing the rotated footprint
    pub fn rotated_bounds(&self) -> Rect {
        let bounds = self.bounds();
        if self.rotation == 0.0 {
            return bounds;
        }
        let center = bounds.center();
        let corners = [
            bounds.left_top(),
            bounds.right_top(),
            bounds.right_bottom(),
            bounds.left_bottom(),
        ];
        let mut rect = Rect::NOTHING;
        for corner in corners {
            rect.extend_with(rotate_about(corner, center, self.rotation));
        }
        rect
    }
}

/// Rotate `point` about `center` by `degrees` (clockwise on screen, y down)
pub fn rotate_about(point: Pos2, center: Pos2, degrees: f32) -> Pos2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let d = point - center;
    Pos2::new(
        center.x + d.x * cos - d.y * sin,
        center.y + d.x * sin + d.y * cos,
    )
}
