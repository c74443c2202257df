use egui::{Pos2, Vec2};
use log::{debug, info};

use crate::bitmap::BitmapRef;
use crate::error::ValidationError;
use crate::layer::{DUPLICATE_OFFSET, FIT_RATIO, Layer, LayerId};

pub const DEFAULT_CANVAS_WIDTH: u32 = 800;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 600;
pub const MIN_CANVAS_SIZE: u32 = 100;
pub const MAX_CANVAS_SIZE: u32 = 4000;

/// Reject canvas sizes outside `[MIN_CANVAS_SIZE, MAX_CANVAS_SIZE]`
pub fn validate_canvas_size(width: u32, height: u32) -> Result<(), ValidationError> {
    let range = MIN_CANVAS_SIZE..=MAX_CANVAS_SIZE;
    if range.contains(&width) && range.contains(&height) {
        Ok(())
    } else {
        Err(ValidationError::CanvasSize {
            width,
            height,
            min: MIN_CANVAS_SIZE,
            max: MAX_CANVAS_SIZE,
        })
    }
}

/// The layer store: ordered layers, the single selection and the canvas size.
///
/// Operations addressed by id are no-ops when the id is unknown. Store calls
/// come from UI events that can trail a removal in the same frame, and doing
/// nothing is the right answer for those.
#[derive(Debug, Clone)]
pub struct Document {
    layers: Vec<Layer>,
    selected: Option<LayerId>,
    width: u32,
    height: u32,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
    }
}

impl Document {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            layers: Vec::new(),
            selected: None,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn canvas_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Layers in store order
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn get(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| &layer.id == id)
    }

    pub fn get_mut(&mut self, id: &LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| &layer.id == id)
    }

    pub fn index_of(&self, id: &LayerId) -> Option<usize> {
        self.layers.iter().position(|layer| &layer.id == id)
    }

    pub fn selected_id(&self) -> Option<&LayerId> {
        self.selected.as_ref()
    }

    pub fn selected(&self) -> Option<&Layer> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    pub fn is_selected(&self, id: &LayerId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    /// Visible layers bottom to top: ascending z, ties keep store order
    pub fn render_order(&self) -> Vec<&Layer> {
        let mut ordered: Vec<&Layer> = self.layers.iter().filter(|layer| layer.visible).collect();
        ordered.sort_by_key(|layer| layer.z_index);
        ordered
    }

    fn next_z_index(&self) -> i32 {
        self.layers
            .iter()
            .map(|layer| layer.z_index)
            .max()
            .map_or(0, |z| z + 1)
    }

    fn fresh_id(&self) -> LayerId {
        loop {
            let id = LayerId::generate();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    /// Size an image to fit within `FIT_RATIO` of the canvas, keeping its aspect ratio
    pub fn fitted_size(&self, natural_width: u32, natural_height: u32) -> Vec2 {
        let mut width = natural_width as f32;
        let mut height = natural_height as f32;
        let max_size = (self.width as f32 * FIT_RATIO).min(self.height as f32 * FIT_RATIO);

        if width > height && width > max_size {
            height = height * max_size / width;
            width = max_size;
        } else if height > max_size {
            width = width * max_size / height;
            height = max_size;
        }
        Vec2::new(width, height)
    }

    /// Top-left that centers a box of `size` on the canvas
    pub fn centered_position(&self, size: Vec2) -> Pos2 {
        Pos2::new(
            (self.width as f32 - size.x) / 2.0,
            (self.height as f32 - size.y) / 2.0,
        )
    }

    /// Place an image centered and fitted, on top of everything, and select it.
    ///
    /// Returns `None` without touching the store when a layer showing the same
    /// image already sits at the computed position (the same file dropped twice).
    pub fn add(&mut self, image: BitmapRef) -> Option<LayerId> {
        let size = self.fitted_size(image.width(), image.height());
        let position = self.centered_position(size);

        let already_placed = self.layers.iter().any(|layer| {
            layer.image.fingerprint() == image.fingerprint()
                && layer.x == position.x
                && layer.y == position.y
        });
        if already_placed {
            info!("Layer already exists, skipping duplicate");
            return None;
        }

        let id = self.fresh_id();
        let layer = Layer::new(id.clone(), image, position, size, self.next_z_index());
        info!(
            "🖼️ Added {} ({}x{} fitted to {:.1}x{:.1}, z={})",
            id, layer.natural_width, layer.natural_height, size.x, size.y, layer.z_index
        );
        self.layers.push(layer);
        self.selected = Some(id.clone());
        Some(id)
    }

    /// Remove a layer; clears the selection if it pointed at it
    pub fn remove(&mut self, id: &LayerId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if self.is_selected(id) {
            self.selected = None;
        }
        self.layers.remove(index);
        info!("Removed {}", id);
        true
    }

    /// Copy a layer's geometry into a new record sharing the same image
    pub fn duplicate(&mut self, id: &LayerId) -> Option<LayerId> {
        let source = self.get(id)?;
        let mut copy = source.clone();
        copy.id = self.fresh_id();
        copy.x += DUPLICATE_OFFSET.x;
        copy.y += DUPLICATE_OFFSET.y;
        copy.z_index = self.next_z_index();

        let new_id = copy.id.clone();
        info!("Duplicated {} as {}", id, new_id);
        self.layers.push(copy);
        self.selected = Some(new_id.clone());
        Some(new_id)
    }

    /// Move the layer at `old_index` to `new_index` and renumber every z-index
    /// to match the new store order
    pub fn reorder(&mut self, old_index: usize, new_index: usize) -> bool {
        if old_index >= self.layers.len() || new_index >= self.layers.len() {
            return false;
        }
        let layer = self.layers.remove(old_index);
        self.layers.insert(new_index, layer);
        for (index, layer) in self.layers.iter_mut().enumerate() {
            layer.z_index = index as i32;
        }
        debug!("Reordered layer {} -> {}", old_index, new_index);
        true
    }

    /// Select a layer by id, or clear the selection with `None`.
    /// Unknown ids leave the selection unchanged.
    pub fn select(&mut self, id: Option<&LayerId>) -> bool {
        match id {
            None => {
                self.selected = None;
                true
            }
            Some(id) if self.get(id).is_some() => {
                self.selected = Some(id.clone());
                true
            }
            Some(_) => false,
        }
    }

    pub fn toggle_visibility(&mut self, id: &LayerId) -> bool {
        let Some(layer) = self.get_mut(id) else {
            return false;
        };
        layer.visible = !layer.visible;
        true
    }

    /// Shift a layer by a fixed amount
    pub fn nudge(&mut self, id: &LayerId, delta: Vec2) -> bool {
        let Some(layer) = self.get_mut(id) else {
            return false;
        };
        layer.x += delta.x;
        layer.y += delta.y;
        true
    }

    pub fn set_rotation(&mut self, id: &LayerId, degrees: f32) -> bool {
        if !degrees.is_finite() {
            return false;
        }
        let Some(layer) = self.get_mut(id) else {
            return false;
        };
        layer.rotation = degrees;
        true
    }

    /// Change the canvas size, stretching layer positions and base sizes along with it
    pub fn resize_canvas(&mut self, width: u32, height: u32) -> Result<(), ValidationError> {
        validate_canvas_size(width, height)?;

        let scale_x = width as f32 / self.width as f32;
        let scale_y = height as f32 / self.height as f32;
        for layer in &mut self.layers {
            layer.x *= scale_x;
            layer.y *= scale_y;
            layer.width *= scale_x;
            layer.height *= scale_y;
        }
        info!(
            "Canvas resized {}x{} -> {}x{}",
            self.width, self.height, width, height
        );
        self.width = width;
        self.height = height;
        Ok(())
    }
}
