use egui::Pos2;

use crate::document::Document;
use crate::layer::{Layer, rotate_about};
use crate::widgets::resize_handle::{HANDLE_RADIUS, Handle, handle_positions};

/// Slack for float error so points exactly on an edge or corner count as inside
pub const HIT_TOLERANCE: f32 = 1e-3;

/// First handle of `layer` whose center lies within `HANDLE_RADIUS` of `pos`.
///
/// Handles live on the unrotated scaled box, matching how they are drawn.
pub fn handle_at(layer: &Layer, pos: Pos2) -> Option<Handle> {
    let radius_sq = HANDLE_RADIUS * HANDLE_RADIUS;
    handle_positions(layer.bounds())
        .into_iter()
        .find(|(_, center)| {
            let d = pos - *center;
            d.x * d.x + d.y * d.y <= radius_sq
        })
        .map(|(handle, _)| handle)
}

/// Test a point against the layer's drawn footprint, honoring rotation
pub fn layer_contains(layer: &Layer, pos: Pos2) -> bool {
    let outer = layer.rotated_bounds().expand(HIT_TOLERANCE);
    if !outer.contains(pos) {
        return false;
    }
    if layer.rotation == 0.0 {
        return true;
    }

    let center = layer.center();
    let local = rotate_about(pos, center, -layer.rotation) - center;
    let half = layer.scaled_size() / 2.0;
    local.x.abs() <= half.x + HIT_TOLERANCE && local.y.abs() <= half.y + HIT_TOLERANCE
}

/// Topmost visible layer under `pos`
pub fn layer_at(document: &Document, pos: Pos2) -> Option<&Layer> {
    document
        .render_order()
        .into_iter()
        .rev()
        .find(|layer| layer_contains(layer, pos))
}
