use egui::{CursorIcon, Pos2, Vec2};
use log::{debug, info};

use crate::command::Command;
use crate::document::Document;
use crate::geometry::{handle_at, layer_at};
use crate::layer::{Layer, LayerId, clamp_scale};
use crate::widgets::Handle;

/// Wheel step factors: scrolling down shrinks, scrolling up grows
pub const WHEEL_ZOOM_OUT: f32 = 0.9;
pub const WHEEL_ZOOM_IN: f32 = 1.1;

/// What the pointer is currently doing to a layer
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Dragging {
        layer_id: LayerId,
        /// Pointer position relative to the layer's top-left at grab time
        offset: Vec2,
    },
    Resizing {
        layer_id: LayerId,
        handle: Handle,
        /// Position of the opposite handle when the drag began; stays put
        anchor: Pos2,
    },
}

/// Turns canvas-space pointer and wheel input into layer commands.
///
/// The tool only reads the document. Every change it wants is returned as a
/// `Command` for the caller to execute, so the document has a single writer.
#[derive(Debug, Clone, Default)]
pub struct SelectionTool {
    state: SelectionState,
}

impl SelectionTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, SelectionState::Idle)
    }

    /// Press: grab a handle of the selected layer, else grab the topmost layer
    /// under the pointer, else clear the selection.
    pub fn on_pointer_down(&mut self, pos: Pos2, doc: &Document) -> Option<Command> {
        if let Some(layer) = doc.selected().filter(|layer| layer.visible) {
            if let Some(handle) = handle_at(layer, pos) {
                let anchor = handle.opposite().position(layer.bounds());
                debug!("Resize {} from {} handle, anchor {:?}", layer.id, handle.as_str(), anchor);
                self.state = SelectionState::Resizing {
                    layer_id: layer.id.clone(),
                    handle,
                    anchor,
                };
                return None;
            }
        }

        if let Some(layer) = layer_at(doc, pos) {
            let offset = pos - layer.position();
            debug!("Drag {} with offset {:?}", layer.id, offset);
            self.state = SelectionState::Dragging {
                layer_id: layer.id.clone(),
                offset,
            };
            return Some(Command::SelectLayer(Some(layer.id.clone())));
        }

        self.state = SelectionState::Idle;
        Some(Command::SelectLayer(None))
    }

    pub fn on_pointer_move(&mut self, pos: Pos2, doc: &Document) -> Option<Command> {
        match &self.state {
            SelectionState::Idle => None,
            SelectionState::Dragging { layer_id, offset } => {
                if doc.get(layer_id).is_none() {
                    self.state = SelectionState::Idle;
                    return None;
                }
                Some(Command::MoveLayer {
                    layer_id: layer_id.clone(),
                    position: pos - *offset,
                })
            }
            SelectionState::Resizing {
                layer_id,
                handle,
                anchor,
            } => {
                let Some(layer) = doc.get(layer_id) else {
                    self.state = SelectionState::Idle;
                    return None;
                };
                let base = Vec2::new(layer.width, layer.height);
                let (scale, position) = resize_from_handle(*handle, *anchor, pos, base)?;
                Some(Command::ScaleLayer {
                    layer_id: layer_id.clone(),
                    scale,
                    position,
                })
            }
        }
    }

    /// Release always ends the interaction
    pub fn on_pointer_up(&mut self) {
        if !self.is_idle() {
            debug!("Interaction finished");
        }
        self.state = SelectionState::Idle;
    }

    /// Zoom the selected layer around the pointer. Works in any state, but
    /// not on a hidden layer.
    pub fn on_wheel(&self, pos: Pos2, delta_y: f32, doc: &Document) -> Option<Command> {
        let layer = doc.selected().filter(|layer| layer.visible)?;
        let (scale, position) = wheel_zoom(layer, pos, delta_y)?;
        info!("🔍 Wheel zoom {} to {:.2}", layer.id, scale);
        Some(Command::ScaleLayer {
            layer_id: layer.id.clone(),
            scale,
            position,
        })
    }

    /// Cursor feedback for a hover at `pos`
    pub fn cursor_at(&self, pos: Pos2, doc: &Document) -> CursorIcon {
        match &self.state {
            SelectionState::Resizing { handle, .. } => return handle.cursor_icon(),
            SelectionState::Dragging { .. } => return CursorIcon::Grabbing,
            SelectionState::Idle => {}
        }

        if let Some(handle) = doc
            .selected()
            .filter(|layer| layer.visible)
            .and_then(|layer| handle_at(layer, pos))
        {
            return handle.cursor_icon();
        }
        if layer_at(doc, pos).is_some() {
            CursorIcon::Move
        } else {
            CursorIcon::Default
        }
    }
}

/// Scale and top-left for a layer with unscaled size `base` whose `handle` is
/// dragged to `pointer` while the opposite handle stays at `anchor`.
///
/// Returns `None` when the pointer gives no usable size (zero or non-finite).
pub fn resize_from_handle(
    handle: Handle,
    anchor: Pos2,
    pointer: Pos2,
    base: Vec2,
) -> Option<(f32, Pos2)> {
    let ratio = base.x / base.y;

    let from_x = if handle.has_east() {
        Some(pointer.x - anchor.x)
    } else if handle.has_west() {
        Some(anchor.x - pointer.x)
    } else {
        None
    };
    let from_y = if handle.has_south() {
        Some(pointer.y - anchor.y)
    } else if handle.has_north() {
        Some(anchor.y - pointer.y)
    } else {
        None
    };

    let (new_width, new_height) = match (from_x, from_y) {
        (Some(w), Some(h)) => {
            if (w / ratio).abs() > h.abs() {
                (w, w / ratio)
            } else {
                (h * ratio, h)
            }
        }
        (Some(w), None) => (w, w / ratio),
        (None, Some(h)) => (h * ratio, h),
        (None, None) => return None,
    };

    let usable = |v: f32| v.is_finite() && v != 0.0;
    if !usable(new_width) || !usable(new_height) {
        return None;
    }

    let scale = clamp_scale((new_width / base.x).max(new_height / base.y));
    let size = base * scale;

    let x = if handle.has_east() {
        anchor.x
    } else if handle.has_west() {
        anchor.x - size.x
    } else {
        anchor.x - size.x / 2.0
    };
    let y = if handle.has_south() {
        anchor.y
    } else if handle.has_north() {
        anchor.y - size.y
    } else {
        anchor.y - size.y / 2.0
    };

    Some((scale, Pos2::new(x, y)))
}

/// One wheel notch on `layer` with the pointer at `pos`.
///
/// Returns `None` for a zero delta or when the clamped scale does not move.
pub fn wheel_zoom(layer: &Layer, pos: Pos2, delta_y: f32) -> Option<(f32, Pos2)> {
    let factor = if delta_y > 0.0 {
        WHEEL_ZOOM_OUT
    } else if delta_y < 0.0 {
        WHEEL_ZOOM_IN
    } else {
        return None;
    };

    let old_scale = layer.scale();
    let new_scale = clamp_scale(old_scale * factor);
    if new_scale == old_scale {
        return None;
    }

    let ratio = new_scale / old_scale;
    let position = Pos2::new(
        pos.x - (pos.x - layer.x) * ratio,
        pos.y - (pos.y - layer.y) * ratio,
    );
    Some((new_scale, position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::Bitmap;
    use crate::layer::{MAX_SCALE, MIN_SCALE};
    use egui::{pos2, vec2};
    use rstest::rstest;
    use std::sync::Arc;

    const EPS: f32 = 1e-3;

    fn assert_pos_eq(actual: Pos2, expected: Pos2) {
        assert!(
            (actual - expected).length() < EPS,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    /// A 100x50 layer at (100, 100), selected
    fn document() -> (Document, LayerId) {
        let mut doc = Document::new(800, 600);
        let image = Arc::new(Bitmap::solid(100, 50, [10, 20, 30, 255]).unwrap());
        let id = doc.add(image).unwrap();
        doc.get_mut(&id).unwrap().set_position(pos2(100.0, 100.0));
        (doc, id)
    }

    #[rstest]
    #[case::east(Handle::East, pos2(160.0, 999.0), 0.6, pos2(100.0, 110.0))]
    #[case::west(Handle::West, pos2(80.0, -40.0), 1.2, pos2(80.0, 95.0))]
    #[case::south(Handle::South, pos2(0.0, 200.0), 2.0, pos2(50.0, 100.0))]
    #[case::north(Handle::North, pos2(500.0, 125.0), 0.5, pos2(125.0, 125.0))]
    #[case::north_west(Handle::NorthWest, pos2(0.0, 100.0), 2.0, pos2(0.0, 50.0))]
    #[case::north_east(Handle::NorthEast, pos2(150.0, 0.0), 3.0, pos2(100.0, 0.0))]
    #[case::south_west(Handle::SouthWest, pos2(150.0, 125.0), 0.5, pos2(150.0, 100.0))]
    fn test_resize_keeps_anchor(
        #[case] handle: Handle,
        #[case] pointer: Pos2,
        #[case] expected_scale: f32,
        #[case] expected_position: Pos2,
    ) {
        let bounds = egui::Rect::from_min_size(pos2(100.0, 100.0), vec2(100.0, 50.0));
        let anchor = handle.opposite().position(bounds);

        let (scale, position) =
            resize_from_handle(handle, anchor, pointer, vec2(100.0, 50.0)).unwrap();
        assert!((scale - expected_scale).abs() < EPS, "scale {}", scale);
        assert_pos_eq(position, expected_position);

        // The opposite handle of the new box sits where it started
        let new_bounds = egui::Rect::from_min_size(position, vec2(100.0, 50.0) * scale);
        assert_pos_eq(handle.opposite().position(new_bounds), anchor);
    }

    #[test]
    fn test_corner_resize_locks_ratio() {
        // Pointer implies 60 wide but only 10 tall; width wins
        let (scale, position) =
            resize_from_handle(Handle::SouthEast, Pos2::ZERO, pos2(60.0, 10.0), vec2(100.0, 50.0))
                .unwrap();
        assert!((scale - 0.6).abs() < EPS);
        assert_eq!(position, Pos2::ZERO);
    }

    #[test]
    fn test_resize_skips_degenerate_input() {
        let base = vec2(100.0, 50.0);
        let east = |anchor: Pos2, pointer: Pos2, base: Vec2| {
            resize_from_handle(Handle::East, anchor, pointer, base)
        };
        assert!(east(pos2(10.0, 0.0), pos2(10.0, 30.0), base).is_none());
        assert!(east(Pos2::ZERO, pos2(f32::NAN, 0.0), base).is_none());
        assert!(east(Pos2::ZERO, pos2(10.0, 0.0), vec2(10.0, 0.0)).is_none());
        assert!(resize_from_handle(Handle::SouthEast, Pos2::ZERO, Pos2::ZERO, base).is_none());
    }

    #[test]
    fn test_resize_overshoot_is_clamped() {
        let base = vec2(100.0, 50.0);
        let (scale, _) =
            resize_from_handle(Handle::SouthEast, Pos2::ZERO, pos2(1.0e6, 1.0e6), base).unwrap();
        assert_eq!(scale, MAX_SCALE);

        // Dragging past the anchor flips the sign; the clamp floors it
        let anchor = pos2(100.0, 100.0);
        let (scale, position) =
            resize_from_handle(Handle::SouthEast, anchor, pos2(50.0, 50.0), base).unwrap();
        assert_eq!(scale, MIN_SCALE);
        assert_eq!(position, pos2(100.0, 100.0));
    }

    #[test]
    fn test_pointer_down_on_handle_starts_resize() {
        let (doc, id) = document();
        let mut tool = SelectionTool::new();

        assert!(tool.on_pointer_down(pos2(200.0, 150.0), &doc).is_none());
        assert_eq!(
            tool.state(),
            &SelectionState::Resizing {
                layer_id: id,
                handle: Handle::SouthEast,
                anchor: pos2(100.0, 100.0),
            }
        );
    }

    #[test]
    fn test_drag_moves_by_offset() {
        let (mut doc, id) = document();
        doc.select(None);
        let mut tool = SelectionTool::new();

        let command = tool.on_pointer_down(pos2(130.0, 120.0), &doc).unwrap();
        assert_eq!(command, Command::SelectLayer(Some(id.clone())));
        command.execute(&mut doc);

        let command = tool.on_pointer_move(pos2(230.0, 170.0), &doc).unwrap();
        command.execute(&mut doc);
        assert_eq!(doc.get(&id).unwrap().position(), pos2(200.0, 150.0));

        tool.on_pointer_up();
        assert!(tool.is_idle());
        assert!(tool.on_pointer_move(pos2(0.0, 0.0), &doc).is_none());
    }

    #[test]
    fn test_click_on_empty_canvas_clears_selection() {
        let (doc, _) = document();
        let mut tool = SelectionTool::new();
        let command = tool.on_pointer_down(pos2(700.0, 500.0), &doc);
        assert_eq!(command, Some(Command::SelectLayer(None)));
        assert!(tool.is_idle());
    }

    #[test]
    fn test_drag_of_removed_layer_returns_to_idle() {
        let (mut doc, id) = document();
        let mut tool = SelectionTool::new();
        tool.on_pointer_down(pos2(150.0, 125.0), &doc);
        doc.remove(&id);
        assert!(tool.on_pointer_move(pos2(160.0, 125.0), &doc).is_none());
        assert!(tool.is_idle());
    }

    #[test]
    fn test_wheel_keeps_point_under_cursor() {
        let (doc, _) = document();
        let layer = doc.selected().unwrap();
        let pointer = pos2(150.0, 110.0);
        let before = (pointer - layer.position()) / layer.scale();

        let (scale, position) = wheel_zoom(layer, pointer, -1.0).unwrap();
        assert!((scale - 1.1).abs() < EPS);
        let after = (pointer - position) / scale;
        assert!((after - before).length() < EPS);

        let (scale, _) = wheel_zoom(layer, pointer, 3.0).unwrap();
        assert!((scale - 0.9).abs() < EPS);
        assert!(wheel_zoom(layer, pointer, 0.0).is_none());
    }

    #[test]
    fn test_wheel_at_limit_is_noop() {
        let (mut doc, id) = document();
        doc.get_mut(&id).unwrap().set_scale(MAX_SCALE);
        let tool = SelectionTool::new();
        assert!(tool.on_wheel(pos2(150.0, 125.0), -1.0, &doc).is_none());
        assert!(tool.on_wheel(pos2(150.0, 125.0), 1.0, &doc).is_some());
    }

    #[test]
    fn test_wheel_without_selection() {
        let (mut doc, _) = document();
        doc.select(None);
        let tool = SelectionTool::new();
        assert!(tool.on_wheel(pos2(150.0, 125.0), -1.0, &doc).is_none());
    }

    #[test]
    fn test_wheel_skips_hidden_selection() {
        let (mut doc, id) = document();
        doc.toggle_visibility(&id);
        let tool = SelectionTool::new();
        assert!(tool.on_wheel(pos2(150.0, 125.0), -1.0, &doc).is_none());
        assert_eq!(doc.get(&id).unwrap().scale(), 1.0);
    }

    #[test]
    fn test_cursor_feedback() {
        let (doc, _) = document();
        let tool = SelectionTool::new();
        assert_eq!(tool.cursor_at(pos2(200.0, 150.0), &doc), CursorIcon::ResizeNwSe);
        assert_eq!(tool.cursor_at(pos2(150.0, 125.0), &doc), CursorIcon::Move);
        assert_eq!(tool.cursor_at(pos2(600.0, 500.0), &doc), CursorIcon::Default);
    }
}
