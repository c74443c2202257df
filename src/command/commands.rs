use egui::{Pos2, Vec2};
use log::debug;

use crate::document::Document;
use crate::layer::LayerId;

/// Mutations that tools and panels ask the editor to apply to the document
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Select a layer, or clear the selection with `None`
    SelectLayer(Option<LayerId>),

    /// Place a layer's top-left corner
    MoveLayer { layer_id: LayerId, position: Pos2 },

    /// Set a layer's scale and the top-left that keeps its anchor in place
    ScaleLayer {
        layer_id: LayerId,
        scale: f32,
        position: Pos2,
    },

    DuplicateLayer(LayerId),

    DeleteLayer(LayerId),

    /// Move a layer within store order, renumbering z-indices
    ReorderLayer { from: usize, to: usize },

    ToggleVisibility(LayerId),

    NudgeLayer { layer_id: LayerId, delta: Vec2 },

    SetRotation { layer_id: LayerId, degrees: f32 },
}

impl Command {
    /// Apply the command. Returns whether the document changed.
    pub fn execute(&self, document: &mut Document) -> bool {
        debug!("Executing {:?}", self);
        match self {
            Command::SelectLayer(layer_id) => {
                if document.selected_id() == layer_id.as_ref() {
                    return false;
                }
                document.select(layer_id.as_ref())
            }
            Command::MoveLayer { layer_id, position } => match document.get_mut(layer_id) {
                Some(layer) if layer.position() != *position => {
                    layer.set_position(*position);
                    true
                }
                _ => false,
            },
            Command::ScaleLayer {
                layer_id,
                scale,
                position,
            } => {
                let Some(layer) = document.get_mut(layer_id) else {
                    return false;
                };
                let before = (layer.scale(), layer.position());
                layer.set_scale(*scale);
                layer.set_position(*position);
                (layer.scale(), layer.position()) != before
            }
            Command::DuplicateLayer(layer_id) => document.duplicate(layer_id).is_some(),
            Command::DeleteLayer(layer_id) => document.remove(layer_id),
            Command::ReorderLayer { from, to } => document.reorder(*from, *to),
            Command::ToggleVisibility(layer_id) => document.toggle_visibility(layer_id),
            Command::NudgeLayer { layer_id, delta } => document.nudge(layer_id, *delta),
            Command::SetRotation { layer_id, degrees } => document.set_rotation(layer_id, *degrees),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::Bitmap;
    use std::sync::Arc;

    fn document_with_layer() -> (Document, LayerId) {
        let mut doc = Document::new(800, 600);
        let image = Arc::new(Bitmap::solid(100, 50, [0, 0, 0, 255]).unwrap());
        let id = doc.add(image).unwrap();
        (doc, id)
    }

    #[test]
    fn test_move_layer() {
        let (mut doc, id) = document_with_layer();
        let command = Command::MoveLayer {
            layer_id: id.clone(),
            position: Pos2::new(5.0, 6.0),
        };
        assert!(command.execute(&mut doc));
        assert_eq!(doc.get(&id).unwrap().position(), Pos2::new(5.0, 6.0));
        // Same position again is not a change
        assert!(!command.execute(&mut doc));
    }

    #[test]
    fn test_scale_layer_clamps() {
        let (mut doc, id) = document_with_layer();
        Command::ScaleLayer {
            layer_id: id.clone(),
            scale: 40.0,
            position: Pos2::ZERO,
        }
        .execute(&mut doc);
        assert_eq!(doc.get(&id).unwrap().scale(), 5.0);
    }

    #[test]
    fn test_commands_on_missing_layer_do_nothing() {
        let (mut doc, id) = document_with_layer();
        doc.remove(&id);
        let move_layer = Command::MoveLayer {
            layer_id: id.clone(),
            position: Pos2::ZERO,
        };
        assert!(!move_layer.execute(&mut doc));
        assert!(!Command::DuplicateLayer(id.clone()).execute(&mut doc));
        assert!(!Command::ToggleVisibility(id.clone()).execute(&mut doc));
        assert!(!Command::SelectLayer(Some(id)).execute(&mut doc));
        assert!(doc.is_empty());
    }

    #[test]
    fn test_select_same_layer_reports_no_change() {
        let (mut doc, id) = document_with_layer();
        assert!(!Command::SelectLayer(Some(id)).execute(&mut doc));
        assert!(Command::SelectLayer(None).execute(&mut doc));
        assert!(!Command::SelectLayer(None).execute(&mut doc));
    }

    #[test]
    fn test_scale_layer_reports_no_change_when_already_applied() {
        let (mut doc, id) = document_with_layer();
        let command = Command::ScaleLayer {
            layer_id: id.clone(),
            scale: 2.0,
            position: Pos2::new(10.0, 20.0),
        };
        assert!(command.execute(&mut doc));
        assert!(!command.execute(&mut doc));

        // Past the clamp the stored scale cannot move any further
        let overshoot = Command::ScaleLayer {
            layer_id: id.clone(),
            scale: 40.0,
            position: Pos2::new(10.0, 20.0),
        };
        assert!(overshoot.execute(&mut doc));
        let beyond = Command::ScaleLayer {
            layer_id: id,
            scale: 80.0,
            position: Pos2::new(10.0, 20.0),
        };
        assert!(!beyond.execute(&mut doc));
    }
}
