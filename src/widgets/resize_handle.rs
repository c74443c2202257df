use egui::{CursorIcon, Pos2, Rect};

/// Radius of a drawn handle and of its hit circle
pub const HANDLE_RADIUS: f32 = 5.0;

/// One of the 8 grab points on a selected layer's box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Handle {
    /// Fixed enumeration order; the first match wins when handles overlap
    pub const ALL: [Handle; 8] = [
        Handle::North,
        Handle::NorthEast,
        Handle::East,
        Handle::SouthEast,
        Handle::South,
        Handle::SouthWest,
        Handle::West,
        Handle::NorthWest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Handle::North => "n",
            Handle::NorthEast => "ne",
            Handle::East => "e",
            Handle::SouthEast => "se",
            Handle::South => "s",
            Handle::SouthWest => "sw",
            Handle::West => "w",
            Handle::NorthWest => "nw",
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            Handle::North | Handle::South => CursorIcon::ResizeVertical,
            Handle::East | Handle::West => CursorIcon::ResizeHorizontal,
            Handle::NorthWest | Handle::SouthEast => CursorIcon::ResizeNwSe,
            Handle::NorthEast | Handle::SouthWest => CursorIcon::ResizeNeSw,
        }
    }

    pub fn has_north(&self) -> bool {
        matches!(self, Handle::North | Handle::NorthEast | Handle::NorthWest)
    }

    pub fn has_south(&self) -> bool {
        matches!(self, Handle::South | Handle::SouthEast | Handle::SouthWest)
    }

    pub fn has_east(&self) -> bool {
        matches!(self, Handle::East | Handle::NorthEast | Handle::SouthEast)
    }

    pub fn has_west(&self) -> bool {
        matches!(self, Handle::West | Handle::NorthWest | Handle::SouthWest)
    }

    /// The handle on the other side of the box, held fixed while this one is dragged
    pub fn opposite(&self) -> Handle {
        match self {
            Handle::North => Handle::South,
            Handle::NorthEast => Handle::SouthWest,
            Handle::East => Handle::West,
            Handle::SouthEast => Handle::NorthWest,
            Handle::South => Handle::North,
            Handle::SouthWest => Handle::NorthEast,
            Handle::West => Handle::East,
            Handle::NorthWest => Handle::SouthEast,
        }
    }

    /// Center of this handle on `rect`
    pub fn position(&self, rect: Rect) -> Pos2 {
        match self {
            Handle::North => rect.center_top(),
            Handle::NorthEast => rect.right_top(),
            Handle::East => rect.right_center(),
            Handle::SouthEast => rect.right_bottom(),
            Handle::South => rect.center_bottom(),
            Handle::SouthWest => rect.left_bottom(),
            Handle::West => rect.left_center(),
            Handle::NorthWest => rect.left_top(),
        }
    }
}

/// All handle centers for `rect`, in `Handle::ALL` order
pub fn handle_positions(rect: Rect) -> [(Handle, Pos2); 8] {
    Handle::ALL.map(|handle| (handle, handle.position(rect)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_opposite_is_involution() {
        for handle in Handle::ALL {
            assert_eq!(handle.opposite().opposite(), handle);
            assert_ne!(handle.opposite(), handle);
        }
    }

    #[test]
    fn test_positions_on_rect() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 50.0));
        assert_eq!(Handle::North.position(rect), pos2(50.0, 0.0));
        assert_eq!(Handle::SouthEast.position(rect), pos2(100.0, 50.0));
        assert_eq!(Handle::West.position(rect), pos2(0.0, 25.0));
        assert_eq!(Handle::SouthEast.opposite().position(rect), pos2(0.0, 0.0));
    }

    #[test]
    fn test_side_flags() {
        assert!(Handle::SouthWest.has_south() && Handle::SouthWest.has_west());
        assert!(!Handle::North.has_east() && !Handle::North.has_west());
    }
}
