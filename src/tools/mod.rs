mod selection_tool;

pub use selection_tool::{
    SelectionState, SelectionTool, WHEEL_ZOOM_IN, WHEEL_ZOOM_OUT, resize_from_handle, wheel_zoom,
};
