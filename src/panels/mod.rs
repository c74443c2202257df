mod central_panel;
mod dialogs;
mod layers_panel;
mod toolbar;

pub use central_panel::central_panel;
pub use dialogs::{ResizeDialog, describe_error, error_window, resize_dialog};
pub use layers_panel::layers_panel;
pub use toolbar::{ToolbarAction, toolbar};
