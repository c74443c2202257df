#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod bitmap;
pub mod command;
pub mod components;
pub mod config;
pub mod document;
pub mod error;
pub mod file_handler;
pub mod generation;
pub mod geometry;
pub mod id_generator;
pub mod input;
pub mod layer;
pub mod panels;
pub mod renderer;
pub mod state;
pub mod texture_manager;
pub mod tools;
pub mod util;
pub mod widgets;

pub use app::ComposeApp;
pub use bitmap::{Bitmap, BitmapRef};
pub use command::Command;
pub use config::EditorConfig;
pub use document::Document;
pub use error::{EditorError, EditorResult};
pub use generation::{GeneratedImage, GenerationTask, Generator};
pub use input::{CanvasEvent, CanvasView};
pub use layer::{Layer, LayerId};
pub use renderer::{RenderOptions, Renderer};
pub use state::EditorState;
pub use tools::SelectionTool;
pub use widgets::Handle;
