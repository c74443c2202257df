pub mod hit_testing;

pub use hit_testing::{handle_at, layer_at, layer_contains};
