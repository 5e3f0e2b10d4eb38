//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::Key`] and keeps the
//! pressed/held state the simulation samples once per tick, including for
//! terminals without key-release events.

pub mod handler;
pub mod map;

pub use tui_tetris3d_types as types;

pub use handler::KeyboardState;
pub use map::{map_key, should_quit};
