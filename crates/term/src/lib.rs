//! Terminal rendering for the 3D stacking game.
//!
//! Rendering goes through a plain framebuffer instead of a widget toolkit:
//! `GameView` draws a `SimSnapshot` into a `FrameBuffer`, and
//! `TerminalRenderer` flushes the cells that changed since the last frame.
//!
//! The play field is 3D, the terminal is not. The view shows two orthographic
//! projections (front and side) so every axis stays readable.

pub mod fb;
pub mod game_view;
pub mod overlay;
pub mod renderer;
pub mod throttle;

pub use tui_tetris3d_core as core;
pub use tui_tetris3d_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Projection, Viewport, SPAWN_ROWS};
pub use overlay::TermOverlay;
pub use renderer::{changed_runs, encode_changes, encode_full, Run, TerminalRenderer};
pub use throttle::RenderThrottle;
