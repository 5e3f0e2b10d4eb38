//! TUI Tetris 3D (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so the binary, tests and
//! benches can use `tui_tetris3d::{core,engine,input,term,types}`.

pub use tui_tetris3d_core as core;
pub use tui_tetris3d_engine as engine;
pub use tui_tetris3d_input as input;
pub use tui_tetris3d_term as term;
pub use tui_tetris3d_types as types;
