//! Frame driver and session lifecycle.
//!
//! [`Session`] wraps a [`StackController`](core::StackController) with the
//! per-frame ordering (timers, update, reset, tick, late tick) and the boot
//! spawn. Everything here is synchronous; the caller owns the clock.

pub mod session;

pub use tui_tetris3d_core as core;
pub use tui_tetris3d_types as types;

pub use session::{Session, SessionConfig};
