//! Core simulation module - pure, deterministic, and testable
//!
//! This crate holds the falling-piece simulation and the stack-collapse engine.
//! It has **no dependencies** on terminals or I/O: input arrives as a sampled
//! [`KeyFrame`](types::KeyFrame) (or any [`InputSource`]), and UI notifications go
//! out through the [`Overlay`] trait.
//!
//! # Module Structure
//!
//! - [`spatial`]: rounding, snapping and the cube overlap test
//! - [`grid`]: play-field dimensions, world bounds and lattice conversion
//! - [`transform`]: piece position plus exact quarter-turn orientation
//! - [`piece`]: descent, player moves with rollback, collision resolution
//! - [`stack`]: registry of settled cubes
//! - [`controller`]: per-tick orchestration, layer clears and the cascade
//! - [`schedule`]: epoch-tagged deferred spawns
//! - [`prefabs`] / [`rng`]: piece builders and seeded prefab selection
//! - [`snapshot`]: serializable view for renderers
//!
//! # Example
//!
//! ```
//! use tui_tetris3d_core::{Grid, NullOverlay, StackController};
//! use tui_tetris3d_core::types::{KeyFrame, PieceKind};
//!
//! let mut ctl = StackController::with_prefabs(Grid::default(), &PieceKind::ALL, 7).unwrap();
//! ctl.schedule_spawn(0);
//! ctl.advance_timers(16);
//! assert!(ctl.falling_piece().is_some());
//!
//! let input = KeyFrame::default();
//! let mut overlay = NullOverlay;
//! ctl.update(&input, &mut overlay);
//! ctl.tick_pieces(0.016, &input);
//! ctl.late_tick_pieces();
//! ```

pub mod controller;
pub mod error;
pub mod grid;
pub mod input;
pub mod piece;
pub mod prefabs;
pub mod rng;
pub mod schedule;
pub mod snapshot;
pub mod spatial;
pub mod stack;
pub mod transform;

pub use tui_tetris3d_types as types;

pub use glam::{IVec3, Vec3};

// Re-export commonly used types for convenience
pub use controller::StackController;
pub use error::SetupError;
pub use grid::Grid;
pub use input::{InputSource, NullOverlay, Overlay};
pub use piece::{Cube, CubeId, Piece, PieceId};
pub use prefabs::PrefabFactory;
pub use rng::{PrefabPicker, SimpleRng};
pub use schedule::{Scheduler, SessionEvent};
pub use snapshot::{CubeSnapshot, GridSnapshot, SimSnapshot};
pub use stack::{CubeRef, StackRegistry};
pub use transform::{Orientation, Transform};
