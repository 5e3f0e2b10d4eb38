//! Setup errors.
//!
//! Only precondition violations are errors. Rollbacks, cascades and game over
//! are ordinary simulation state.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SetupError {
    #[error("grid {axis} must be positive, got {value}")]
    InvalidDimension { axis: &'static str, value: u32 },

    #[error("grid spacing must be finite and positive, got {0}")]
    InvalidSpacing(f32),

    #[error("pieces move in unit steps, grid spacing must be 1, got {0}")]
    UnsupportedSpacing(f32),

    #[error("piece prefab has no cubes")]
    EmptyPiece,

    #[error("piece has {count} cubes, at most {max} are supported")]
    TooManyCubes { count: usize, max: usize },

    #[error("no piece prefabs configured")]
    NoPrefabs,
}
