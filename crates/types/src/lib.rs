//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (simulation, input mapping, terminal rendering).
//!
//! # Play Field
//!
//! The play field is a 3D lattice of unit cubes. The default dimensions match
//! the browser game this project descends from:
//!
//! - **Width** (x): 4 cells
//! - **Height** (y): 10 layers
//! - **Depth** (z): 4 cells
//! - **Spacing**: 1 world unit per cell
//!
//! # Simulation Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `NORMAL_GRAVITY` | 2.0 | Descent speed in world units per second |
//! | `FAST_DROP_GRAVITY` | 10.0 | Descent speed while the drop key is held |
//! | `BOOT_SPAWN_DELAY_MS` | 1000 | Delay before the first piece of a process |
//! | `RESPAWN_DELAY_MS` | 500 | Delay before a piece after a clear pass or reload |
//! | `KEY_RELEASE_TIMEOUT_MS` | 150 | Held-key expiry for terminals without release events |
//!
//! # Examples
//!
//! ```
//! use tui_tetris3d_types::{Key, KeyFrame, PieceKind, ClearStage};
//!
//! let kind = PieceKind::from_str("line").unwrap();
//! assert_eq!(kind, PieceKind::Line);
//!
//! // Rotation keys are case-sensitive.
//! assert_eq!(Key::from_str("x"), Some(Key::RotateXPos));
//! assert_eq!(Key::from_str("X"), Some(Key::RotateXNeg));
//!
//! let mut frame = KeyFrame::default();
//! frame.press(Key::MoveLeft);
//! assert!(frame.was_pressed(Key::MoveLeft));
//! assert!(frame.is_held(Key::MoveLeft));
//!
//! assert_eq!(ClearStage::Idle.code(), -1);
//! ```

/// Default grid width in cells.
pub const GRID_WIDTH: u32 = 4;

/// Default grid height in layers.
pub const GRID_HEIGHT: u32 = 10;

/// Default grid depth in cells.
pub const GRID_DEPTH: u32 = 4;

/// Default cell size in world units.
pub const GRID_SPACING: f32 = 1.0;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity while nothing special is going on (world units per second).
pub const NORMAL_GRAVITY: f32 = 2.0;

/// Gravity while the fast-drop key is held.
pub const FAST_DROP_GRAVITY: f32 = 10.0;

/// Delay before the first spawn after process start.
pub const BOOT_SPAWN_DELAY_MS: u32 = 1000;

/// Delay before the next spawn after a clear pass finds nothing, or after a reload.
pub const RESPAWN_DELAY_MS: u32 = 500;

/// Edge length of a cube; two cubes overlap when closer than this.
pub const CUBE_SIZE: f32 = 1.0;

/// Snapping tolerance for grid bounds checks.
pub const BOUNDS_TOLERANCE: f32 = 1e-4;

/// Slack applied when testing cubes against the floor after a rotation.
pub const FLOOR_EPSILON: f32 = 1e-4;

/// Held keys expire after this long without a repeat (terminal input).
pub const KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// World axis used for quarter-turn rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// The fixed key set the simulation understands.
///
/// Movement keys are edge-triggered, `FastDrop` is level-triggered,
/// the rest are edge-triggered toggles or commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Translate the falling piece one unit along -x
    MoveLeft,
    /// Translate the falling piece one unit along +x
    MoveRight,
    /// Translate the falling piece one unit along -z
    MoveForward,
    /// Translate the falling piece one unit along +z
    MoveBack,
    /// Quarter turn about x, counter-clockwise
    RotateXPos,
    /// Quarter turn about x, clockwise
    RotateXNeg,
    /// Quarter turn about y, counter-clockwise
    RotateYPos,
    /// Quarter turn about y, clockwise
    RotateYNeg,
    /// Quarter turn about z, counter-clockwise
    RotateZPos,
    /// Quarter turn about z, clockwise
    RotateZNeg,
    /// Toggle pause
    Pause,
    /// Raise gravity while held
    FastDrop,
    /// Restart after game over
    Reset,
}

impl Key {
    /// Every key, in index order.
    pub const ALL: [Key; 13] = [
        Key::MoveLeft,
        Key::MoveRight,
        Key::MoveForward,
        Key::MoveBack,
        Key::RotateXPos,
        Key::RotateXNeg,
        Key::RotateYPos,
        Key::RotateYNeg,
        Key::RotateZPos,
        Key::RotateZNeg,
        Key::Pause,
        Key::FastDrop,
        Key::Reset,
    ];

    /// The four horizontal movement keys.
    pub const MOVES: [Key; 4] = [Key::MoveRight, Key::MoveLeft, Key::MoveForward, Key::MoveBack];

    /// The six rotation keys.
    pub const ROTATIONS: [Key; 6] = [
        Key::RotateXPos,
        Key::RotateXNeg,
        Key::RotateYPos,
        Key::RotateYNeg,
        Key::RotateZPos,
        Key::RotateZNeg,
    ];

    /// Dense index used for bit sets.
    pub fn index(self) -> usize {
        self as usize
    }

    /// World-space unit step for movement keys, `None` for everything else.
    pub fn step(self) -> Option<[i8; 3]> {
        match self {
            Key::MoveRight => Some([1, 0, 0]),
            Key::MoveLeft => Some([-1, 0, 0]),
            Key::MoveForward => Some([0, 0, -1]),
            Key::MoveBack => Some([0, 0, 1]),
            _ => None,
        }
    }

    /// Axis and signed quarter-turn count for rotation keys.
    pub fn quarter_turn(self) -> Option<(Axis, i8)> {
        match self {
            Key::RotateXPos => Some((Axis::X, 1)),
            Key::RotateXNeg => Some((Axis::X, -1)),
            Key::RotateYPos => Some((Axis::Y, 1)),
            Key::RotateYNeg => Some((Axis::Y, -1)),
            Key::RotateZPos => Some((Axis::Z, 1)),
            Key::RotateZNeg => Some((Axis::Z, -1)),
            _ => None,
        }
    }

    /// Parse a key from its binding name.
    ///
    /// Rotation bindings are case-sensitive: lowercase turns counter-clockwise,
    /// uppercase clockwise.
    ///
    /// ```
    /// use tui_tetris3d_types::Key;
    ///
    /// assert_eq!(Key::from_str("moveLeft"), Some(Key::MoveLeft));
    /// assert_eq!(Key::from_str("Z"), Some(Key::RotateZNeg));
    /// assert_eq!(Key::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "x" => return Some(Key::RotateXPos),
            "X" => return Some(Key::RotateXNeg),
            "y" => return Some(Key::RotateYPos),
            "Y" => return Some(Key::RotateYNeg),
            "z" => return Some(Key::RotateZPos),
            "Z" => return Some(Key::RotateZNeg),
            _ => {}
        }
        match s.to_lowercase().as_str() {
            "moveleft" => Some(Key::MoveLeft),
            "moveright" => Some(Key::MoveRight),
            "moveforward" => Some(Key::MoveForward),
            "moveback" => Some(Key::MoveBack),
            "pause" => Some(Key::Pause),
            "fastdrop" => Some(Key::FastDrop),
            "reset" => Some(Key::Reset),
            _ => None,
        }
    }

    /// Binding name, the inverse of [`Key::from_str`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Key::MoveLeft => "moveLeft",
            Key::MoveRight => "moveRight",
            Key::MoveForward => "moveForward",
            Key::MoveBack => "moveBack",
            Key::RotateXPos => "x",
            Key::RotateXNeg => "X",
            Key::RotateYPos => "y",
            Key::RotateYNeg => "Y",
            Key::RotateZPos => "z",
            Key::RotateZNeg => "Z",
            Key::Pause => "pause",
            Key::FastDrop => "fastDrop",
            Key::Reset => "reset",
        }
    }
}

/// Input sampled once for a single simulation tick.
///
/// `pressed` holds edge events since the previous tick, `held` the keys that are
/// down right now. A pressed key always counts as held for the tick it arrives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyFrame {
    pressed: u16,
    held: u16,
}

impl KeyFrame {
    /// Frame with the given keys pressed this tick.
    pub fn pressed(keys: &[Key]) -> Self {
        let mut frame = Self::default();
        for &key in keys {
            frame.press(key);
        }
        frame
    }

    /// Record an edge press (implies held).
    pub fn press(&mut self, key: Key) {
        self.pressed |= 1 << key.index();
        self.held |= 1 << key.index();
    }

    /// Record a key as held without an edge.
    pub fn hold(&mut self, key: Key) {
        self.held |= 1 << key.index();
    }

    pub fn was_pressed(&self, key: Key) -> bool {
        self.pressed & (1 << key.index()) != 0
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held & (1 << key.index()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.pressed == 0 && self.held == 0
    }

    pub fn clear(&mut self) {
        self.pressed = 0;
        self.held = 0;
    }
}

/// Piece prefabs the factory knows how to build.
///
/// `Line` and `Quad` are the two prefabs of the browser game; the others are
/// tetromino analogues laid out in the XY plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Line,
    Quad,
    Tee,
    Ell,
    Skew,
}

impl PieceKind {
    pub const ALL: [PieceKind; 5] = [
        PieceKind::Line,
        PieceKind::Quad,
        PieceKind::Tee,
        PieceKind::Ell,
        PieceKind::Skew,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// ```
    /// use tui_tetris3d_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("QUAD"), Some(PieceKind::Quad));
    /// assert_eq!(PieceKind::from_str("i"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "line" => Some(PieceKind::Line),
            "quad" => Some(PieceKind::Quad),
            "tee" => Some(PieceKind::Tee),
            "ell" => Some(PieceKind::Ell),
            "skew" => Some(PieceKind::Skew),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::Line => "line",
            PieceKind::Quad => "quad",
            PieceKind::Tee => "tee",
            PieceKind::Ell => "ell",
            PieceKind::Skew => "skew",
        }
    }
}

/// Stage of the layer-clear cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClearStage {
    /// No cascade in progress; normal falling-piece flow.
    #[default]
    Idle,
    /// Pieces above a cleared layer are about to be released.
    Release,
    /// Released pieces are falling; waiting for all of them to settle.
    WaitForSettle,
}

impl ClearStage {
    /// Numeric stage code (-1, 0, 1).
    pub fn code(self) -> i8 {
        match self {
            ClearStage::Idle => -1,
            ClearStage::Release => 0,
            ClearStage::WaitForSettle => 1,
        }
    }

    pub fn is_active(self) -> bool {
        self != ClearStage::Idle
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClearStage::Idle => "idle",
            ClearStage::Release => "release",
            ClearStage::WaitForSettle => "wait_for_settle",
        }
    }
}

/// Events emitted by the simulation for observers (UI, logs, tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreEvent {
    /// A new falling piece entered the grid.
    PieceSpawned { piece_id: u32, kind: PieceKind },
    /// The falling piece settled and its cubes joined the stack.
    PieceLocked { piece_id: u32, cubes: u32 },
    /// One clear pass destroyed `layers` full layers (`cubes` cubes in total).
    LayersCleared { layers: u32, cubes: u32 },
    /// Pieces above the lowest cleared layer were released to fall.
    CascadeReleased { pieces: u32 },
    /// All released pieces came to rest again.
    CascadeSettled,
    /// The stack overflowed the top of the grid.
    GameOver,
    /// The session was reset after a game over.
    Reloaded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_game_parity_defaults() {
        assert_eq!((GRID_WIDTH, GRID_HEIGHT, GRID_DEPTH), (4, 10, 4));
        assert_eq!(NORMAL_GRAVITY, 2.0);
        assert_eq!(FAST_DROP_GRAVITY, 10.0);
        assert_eq!(BOOT_SPAWN_DELAY_MS, 1000);
        assert_eq!(RESPAWN_DELAY_MS, 500);
        assert_eq!(CUBE_SIZE, 1.0);
    }

    #[test]
    fn key_indices_are_dense_and_unique() {
        for (i, key) in Key::ALL.iter().enumerate() {
            assert_eq!(key.index(), i);
        }
    }

    #[test]
    fn key_frame_clear_drops_edges_and_holds() {
        let mut frame = KeyFrame::default();
        frame.press(Key::Pause);
        frame.hold(Key::FastDrop);
        assert!(!frame.is_empty());
        frame.clear();
        assert!(frame.is_empty());
        assert!(!frame.was_pressed(Key::Pause));
        assert!(!frame.is_held(Key::FastDrop));
    }
}
