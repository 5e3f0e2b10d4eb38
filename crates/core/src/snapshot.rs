//! Read-only view of the simulation for renderers, logs and tests.

use serde::Serialize;

use crate::grid::Grid;
use crate::types::{ClearStage, PieceKind};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridSnapshot {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub spacing: f32,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub back: f32,
    pub front: f32,
}

impl From<&Grid> for GridSnapshot {
    fn from(grid: &Grid) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            depth: grid.depth(),
            spacing: grid.spacing(),
            left: grid.left_ws(),
            right: grid.right_ws(),
            bottom: grid.bottom_ws(),
            top: grid.top_ws(),
            back: grid.back_ws(),
            front: grid.front_ws(),
        }
    }
}

impl Default for GridSnapshot {
    fn default() -> Self {
        Self::from(&Grid::default())
    }
}

/// One cube in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CubeSnapshot {
    pub piece_id: u32,
    pub cube_id: u32,
    #[serde(serialize_with = "serialize_kind")]
    pub kind: PieceKind,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Owned by the player-controlled piece.
    pub falling: bool,
}

fn serialize_kind<S: serde::Serializer>(kind: &PieceKind, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(kind.as_str())
}

fn serialize_stage<S: serde::Serializer>(stage: &ClearStage, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(stage.as_str())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimSnapshot {
    pub grid: GridSnapshot,
    pub cubes: Vec<CubeSnapshot>,
    pub falling_piece: Option<u32>,
    #[serde(serialize_with = "serialize_stage")]
    pub stage: ClearStage,
    pub cascading: u32,
    pub lost: bool,
    pub paused: bool,
    pub gravity: f32,
    pub layers_cleared: u32,
    pub pieces_locked: u32,
    pub stack_len: u32,
    pub now_ms: u64,
}

impl Default for SimSnapshot {
    fn default() -> Self {
        Self {
            grid: GridSnapshot::default(),
            cubes: Vec::new(),
            falling_piece: None,
            stage: ClearStage::Idle,
            cascading: 0,
            lost: false,
            paused: false,
            gravity: 0.0,
            layers_cleared: 0,
            pieces_locked: 0,
            stack_len: 0,
            now_ms: 0,
        }
    }
}

impl SimSnapshot {
    pub fn playable(&self) -> bool {
        !self.lost && !self.paused
    }

    /// Nothing moves until the player acts.
    pub fn is_static(&self) -> bool {
        self.lost || self.paused
    }

    /// FNV-1a over everything a renderer draws. Equal snapshots hash equal.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a::new();
        for c in &self.cubes {
            h.write_u32(c.cube_id);
            h.write_u32(c.x.to_bits());
            h.write_u32(c.y.to_bits());
            h.write_u32(c.z.to_bits());
            h.write_u32(c.falling as u32);
        }
        h.write_u32(self.stage.code() as u32);
        h.write_u32(self.lost as u32 | (self.paused as u32) << 1);
        h.write_u32(self.layers_cleared);
        h.write_u32(self.pieces_locked);
        h.finish()
    }
}

struct Fnv1a(u64);

impl Fnv1a {
    fn new() -> Self {
        Self(0xcbf29ce484222325)
    }

    fn write_u32(&mut self, v: u32) {
        for b in v.to_le_bytes() {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(0x00000100000001B3);
        }
    }

    fn finish(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(id: u32, y: f32) -> CubeSnapshot {
        CubeSnapshot {
            piece_id: 1,
            cube_id: id,
            kind: PieceKind::Line,
            x: 0.5,
            y,
            z: 0.5,
            falling: true,
        }
    }

    #[test]
    fn fingerprint_tracks_cube_motion() {
        let mut snap = SimSnapshot::default();
        snap.cubes.push(cube(1, 2.0));
        let a = snap.fingerprint();
        assert_eq!(a, snap.clone().fingerprint());
        snap.cubes[0].y = 1.9;
        assert_ne!(a, snap.fingerprint());
    }

    #[test]
    fn fingerprint_tracks_flags() {
        let mut snap = SimSnapshot::default();
        let a = snap.fingerprint();
        snap.paused = true;
        assert_ne!(a, snap.fingerprint());
        assert!(snap.is_static());
        assert!(!snap.playable());
    }
}
