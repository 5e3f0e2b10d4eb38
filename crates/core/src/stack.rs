//! Stack registry - every settled cube and its last known position
//!
//! Two parallel lists: `positions[i]` is where `cubes[i]` was last seen. Cubes of
//! one piece are appended together when the piece settles. Order only matters
//! for the index correspondence.

use glam::Vec3;

use crate::piece::{CubeId, Piece, PieceId};
use crate::spatial::overlaps;

/// Handle to a settled cube: the owning piece and the cube within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CubeRef {
    pub piece: PieceId,
    pub cube: CubeId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackRegistry {
    positions: Vec<Vec3>,
    cubes: Vec<CubeRef>,
}

impl StackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cubes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn cubes(&self) -> &[CubeRef] {
        &self.cubes
    }

    /// `(position, cube)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Vec3, CubeRef)> + '_ {
        self.positions.iter().copied().zip(self.cubes.iter().copied())
    }

    /// Append every cube of a settled piece at its current world position.
    pub fn absorb(&mut self, piece: &Piece) {
        for (cube, position) in piece.cube_positions() {
            self.positions.push(position);
            self.cubes.push(CubeRef {
                piece: piece.id(),
                cube,
            });
        }
        self.check();
    }

    /// First stack position overlapping any cube of `piece`.
    ///
    /// Entries owned by `piece` itself are skipped, so a released piece never
    /// collides with its own stale positions during a cascade.
    pub fn collision_with(&self, piece: &Piece) -> Option<Vec3> {
        for (_, cube_pos) in piece.cube_positions() {
            for (stack_pos, owner) in self.iter() {
                if owner.piece == piece.id() {
                    continue;
                }
                if overlaps(cube_pos, stack_pos) {
                    return Some(stack_pos);
                }
            }
        }
        None
    }

    /// Keep only the entries for which `keep` returns true, preserving order.
    pub fn retain(&mut self, mut keep: impl FnMut(Vec3, CubeRef) -> bool) {
        let mut write = 0;
        for read in 0..self.cubes.len() {
            let (pos, cube) = (self.positions[read], self.cubes[read]);
            if keep(pos, cube) {
                self.positions[write] = pos;
                self.cubes[write] = cube;
                write += 1;
            }
        }
        self.positions.truncate(write);
        self.cubes.truncate(write);
        self.check();
    }

    /// Re-read every position from the live cubes. Entries whose cube no
    /// longer exists are dropped.
    pub fn refresh(&mut self, mut lookup: impl FnMut(CubeRef) -> Option<Vec3>) {
        let mut write = 0;
        for read in 0..self.cubes.len() {
            let cube = self.cubes[read];
            if let Some(pos) = lookup(cube) {
                self.positions[write] = pos;
                self.cubes[write] = cube;
                write += 1;
            }
        }
        self.positions.truncate(write);
        self.cubes.truncate(write);
        self.check();
    }

    /// Height of the highest settled cube.
    pub fn max_height(&self) -> Option<f32> {
        self.positions.iter().map(|p| p.y).reduce(f32::max)
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.cubes.clear();
    }

    #[inline]
    fn check(&self) {
        debug_assert_eq!(self.positions.len(), self.cubes.len());
    }
}
