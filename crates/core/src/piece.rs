//! Piece module - a falling cluster of unit cubes
//!
//! A piece owns its cubes as integer offsets from its origin. It falls under
//! gravity, can be moved and rotated by the player while it is the falling
//! piece, and settles either on the floor or on top of the stack.
//!
//! Invalid moves are never errors: the transform is rolled back to the last
//! valid value and the tick carries on.

use arrayvec::ArrayVec;
use glam::{IVec3, Vec3};

use crate::error::SetupError;
use crate::grid::Grid;
use crate::input::InputSource;
use crate::spatial::round_to;
use crate::stack::StackRegistry;
use crate::transform::Transform;
use crate::types::{Key, PieceKind, FLOOR_EPSILON};

/// Upper bound on cubes per piece.
pub const MAX_PIECE_CUBES: usize = 4;

/// Identity of a piece within one controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u32);

/// Identity of a cube within one controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CubeId(pub u32);

/// A unit cube at a fixed offset inside its piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cube {
    pub id: CubeId,
    pub local: IVec3,
}

/// A falling (or settled) cluster of cubes.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    id: PieceId,
    kind: PieceKind,
    transform: Transform,
    cubes: ArrayVec<Cube, MAX_PIECE_CUBES>,
    settled: bool,
}

impl Piece {
    /// Assemble a piece from parts.
    ///
    /// `id` must be unique among the pieces sharing a stack; the controller
    /// gets it from its own [`PrefabFactory`](crate::prefabs::PrefabFactory).
    pub fn new(
        id: PieceId,
        kind: PieceKind,
        transform: Transform,
        cubes: &[Cube],
    ) -> Result<Self, SetupError> {
        if cubes.is_empty() {
            return Err(SetupError::EmptyPiece);
        }
        let cubes = ArrayVec::try_from(cubes).map_err(|_| SetupError::TooManyCubes {
            count: cubes.len(),
            max: MAX_PIECE_CUBES,
        })?;
        Ok(Self {
            id,
            kind,
            transform,
            cubes,
            settled: false,
        })
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn cubes(&self) -> &[Cube] {
        &self.cubes
    }

    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Let a settled piece fall again (cascade after a layer clear).
    pub fn release(&mut self) {
        self.settled = false;
    }

    pub(crate) fn settle(&mut self) {
        self.settled = true;
    }

    pub(crate) fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// World positions of all cubes, in cube order.
    pub fn cube_positions(&self) -> impl Iterator<Item = (CubeId, Vec3)> + '_ {
        self.cubes
            .iter()
            .map(move |c| (c.id, self.transform.world_point(c.local)))
    }

    pub fn cube_position(&self, id: CubeId) -> Option<Vec3> {
        self.cubes
            .iter()
            .find(|c| c.id == id)
            .map(|c| self.transform.world_point(c.local))
    }

    /// Drop a destroyed cube. Returns false if the piece did not own it.
    pub fn remove_cube(&mut self, id: CubeId) -> bool {
        match self.cubes.iter().position(|c| c.id == id) {
            Some(i) => {
                self.cubes.remove(i);
                true
            }
            None => false,
        }
    }

    /// The cube with the smallest world height (first one on ties).
    pub fn lowest_cube(&self) -> Option<Cube> {
        self.cubes
            .iter()
            .copied()
            .min_by(|a, b| {
                let ya = self.transform.world_point(a.local).y;
                let yb = self.transform.world_point(b.local).y;
                ya.total_cmp(&yb)
            })
    }

    /// Descend by `gravity * dt` and settle on the floor when reached.
    ///
    /// Returns true if the piece settled during this call.
    pub fn tick(&mut self, dt_secs: f32, gravity: f32, grid: &Grid) -> bool {
        if self.settled {
            return false;
        }
        self.transform.position.y -= gravity * dt_secs;

        let Some(lowest) = self.lowest_cube() else {
            return false;
        };
        let lowest_y = self.transform.world_point(lowest.local).y;
        if lowest_y <= grid.bottom_ws() {
            let rotated = self.transform.rotated(lowest.local);
            self.transform.position.y = round_to(grid.bottom_ws() - rotated.y, 1);
            self.settled = true;
            return true;
        }
        false
    }

    /// Resolve overlaps with the stack after this tick's descent.
    pub fn late_tick(&mut self, stack: &StackRegistry) -> bool {
        if self.settled {
            return false;
        }
        self.resolve_collision(stack)
    }

    /// Lift the piece out of the stack and settle it on top of the last cube hit.
    ///
    /// Returns true if a collision was found (the piece is then settled).
    pub fn resolve_collision(&mut self, stack: &StackRegistry) -> bool {
        let Some(lowest) = self.lowest_cube() else {
            return false;
        };
        let Some(mut hit) = stack.collision_with(self) else {
            return false;
        };
        loop {
            self.transform.move_world(Vec3::Y);
            match stack.collision_with(self) {
                Some(next) => hit = next,
                None => break,
            }
        }
        let rotated = self.transform.rotated(lowest.local);
        let offset = hit.y - rotated.y;
        self.transform.position.y = ((offset + 1.0) * 10.0).floor() / 10.0;
        self.settled = true;
        log::debug!(
            "piece {} settled on stack at y={:.1}",
            self.id.0,
            self.transform.position.y
        );
        true
    }

    /// Apply this tick's movement keys.
    ///
    /// Each pressed direction is applied and checked on its own; an invalid
    /// step is reverted without undoing the valid ones. Returns true if the
    /// piece ended up in a new position.
    pub fn handle_movement(
        &mut self,
        input: &impl InputSource,
        grid: &Grid,
        stack: &StackRegistry,
    ) -> bool {
        let start = self.transform.position;
        for key in Key::MOVES {
            if !input.was_pressed(key) {
                continue;
            }
            let Some([x, y, z]) = key.step() else {
                continue;
            };
            let before = self.transform.position;
            self.transform
                .move_world(Vec3::new(x as f32, y as f32, z as f32));
            if !self.in_bounds_xz(grid) || stack.collision_with(self).is_some() {
                self.transform.position = before;
            }
        }
        self.transform.position != start
    }

    /// Apply this tick's rotation keys about the piece origin, reverting the
    /// orientation (never the position) if the result is invalid.
    pub fn handle_rotation(
        &mut self,
        input: &impl InputSource,
        grid: &Grid,
        stack: &StackRegistry,
    ) -> bool {
        let before = self.transform.orientation;
        let mut rotated = false;
        for key in Key::ROTATIONS {
            if !input.was_pressed(key) {
                continue;
            }
            if let Some((axis, turns)) = key.quarter_turn() {
                self.transform.rotate_world(axis, turns);
                rotated = true;
            }
        }
        if !rotated {
            return false;
        }
        if !self.in_bounds(grid) || stack.collision_with(self).is_some() {
            self.transform.orientation = before;
            return false;
        }
        true
    }

    /// Every cube lies within the grid horizontally.
    pub fn in_bounds_xz(&self, grid: &Grid) -> bool {
        self.cube_positions().all(|(_, p)| grid.contains_xz(p))
    }

    /// Horizontally in bounds and no cube below the floor.
    pub fn in_bounds(&self, grid: &Grid) -> bool {
        self.in_bounds_xz(grid)
            && self
                .cube_positions()
                .all(|(_, p)| p.y + FLOOR_EPSILON > grid.bottom_ws())
    }
}
