//! Transform module - position plus a quarter-turn orientation
//!
//! Pieces only ever rotate in 90° steps, so orientation is stored as an exact
//! integer rotation matrix instead of a quaternion. Rotated cube offsets are
//! then exact integers and the snapping arithmetic on piece heights never sees
//! rotation noise.

use glam::{IVec3, Vec3};

use crate::types::Axis;

/// Rotation restricted to multiples of 90° about the world axes.
///
/// Stored row-major; `apply(v)` computes `M * v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Orientation {
    rows: [IVec3; 3],
}

impl Orientation {
    pub const IDENTITY: Orientation = Orientation {
        rows: [IVec3::X, IVec3::Y, IVec3::Z],
    };

    /// A single quarter turn about `axis`; positive `turns` are counter-clockwise
    /// when looking down the axis toward the origin.
    pub fn quarter_turn(axis: Axis, turns: i8) -> Self {
        let ccw = match axis {
            Axis::X => [IVec3::new(1, 0, 0), IVec3::new(0, 0, -1), IVec3::new(0, 1, 0)],
            Axis::Y => [IVec3::new(0, 0, 1), IVec3::new(0, 1, 0), IVec3::new(-1, 0, 0)],
            Axis::Z => [IVec3::new(0, -1, 0), IVec3::new(1, 0, 0), IVec3::new(0, 0, 1)],
        };
        let step = Orientation { rows: ccw };
        let mut out = Orientation::IDENTITY;
        let n = turns.rem_euclid(4);
        for _ in 0..n {
            out = step.then_after(out);
        }
        out
    }

    /// `self * other`: apply `other` first, then `self`.
    fn then_after(self, other: Orientation) -> Orientation {
        let mut rows = [IVec3::ZERO; 3];
        for (i, row) in rows.iter_mut().enumerate() {
            let q = self.rows[i];
            *row = other.rows[0] * q.x + other.rows[1] * q.y + other.rows[2] * q.z;
        }
        Orientation { rows }
    }

    /// Rotate a lattice offset.
    pub fn apply(&self, v: IVec3) -> IVec3 {
        IVec3::new(self.rows[0].dot(v), self.rows[1].dot(v), self.rows[2].dot(v))
    }

    /// Pre-multiply by a world-space quarter turn.
    pub fn rotate_world(&mut self, axis: Axis, turns: i8) {
        *self = Orientation::quarter_turn(axis, turns).then_after(*self);
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// World-space placement of a piece. Cubes are children at integer offsets.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub position: Vec3,
    pub orientation: Orientation,
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            orientation: Orientation::IDENTITY,
        }
    }

    pub fn move_world(&mut self, delta: Vec3) {
        self.position += delta;
    }

    pub fn rotate_world(&mut self, axis: Axis, turns: i8) {
        self.orientation.rotate_world(axis, turns);
    }

    /// Child offset after rotation, relative to this transform's origin.
    pub fn rotated(&self, local: IVec3) -> Vec3 {
        self.orientation.apply(local).as_vec3()
    }

    /// World position of a child at `local`.
    pub fn world_point(&self, local: IVec3) -> Vec3 {
        self.position + self.rotated(local)
    }
}
