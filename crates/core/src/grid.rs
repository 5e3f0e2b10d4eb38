//! Grid module - the play field's lattice and world-space bounds
//!
//! The grid is centered on its anchor. Cell centers sit on the lattice
//! `left_ws + x * spacing` (and likewise for y/z), so with the default spacing
//! of 1 and an even width the centers land on half units: a 4-wide grid spans
//! x in [-1.5, 1.5].
//!
//! Coordinates: x grows to the right, y grows upward (layer 0 is the floor),
//! z grows toward the viewer.

use glam::{IVec3, Vec3};

use crate::error::SetupError;
use crate::spatial::snap;
use crate::types::{BOUNDS_TOLERANCE, GRID_DEPTH, GRID_HEIGHT, GRID_SPACING, GRID_WIDTH};

/// Fixed-size 3D play field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    width: u32,
    height: u32,
    depth: u32,
    spacing: f32,
    anchor: Vec3,
}

impl Grid {
    /// Create a grid anchored at the origin.
    pub fn new(width: u32, height: u32, depth: u32, spacing: f32) -> Result<Self, SetupError> {
        for (axis, value) in [("width", width), ("height", height), ("depth", depth)] {
            if value == 0 {
                return Err(SetupError::InvalidDimension { axis, value });
            }
        }
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(SetupError::InvalidSpacing(spacing));
        }
        Ok(Self {
            width,
            height,
            depth,
            spacing,
            anchor: Vec3::ZERO,
        })
    }

    /// Reposition the anchor. This is the only way bounds change.
    pub fn with_anchor(mut self, anchor: Vec3) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    /// Number of cubes in a completely full layer.
    pub fn cells_per_layer(&self) -> usize {
        (self.width as usize) * (self.depth as usize)
    }

    fn half_extent(&self, cells: u32) -> f32 {
        ((cells as f32 - 1.0 / self.spacing) * self.spacing) / 2.0
    }

    pub fn left(&self) -> f32 {
        -self.half_extent(self.width)
    }

    pub fn right(&self) -> f32 {
        self.half_extent(self.width)
    }

    pub fn bottom(&self) -> f32 {
        -self.half_extent(self.height)
    }

    pub fn top(&self) -> f32 {
        self.half_extent(self.height)
    }

    pub fn back(&self) -> f32 {
        -self.half_extent(self.depth)
    }

    pub fn front(&self) -> f32 {
        self.half_extent(self.depth)
    }

    pub fn left_ws(&self) -> f32 {
        self.left() + self.anchor.x
    }

    pub fn right_ws(&self) -> f32 {
        self.right() + self.anchor.x
    }

    pub fn bottom_ws(&self) -> f32 {
        self.bottom() + self.anchor.y
    }

    pub fn top_ws(&self) -> f32 {
        self.top() + self.anchor.y
    }

    pub fn back_ws(&self) -> f32 {
        self.back() + self.anchor.z
    }

    pub fn front_ws(&self) -> f32 {
        self.front() + self.anchor.z
    }

    /// World position of a grid coordinate. Coordinates outside the grid are
    /// extrapolated along the lattice.
    pub fn grid_to_world(&self, cell: IVec3) -> Vec3 {
        Vec3::new(
            self.left_ws() + cell.x as f32 * self.spacing,
            self.bottom_ws() + cell.y as f32 * self.spacing,
            self.back_ws() + cell.z as f32 * self.spacing,
        )
    }

    /// Inverse of [`Grid::grid_to_world`], without rounding.
    pub fn world_to_grid(&self, position: Vec3) -> Vec3 {
        Vec3::new(
            (position.x - self.left_ws()) / self.spacing,
            (position.y - self.bottom_ws()) / self.spacing,
            (position.z - self.back_ws()) / self.spacing,
        )
    }

    /// Nearest lattice cell of a world position.
    pub fn nearest_cell(&self, position: Vec3) -> IVec3 {
        self.world_to_grid(position).round().as_ivec3()
    }

    /// World height of layer `index` (0 is the floor layer).
    pub fn layer_y(&self, index: u32) -> f32 {
        self.bottom_ws() + index as f32 * self.spacing
    }

    /// Where new pieces appear: centered horizontally, one layer above the
    /// first row outside the grid.
    pub fn spawn_position(&self) -> Vec3 {
        self.grid_to_world(IVec3::new(
            (self.width / 2) as i32,
            self.height as i32 + 1,
            (self.depth / 2) as i32,
        ))
    }

    pub fn is_within_x(&self, position: Vec3, tolerance: f32) -> bool {
        let x = snap(position.x, tolerance);
        x >= self.left_ws() && x <= self.right_ws()
    }

    pub fn is_within_y(&self, position: Vec3, tolerance: f32) -> bool {
        let y = snap(position.y, tolerance);
        y >= self.bottom_ws() && y <= self.top_ws()
    }

    pub fn is_within_z(&self, position: Vec3, tolerance: f32) -> bool {
        let z = snap(position.z, tolerance);
        z >= self.back_ws() && z <= self.front_ws()
    }

    /// Inclusive bounds check on all three axes.
    pub fn is_within(&self, position: Vec3, tolerance: f32) -> bool {
        self.is_within_x(position, tolerance)
            && self.is_within_y(position, tolerance)
            && self.is_within_z(position, tolerance)
    }

    /// Horizontal bounds check with the default tolerance.
    pub fn contains_xz(&self, position: Vec3) -> bool {
        self.is_within_x(position, BOUNDS_TOLERANCE) && self.is_within_z(position, BOUNDS_TOLERANCE)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            depth: GRID_DEPTH,
            spacing: GRID_SPACING,
            anchor: Vec3::ZERO,
        }
    }
}
