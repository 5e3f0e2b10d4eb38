//! Spatial helpers shared by the grid, pieces and the stack.
//!
//! Positions are `f32` world coordinates. Cubes live on half-unit lattice
//! points, but descent moves them by fractions of a unit every tick, so all
//! comparisons go through explicit rounding.

use glam::Vec3;

use crate::types::CUBE_SIZE;

/// Round to `decimals` places, halves toward positive infinity.
#[inline]
pub fn round_to(value: f32, decimals: i32) -> f32 {
    let f = 10f32.powi(decimals);
    (value * f + 0.5).floor() / f
}

/// Snap a value to the nearest multiple of `tolerance`.
///
/// Divides by the reciprocal instead of multiplying by `tolerance`: `1e-4` is
/// not exact in `f32`, while its reciprocal rounds to exactly `10000`.
#[inline]
pub fn snap(value: f32, tolerance: f32) -> f32 {
    let steps = (value / tolerance + 0.5).floor();
    steps / tolerance.recip()
}

/// Snap every component of a position to the nearest multiple of `tolerance`.
pub fn snap_vec(position: Vec3, tolerance: f32) -> Vec3 {
    Vec3::new(
        snap(position.x, tolerance),
        snap(position.y, tolerance),
        snap(position.z, tolerance),
    )
}

/// Euclidean distance rounded to two decimals.
#[inline]
pub fn rounded_distance(a: Vec3, b: Vec3) -> f32 {
    round_to(a.distance(b), 2)
}

/// Whether two cubes of edge `size` overlap.
///
/// Symmetric in `a` and `b`.
pub fn overlaps_with_size(a: Vec3, b: Vec3, size: f32) -> bool {
    rounded_distance(a, b) < size
}

/// Whether two unit cubes overlap.
pub fn overlaps(a: Vec3, b: Vec3) -> bool {
    overlaps_with_size(a, b, CUBE_SIZE)
}

/// Whether a height lies on the layer at `layer_y` (two-decimal rounding).
pub fn same_layer(y: f32, layer_y: f32) -> bool {
    round_to(y - layer_y, 2) == 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_matches_decimal_rounding() {
        assert_eq!(round_to(1.234, 2), 1.23);
        assert_eq!(round_to(0.999, 2), 1.0);
        assert_eq!(round_to(-2.46, 1), -2.5);
    }

    #[test]
    fn snap_absorbs_float_noise() {
        assert_eq!(snap(1.499_999_9, 1e-4), 1.5);
        assert_eq!(snap(-1.500_01, 1e-4), -1.5);
        assert_eq!(snap(1.5, 1e-4), 1.5);
    }

    #[test]
    fn overlap_is_symmetric() {
        let pts = [
            Vec3::new(0.5, -4.5, 0.5),
            Vec3::new(0.5, -3.55, 0.5),
            Vec3::new(1.5, -4.5, 0.5),
            Vec3::new(0.5, -3.5, 0.5),
            Vec3::new(0.9, -4.2, 0.1),
        ];
        for &a in &pts {
            for &b in &pts {
                assert_eq!(overlaps(a, b), overlaps(b, a));
            }
        }
    }

    #[test]
    fn touching_cubes_do_not_overlap() {
        let a = Vec3::new(0.5, -4.5, 0.5);
        assert!(!overlaps(a, Vec3::new(0.5, -3.5, 0.5)));
        assert!(!overlaps(a, Vec3::new(1.5, -4.5, 0.5)));
        // 0.998 rounds to 1.00, which is not closer than one cube.
        assert!(!overlaps(a, Vec3::new(0.5, -3.502, 0.5)));
        assert!(overlaps(a, Vec3::new(0.5, -3.6, 0.5)));
        assert!(overlaps(a, a));
    }

    #[test]
    fn same_layer_tolerates_small_drift() {
        assert!(same_layer(-4.501, -4.5));
        assert!(!same_layer(-4.45, -4.5));
    }
}
