//! Utilities to approximate equality of floating point values.
//!
//! Used by [`Comparison::Tolerance`](crate::verify::Comparison) when two
//! backends evaluate the same formulas with different arithmetic (the GPU
//! kernel has no `f64`), so exact equality is not expected.

use crate::projectile::Projectile;

/// Relative epsilon the GPU path is held to.
pub const F32_GPU_ERROR: f32 = 1e-3;

/// Checks the relative distance based off epsilon.
pub trait RelativeEq<Rhs: ?Sized = Self> {
    /// Whether `self` and `rhs` are within `epsilon` of each other, relative
    /// to the larger magnitude (or absolutely, below `1.0`).
    fn relative_eq(&self, rhs: &Rhs, epsilon: f32) -> bool;
}

impl RelativeEq for f32 {
    fn relative_eq(&self, rhs: &Self, epsilon: f32) -> bool {
        if self == rhs {
            return true;
        }
        if !self.is_finite() || !rhs.is_finite() {
            return false;
        }
        let scale = self.abs().max(rhs.abs()).max(1.0);
        (self - rhs).abs() <= epsilon * scale
    }
}

/// Field by field: each lane is held to its own magnitude.
impl RelativeEq for Projectile {
    fn relative_eq(&self, rhs: &Self, epsilon: f32) -> bool {
        self.to_lanes()
            .iter()
            .zip(rhs.to_lanes().iter())
            .all(|(a, b)| a.relative_eq(b, epsilon))
    }
}
