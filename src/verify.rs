//! Equivalence checking between two output batches.
//!
//! [`compare`] is the oracle: exact, field-by-field, short-circuiting on the
//! first mismatch. [`verify`] is the reporting form used by the harness; it
//! names the first diverging index and can optionally apply a tolerance.

use crate::BATCH_SIZE;
use crate::approx::{F32_GPU_ERROR, RelativeEq};
use crate::error::{Error, Result, check_len};
use crate::projectile::Projectile;

/// How two projectiles are judged equal.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Comparison {
    /// Bitwise-equal fields (`PartialEq`).
    #[default]
    Exact,
    /// Every field within `relative` of its counterpart.
    Tolerance { relative: f32 },
}

impl Comparison {
    /// Tolerance suitable for comparing GPU output against the scalar path.
    pub const GPU: Self = Self::Tolerance {
        relative: F32_GPU_ERROR,
    };

    fn matches(self, a: &Projectile, b: &Projectile) -> bool {
        match self {
            Self::Exact => a == b,
            Self::Tolerance { relative } => a.relative_eq(b, relative),
        }
    }
}

/// Returns `true` iff both batches hold `BATCH_SIZE` pairwise-equal projectiles.
///
/// # Example
/// ```
/// use projectile_range::{BATCH_SIZE, projectile::Projectile, verify::compare};
///
/// let a = vec![Projectile::new(45.0, 100.0); BATCH_SIZE];
/// assert!(compare(&a, &a.clone()));
/// assert!(!compare(&a, &a[1..]));
/// ```
pub fn compare(a: &[Projectile], b: &[Projectile]) -> bool {
    verify(a, b, Comparison::Exact).is_ok()
}

/// Checks both batches under `mode`.
///
/// # Errors
/// - [`Error::SizeMismatch`] if either batch is not `BATCH_SIZE` long.
/// - [`Error::VerificationMismatch`] with the first diverging index.
pub fn verify(a: &[Projectile], b: &[Projectile], mode: Comparison) -> Result<()> {
    check_len(BATCH_SIZE, a.len())?;
    check_len(BATCH_SIZE, b.len())?;

    match a.iter().zip(b).position(|(x, y)| !mode.matches(x, y)) {
        Some(index) => Err(Error::VerificationMismatch { index }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch() -> Vec<Projectile> {
        (0..BATCH_SIZE)
            .map(|i| Projectile::new(10.0 + i as f32 * 0.5, 100.0))
            .collect()
    }

    #[test]
    fn identical_batches_match() {
        let a = batch();
        assert!(compare(&a, &a.clone()));
        assert_eq!(verify(&a, &a, Comparison::GPU), Ok(()));
    }

    #[test]
    fn reports_first_mismatch() {
        let a = batch();
        let mut b = a.clone();
        b[17].range = 1.0;
        b[42].range = 1.0;
        assert!(!compare(&a, &b));
        assert_eq!(
            verify(&a, &b, Comparison::Exact),
            Err(Error::VerificationMismatch { index: 17 })
        );
    }

    #[test]
    fn tolerance_absorbs_rounding_only() {
        let a = batch();
        let mut b = a.clone();
        b[5].velocity = f32::from_bits(b[5].velocity.to_bits() + 1);
        assert!(!compare(&a, &b));
        assert_eq!(verify(&a, &b, Comparison::GPU), Ok(()));

        b[9].velocity = 150.0;
        assert_eq!(
            verify(&a, &b, Comparison::GPU),
            Err(Error::VerificationMismatch { index: 9 })
        );
    }

    #[test]
    fn tolerance_is_per_field() {
        let calc = crate::physics::RangeCalculator::default();
        let scalar = vec![calc.compute(&Projectile::new(45.0, 409.0)); BATCH_SIZE];

        let mut skewed = scalar.clone();
        skewed[0].flight_time *= 3.0;
        assert_eq!(
            verify(&skewed, &scalar, Comparison::GPU),
            Err(Error::VerificationMismatch { index: 0 })
        );

        let mut skewed = scalar.clone();
        skewed[4].range += 300.0;
        assert_eq!(
            verify(&skewed, &scalar, Comparison::GPU),
            Err(Error::VerificationMismatch { index: 4 })
        );
    }

    #[test]
    fn wrong_length_is_rejected() {
        let a = batch();
        assert!(!compare(&a, &a[..BATCH_SIZE - 1]));
        assert_eq!(
            verify(&a[..3], &a[..3], Comparison::Exact),
            Err(Error::SizeMismatch {
                expected: BATCH_SIZE,
                found: 3
            })
        );
    }
}
