//! Sequential reference runner.

use crate::BATCH_SIZE;
use crate::error::{Result, check_len};
use crate::physics::RangeCalculator;
use crate::projectile::Projectile;

/// Applies `calc` to every input in index order on the calling thread.
///
/// # Errors
/// [`Error::SizeMismatch`](crate::error::Error::SizeMismatch) unless
/// `inputs.len() == BATCH_SIZE`.
pub fn run_scalar(calc: &RangeCalculator, inputs: &[Projectile]) -> Result<Vec<Projectile>> {
    check_len(BATCH_SIZE, inputs.len())?;

    let mut out = vec![Projectile::default(); inputs.len()];
    for (slot, input) in out.iter_mut().zip(inputs) {
        *slot = calc.compute(input);
    }

    log::debug!("scalar run computed {} projectiles", out.len());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn preserves_index_order() {
        let calc = RangeCalculator::default();
        let inputs: Vec<_> = (0..BATCH_SIZE)
            .map(|i| Projectile::new(10.0 + (i % 90) as f32, 10.0 + i as f32))
            .collect();
        let out = run_scalar(&calc, &inputs).unwrap();
        for (input, output) in inputs.iter().zip(&out) {
            assert_eq!(*output, calc.compute(input));
        }
    }

    #[test]
    fn rejects_wrong_batch_size() {
        let calc = RangeCalculator::default();
        let inputs = vec![Projectile::new(45.0, 100.0); BATCH_SIZE + 1];
        assert_eq!(
            run_scalar(&calc, &inputs),
            Err(Error::SizeMismatch {
                expected: BATCH_SIZE,
                found: BATCH_SIZE + 1
            })
        );
        assert!(run_scalar(&calc, &[]).is_err());
    }
}
