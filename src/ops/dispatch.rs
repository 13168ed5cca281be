//! Parallel Dispatch Layer
//!
//! This module selects the backend the parallel runner executes on, based on
//! the global [`Backend`] or an explicit choice.
//!
//! There is no fallback: a backend that is not compiled in, or whose device
//! cannot be acquired, fails with
//! [`Error::DeviceUnavailable`](crate::error::Error::DeviceUnavailable).

use crate::backend::{Backend, get_backend};
use crate::BATCH_SIZE;
#[cfg(not(feature = "wgpu"))]
use crate::error::Error;
use crate::error::{Result, check_len};
use crate::physics::RangeCalculator;
use crate::projectile::Projectile;

/// Runs the batch on the globally selected backend.
///
/// See [`run_parallel_on`].
pub fn run_parallel(calc: &RangeCalculator, inputs: &[Projectile]) -> Result<Vec<Projectile>> {
    run_parallel_on(get_backend(), calc, inputs)
}

/// Runs the batch on `backend`, blocking until every task has completed.
///
/// # Errors
/// - [`Error::SizeMismatch`](crate::error::Error::SizeMismatch) unless
///   `inputs.len() == BATCH_SIZE`
/// - [`Error::DeviceUnavailable`](crate::error::Error::DeviceUnavailable)
///   when `backend` cannot be acquired
/// - [`Error::ExecutionFailure`](crate::error::Error::ExecutionFailure)
///   when any task fails
pub fn run_parallel_on(
    backend: Backend,
    calc: &RangeCalculator,
    inputs: &[Projectile],
) -> Result<Vec<Projectile>> {
    check_len(BATCH_SIZE, inputs.len())?;
    log::debug!("dispatching {} projectiles to {backend}", inputs.len());

    match backend {
        Backend::Cpu => super::cpu::run_parallel(calc, inputs),
        Backend::Wgpu => {
            #[cfg(feature = "wgpu")]
            {
                super::wgpu::run_parallel(calc, inputs)
            }
            #[cfg(not(feature = "wgpu"))]
            {
                Err(Error::DeviceUnavailable {
                    backend,
                    reason: "built without the `wgpu` feature".to_string(),
                })
            }
        }
    }
}
