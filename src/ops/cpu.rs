//! Parallel CPU backend
//!
//! # CPU Backend
//!
//! This module provides the data-parallel executor used when the active
//! backend is [`Backend::Cpu`](crate::backend::Backend::Cpu), and the
//! projectile runner built on top of it.
//!
//! ## Features
//!
//! - Parallel execution using [`rayon`](https://docs.rs/rayon)
//! - One dedicated thread pool per run, dropped once the run returns
//! - Per-task panic isolation: failures are collected, not propagated
//!
//! ## Design Goals
//!
//! - Deterministic results regardless of scheduling: every task writes only
//!   its own output slot
//! - Modular: the executor knows nothing about projectiles

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;

use crate::BATCH_SIZE;
use crate::backend::Backend;
use crate::error::{Error, Result, check_len};
use crate::physics::RangeCalculator;
use crate::projectile::Projectile;

/// A rayon thread pool acquired for one parallel run.
pub struct CpuExecutor {
    pool: rayon::ThreadPool,
}

impl CpuExecutor {
    /// Builds a pool with `threads` workers, or one per core when `threads == 0`.
    ///
    /// # Errors
    /// [`Error::DeviceUnavailable`] if the pool cannot be built (e.g. the OS
    /// refuses to spawn threads).
    pub fn acquire(threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("projectile-worker-{i}"))
            .build()
            .map_err(|e| Error::DeviceUnavailable {
                backend: Backend::Cpu,
                reason: e.to_string(),
            })?;

        log::info!(
            "Target device: cpu thread pool ({} threads)",
            pool.current_num_threads()
        );
        Ok(Self { pool })
    }

    /// Number of worker threads in the pool.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Runs `task(i, &mut outputs[i])` for every index, in any order, and
    /// returns once all of them have finished.
    ///
    /// A panicking task does not stop the others; once the barrier is reached
    /// the failed indices are reported together.
    ///
    /// # Errors
    /// [`Error::ExecutionFailure`] listing the failed indices in ascending
    /// order, with the first failure's panic message as the reason.
    ///
    /// # Example
    /// ```
    /// use projectile_range::ops::cpu::CpuExecutor;
    ///
    /// let executor = CpuExecutor::acquire(2).unwrap();
    /// let mut squares = vec![0usize; 8];
    /// executor.for_each_index(&mut squares, |i, slot| *slot = i * i).unwrap();
    /// assert_eq!(squares[7], 49);
    /// ```
    pub fn for_each_index<T, F>(&self, outputs: &mut [T], task: F) -> Result<()>
    where
        T: Send,
        F: Fn(usize, &mut T) + Sync,
    {
        let failures: Vec<(usize, String)> = self.pool.install(|| {
            outputs
                .par_iter_mut()
                .enumerate()
                .filter_map(|(i, slot)| {
                    panic::catch_unwind(AssertUnwindSafe(|| task(i, slot)))
                        .err()
                        .map(|payload| (i, panic_message(payload.as_ref())))
                })
                .collect()
        });

        match failures.first() {
            None => Ok(()),
            Some((_, reason)) => {
                let reason = reason.clone();
                let failed = failures.into_iter().map(|(i, _)| i).collect();
                Err(Error::ExecutionFailure { failed, reason })
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "task panicked".to_string()
    }
}

/// Computes every projectile of the batch on a fresh CPU thread pool.
///
/// # Errors
/// - [`Error::SizeMismatch`] unless `inputs.len() == BATCH_SIZE`
/// - [`Error::DeviceUnavailable`] / [`Error::ExecutionFailure`] from the executor
pub fn run_parallel(calc: &RangeCalculator, inputs: &[Projectile]) -> Result<Vec<Projectile>> {
    check_len(BATCH_SIZE, inputs.len())?;

    let executor = CpuExecutor::acquire(0)?;
    let mut out = vec![Projectile::default(); inputs.len()];
    executor.for_each_index(&mut out, |i, slot| *slot = calc.compute(&inputs[i]))?;

    log::debug!(
        "cpu run computed {} projectiles on {} threads",
        out.len(),
        executor.threads()
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_every_slot_once() {
        let executor = CpuExecutor::acquire(4).unwrap();
        assert_eq!(executor.threads(), 4);

        let mut out = vec![usize::MAX; 1000];
        executor.for_each_index(&mut out, |i, slot| *slot = i).unwrap();
        assert!(out.iter().enumerate().all(|(i, &v)| i == v));
    }

    #[test]
    fn aggregates_panicking_tasks() {
        let executor = CpuExecutor::acquire(3).unwrap();
        let mut out = vec![0u32; 50];
        let err = executor
            .for_each_index(&mut out, |i, slot| {
                if i % 20 == 7 {
                    panic!("bad index {i}");
                }
                *slot = 1;
            })
            .unwrap_err();

        match err {
            Error::ExecutionFailure { failed, reason } => {
                assert_eq!(failed, vec![7, 27, 47]);
                assert_eq!(reason, "bad index 7");
            }
            other => panic!("unexpected error {other:?}"),
        }
        // the healthy tasks still ran
        assert_eq!(out.iter().filter(|&&v| v == 1).count(), 47);
    }

    #[test]
    fn run_parallel_matches_compute() {
        let calc = RangeCalculator::default();
        let inputs: Vec<_> = (0..BATCH_SIZE)
            .map(|i| Projectile::new(10.0 + (i % 90) as f32, 10.0 + 4.0 * i as f32))
            .collect();
        let out = run_parallel(&calc, &inputs).unwrap();
        for (input, output) in inputs.iter().zip(&out) {
            assert_eq!(*output, calc.compute(input));
        }
    }

    #[test]
    fn run_parallel_rejects_wrong_batch_size() {
        let calc = RangeCalculator::default();
        assert_eq!(
            run_parallel(&calc, &[Projectile::default(); 3]),
            Err(Error::SizeMismatch {
                expected: BATCH_SIZE,
                found: 3
            })
        );
    }
}
