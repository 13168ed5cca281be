//! # Runner Layer
//!
//! This module applies [`RangeCalculator`](crate::physics::RangeCalculator)
//! to a whole batch, either sequentially or through a data-parallel backend.
//!
//! ## Submodules
//!
//! - [`scalar`] — Sequential reference runner, index order `0..N`
//! - [`cpu`] — Multi-threaded CPU executor built on `rayon` (default backend)
//! - [`wgpu`] *(opt-in)* — GPU compute shader pipeline using `wgpu`
//! - [`dispatch`] — Runtime backend selection for the parallel runner
//!
//! ## Contract
//!
//! Every runner takes a batch of exactly [`BATCH_SIZE`](crate::BATCH_SIZE)
//! inputs, returns a freshly allocated output batch of the same length and
//! writes output `i` from input `i` only. Parallel runners block until every
//! task has finished.
//!
//! Example:
//! ```rust
//! use projectile_range::ops::{dispatch::run_parallel, scalar::run_scalar};
//! use projectile_range::{BATCH_SIZE, physics::RangeCalculator, projectile::Projectile};
//!
//! let calc = RangeCalculator::default();
//! let inputs = vec![Projectile::new(45.0, 100.0); BATCH_SIZE];
//! let parallel = run_parallel(&calc, &inputs).unwrap();
//! let scalar = run_scalar(&calc, &inputs).unwrap();
//! assert_eq!(parallel, scalar);
//! ```
//!
//! ## Feature Flags
//!
//! - `wgpu` — Enables the `wgpu` (WebGPU) backend

pub mod cpu;
pub mod dispatch;
pub mod scalar;
#[cfg(feature = "wgpu")]
pub mod wgpu;
