//! projectile_range: parallel/scalar equivalence harness for projectile motion.
//!
//! Computes range, time of flight and peak height for a batch of projectiles
//! twice, once through a data-parallel backend and once sequentially, and
//! checks that both paths agree.
//!
//! # Modules
//!
//! - [`projectile`] — The per-object value type.
//! - [`physics`] — The formulas, shared by every CPU path.
//! - [`ops`] — Scalar runner, parallel backends and their dispatch.
//! - [`backend`] — Global selection of the parallel backend.
//! - [`verify`] — The equivalence checker, with [`approx`] for tolerances.
//! - [`error`] — The error taxonomy shared by every stage.
//! - [`harness`] — Input generation and the ordered run/verify pipeline.
//!
//! # Example
//!
//! ```rust
//! use projectile_range::harness::{run, HarnessConfig};
//!
//! let report = run(&HarnessConfig::default().with_seed(7)).unwrap();
//! assert!(report.passed());
//! ```

pub mod approx;
pub mod backend;
pub mod error;
pub mod harness;
pub mod ops;
pub mod physics;
pub mod projectile;
pub mod verify;

/// Number of projectiles in every batch.
pub const BATCH_SIZE: usize = 100;

pub use error::{Error, Result};
