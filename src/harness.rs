//! The compute-and-verify harness.
//!
//! One run generates a batch of random launches, computes it on the
//! configured parallel backend, recomputes it sequentially and checks the two
//! outputs against each other. The phases are strictly ordered:
//! parallel run, scalar run, comparison.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::BATCH_SIZE;
use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::ops::{dispatch::run_parallel_on, scalar::run_scalar};
use crate::physics::{HeightFormula, RangeCalculator};
use crate::projectile::Projectile;
use crate::verify::{Comparison, verify};

/// Knobs for one harness run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarnessConfig {
    /// Seed for input generation; `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Backend the parallel path runs on.
    pub backend: Backend,
    /// Formula used for the peak height on both paths.
    pub height_formula: HeightFormula,
    /// How the two output batches are compared.
    pub comparison: Comparison,
}

impl HarnessConfig {
    /// Default configuration for `backend`.
    ///
    /// The CPU paths share one implementation and are compared exactly; the
    /// GPU kernel runs in `f32` and gets [`Comparison::GPU`].
    pub fn for_backend(backend: Backend) -> Self {
        let comparison = match backend {
            Backend::Cpu => Comparison::Exact,
            Backend::Wgpu => Comparison::GPU,
        };
        Self {
            seed: None,
            backend,
            height_formula: HeightFormula::default(),
            comparison,
        }
    }

    /// Same configuration with a fixed seed.
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::for_backend(Backend::Cpu)
    }
}

/// Outcome of a run that completed without a fatal error.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Seed the inputs were generated from.
    pub seed: u64,
    /// The generated inputs.
    pub inputs: Vec<Projectile>,
    /// Output of the parallel path.
    pub parallel: Vec<Projectile>,
    /// Output of the scalar path.
    pub scalar: Vec<Projectile>,
    /// First index where the outputs diverge, if any.
    pub mismatch: Option<usize>,
}

impl Report {
    /// Whether the parallel and scalar outputs agreed.
    pub fn passed(&self) -> bool {
        self.mismatch.is_none()
    }
}

/// Generates `BATCH_SIZE` launches with angle in `10..=99` and velocity in
/// `10..=409`, both whole numbers, outputs zeroed.
pub fn generate_inputs<R: Rng>(rng: &mut R) -> Vec<Projectile> {
    (0..BATCH_SIZE)
        .map(|_| {
            let angle = rng.random_range(10..=99u16);
            let velocity = rng.random_range(10..=409u16);
            Projectile::new(f32::from(angle), f32::from(velocity))
        })
        .collect()
}

/// Runs the harness once.
///
/// # Errors
/// Only fatal errors ([`Error::is_fatal`]) and size mismatches propagate. A
/// verification mismatch is reported through [`Report::mismatch`].
pub fn run(config: &HarnessConfig) -> Result<Report> {
    run_with(config, |calc, inputs| {
        run_parallel_on(config.backend, calc, inputs)
    })
}

/// [`run`] with the parallel phase supplied by the caller.
pub(crate) fn run_with<P>(config: &HarnessConfig, parallel_run: P) -> Result<Report>
where
    P: FnOnce(&RangeCalculator, &[Projectile]) -> Result<Vec<Projectile>>,
{
    let seed = config.seed.unwrap_or_else(rand::random);
    log::info!("seed {seed}, backend {}", config.backend);

    let inputs = generate_inputs(&mut StdRng::seed_from_u64(seed));
    let calc = RangeCalculator::new(config.height_formula);

    let parallel = parallel_run(&calc, &inputs).inspect_err(|e| {
        log::error!("parallel run aborted: {e}");
    })?;
    let scalar = run_scalar(&calc, &inputs)?;

    let mismatch = match verify(&parallel, &scalar, config.comparison) {
        Ok(()) => None,
        Err(Error::VerificationMismatch { index }) => {
            log::warn!(
                "mismatch at {index}: parallel {} vs scalar {}",
                parallel[index],
                scalar[index]
            );
            Some(index)
        }
        Err(e) => return Err(e),
    };

    log::info!(
        "verdict: {}",
        if mismatch.is_none() { "match" } else { "mismatch" }
    );

    Ok(Report {
        seed,
        inputs,
        parallel,
        scalar,
        mismatch,
    })
}
