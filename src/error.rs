//! Error taxonomy for the compute-and-verify pipeline.

use crate::backend::Backend;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong between generating inputs and the verdict.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No execution context could be acquired for the requested backend.
    #[error("no {backend} execution backend available: {reason}")]
    DeviceUnavailable { backend: Backend, reason: String },

    /// At least one dispatched task failed; `failed` lists their indices.
    #[error("parallel execution failed on {} task(s) {failed:?}: {reason}", .failed.len())]
    ExecutionFailure { failed: Vec<usize>, reason: String },

    /// A batch did not have the expected number of elements.
    #[error("expected a batch of {expected} projectiles, got {found}")]
    SizeMismatch { expected: usize, found: usize },

    /// Scalar and parallel outputs first diverge at `index`.
    #[error("parallel and scalar results differ at index {index}")]
    VerificationMismatch { index: usize },
}

impl Error {
    /// Whether the harness must abort instead of reporting a verdict.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::DeviceUnavailable { .. } | Self::ExecutionFailure { .. }
        )
    }
}

/// Fails with [`Error::SizeMismatch`] unless `found == expected`.
pub(crate) fn check_len(expected: usize, found: usize) -> Result<()> {
    if found == expected {
        Ok(())
    } else {
        Err(Error::SizeMismatch { expected, found })
    }
}
