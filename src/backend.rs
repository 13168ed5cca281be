//! Backend selection module.
//!
//! This module defines the execution backends the parallel runner can
//! dispatch to and provides functions to set and get the current one.
//!
//! # Supported Backends
//!
//! - `Cpu` — rayon thread pool on the host (default).
//! - `Wgpu` — compute shader on a GPU adapter (requires the `wgpu` feature).
//!
//! The backend is stored globally using an `AtomicU8`, so the harness can
//! pick one before dispatch without threading it through every call.

use core::convert::TryFrom;
use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};

/// Enumeration of supported execution backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Backend {
    /// Multi-threaded CPU backend using `rayon` (default).
    #[default]
    Cpu = 0,
    /// GPU compute backend using `wgpu`.
    Wgpu = 1,
}

impl Backend {
    /// The most capable backend compiled into this build.
    pub const fn preferred() -> Self {
        if cfg!(feature = "wgpu") {
            Self::Wgpu
        } else {
            Self::Cpu
        }
    }
}

impl TryFrom<u8> for Backend {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Cpu),
            1 => Ok(Self::Wgpu),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => f.write_str("cpu"),
            Self::Wgpu => f.write_str("wgpu"),
        }
    }
}

/// Internal global state for the active backend.
///
/// Relaxed ordering is enough: the backend is chosen once before a run and
/// never changes while tasks are in flight.
static GLOBAL_DEFAULT_BACKEND: AtomicU8 = AtomicU8::new(Backend::Cpu as u8);

/// Sets the active backend for parallel dispatch.
///
/// # Example
/// ```
/// use projectile_range::backend::{set_backend, Backend};
/// set_backend(Backend::Cpu);
/// ```
pub fn set_backend(b: Backend) {
    GLOBAL_DEFAULT_BACKEND.store(b as u8, Ordering::Relaxed);
}

/// Returns the currently active backend.
///
/// If the stored value is invalid, defaults to `Backend::Cpu`.
pub fn get_backend() -> Backend {
    Backend::try_from(GLOBAL_DEFAULT_BACKEND.load(Ordering::Relaxed)).unwrap_or_default()
}
