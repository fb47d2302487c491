//! Synapse acceleration probe.
//! Reports whether cuBLAS can hand out a handle on this machine. The library is
//! located at run time, so nothing here links against the CUDA toolkit.

pub mod cublas;
pub mod errors;
pub mod ffi;
pub mod probe;
pub mod runtime;
pub mod types;
pub mod util;

pub use cublas::{CublasRuntime, RawHandle};
pub use errors::{AccelError, Result};
pub use ffi::initializeGPUMatrixAcceleration;
pub use probe::{probe_acceleration, probe_report, probe_with};
pub use runtime::{BlasRuntime, HandleGuard};
pub use types::{AccelReport, ProbeOutcome, StatusCode};
