//! C ABI surface. Foreign callers get a plain `bool`: `true` iff a cuBLAS
//! handle could be created.

use std::panic;

use crate::probe::probe_acceleration;

#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn initializeGPUMatrixAcceleration() -> bool {
    // never unwind across the boundary
    panic::catch_unwind(probe_acceleration)
        .map(|outcome| outcome.is_available())
        .unwrap_or(false)
}
