use std::time::{Duration, Instant};
use tracing::debug;

use crate::cublas::CublasRuntime;
use crate::runtime::{BlasRuntime, HandleGuard};
use crate::types::{AccelReport, ProbeOutcome};
use crate::util;

/// Can cuBLAS create a handle on this machine right now?
///
/// Loads the library, creates one handle, releases it, and reports whether
/// creation returned `CUBLAS_STATUS_SUCCESS`. A missing driver or library is
/// `Unavailable`. Says nothing about device memory or later operations.
pub fn probe_acceleration() -> ProbeOutcome {
    if util::disabled() {
        debug!("acceleration probe disabled by env");
        return ProbeOutcome::Unavailable;
    }
    match CublasRuntime::load() {
        Ok(rt) => probe_with(&rt),
        Err(e) => {
            debug!(error = %e, "cuBLAS not loadable");
            ProbeOutcome::Unavailable
        }
    }
}

/// Acquire one handle from `runtime`, release it, report the outcome.
pub fn probe_with<R: BlasRuntime>(runtime: &R) -> ProbeOutcome {
    let guard = HandleGuard::acquire(runtime);
    let outcome = ProbeOutcome::from_status(guard.status());
    debug!(status = %guard.status(), %outcome, "handle probe finished");
    outcome
}

/// Same probe as `probe_acceleration`, with the detail kept: which library
/// loaded, the raw status, the cuBLAS version, and why it failed.
/// Bounded by `SYNAPSE_PROBE_TIMEOUT_MS`.
pub fn probe_report() -> AccelReport {
    if util::disabled() {
        return AccelReport::unavailable("disabled_env");
    }

    let to = Duration::from_millis(util::env_timeout_ms());
    let (out, reason, ms) = util::with_timeout("cublas", to, detect_report);
    match out {
        Some(mut report) => {
            report.probe_ms = ms;
            report
        }
        None => {
            let mut report = AccelReport::unavailable(reason.unwrap_or_else(|| "timeout".into()));
            report.probe_ms = ms;
            report
        }
    }
}

fn detect_report() -> AccelReport {
    let start = Instant::now();
    let rt = match CublasRuntime::load() {
        Ok(rt) => rt,
        Err(e) => {
            debug!(error = %e, "cuBLAS not loadable");
            return AccelReport::unavailable(e.reason());
        }
    };

    let guard = HandleGuard::acquire(&rt);
    let status = guard.status();
    let cublas_version = guard.handle().and_then(|h| rt.version(h));
    drop(guard);

    let outcome = ProbeOutcome::from_status(status);
    AccelReport {
        outcome,
        library: Some(rt.library().to_string()),
        status: Some(status),
        status_name: Some(status.name().to_string()),
        reason: if outcome.is_available() {
            None
        } else {
            Some(format!("create_failed:{}", status.name()))
        },
        cublas_version,
        probe_ms: start.elapsed().as_millis() as u64,
    }
}
