use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

pub const TIMEOUT_ENV: &str = "SYNAPSE_PROBE_TIMEOUT_MS";
pub const DISABLE_ENV: &str = "SYNAPSE_ACCEL_DISABLE";
pub const CUBLAS_LIB_ENV: &str = "SYNAPSE_CUBLAS_LIB";

const DEFAULT_TIMEOUT_MS: u64 = 2000;
const MIN_TIMEOUT_MS: u64 = 200;

pub fn env_timeout_ms() -> u64 {
    std::env::var(TIMEOUT_ENV)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|&v| v >= MIN_TIMEOUT_MS)
        .unwrap_or(DEFAULT_TIMEOUT_MS)
}

pub fn disabled() -> bool {
    std::env::var(DISABLE_ENV)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

pub fn cublas_override() -> Option<String> {
    std::env::var(CUBLAS_LIB_ENV)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Run a closure on a worker thread and join with timeout.
/// Returns (result, maybe_reason, elapsed_ms)
pub fn with_timeout<T: Send + 'static, F: FnOnce() -> T + Send + 'static>(
    label: &str,
    dur: Duration,
    f: F,
) -> (Option<T>, Option<String>, u64) {
    let (tx, rx) = mpsc::channel();
    let start = Instant::now();
    thread::spawn(move || {
        let out = f();
        let _ = tx.send(out);
    });
    let res = rx.recv_timeout(dur).ok();
    let ms = start.elapsed().as_millis() as u64;
    if res.is_none() {
        (None, Some(format!("{label}_timeout")), ms)
    } else {
        (res, None, ms)
    }
}
