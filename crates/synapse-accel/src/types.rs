use serde::{Deserialize, Serialize};
use std::fmt;

/// Status returned by the runtime's handle-creation call.
/// Only `SUCCESS` counts; every other value is a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(pub i32);

impl StatusCode {
    pub const SUCCESS: StatusCode = StatusCode(0);
    pub const NOT_INITIALIZED: StatusCode = StatusCode(1);
    pub const ALLOC_FAILED: StatusCode = StatusCode(3);
    pub const INVALID_VALUE: StatusCode = StatusCode(7);
    pub const ARCH_MISMATCH: StatusCode = StatusCode(8);
    pub const MAPPING_ERROR: StatusCode = StatusCode(11);
    pub const EXECUTION_FAILED: StatusCode = StatusCode(13);
    pub const INTERNAL_ERROR: StatusCode = StatusCode(14);
    pub const NOT_SUPPORTED: StatusCode = StatusCode(15);
    pub const LICENSE_ERROR: StatusCode = StatusCode(16);

    #[inline]
    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    /// cuBLAS name for the code, for diagnostics only.
    pub fn name(self) -> &'static str {
        match self.0 {
            0 => "CUBLAS_STATUS_SUCCESS",
            1 => "CUBLAS_STATUS_NOT_INITIALIZED",
            3 => "CUBLAS_STATUS_ALLOC_FAILED",
            7 => "CUBLAS_STATUS_INVALID_VALUE",
            8 => "CUBLAS_STATUS_ARCH_MISMATCH",
            11 => "CUBLAS_STATUS_MAPPING_ERROR",
            13 => "CUBLAS_STATUS_EXECUTION_FAILED",
            14 => "CUBLAS_STATUS_INTERNAL_ERROR",
            15 => "CUBLAS_STATUS_NOT_SUPPORTED",
            16 => "CUBLAS_STATUS_LICENSE_ERROR",
            _ => "CUBLAS_STATUS_UNKNOWN",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.0)
    }
}

/// The one result a probe hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeOutcome {
    Available,
    Unavailable,
}

impl ProbeOutcome {
    pub fn from_status(status: StatusCode) -> Self {
        if status.is_success() {
            ProbeOutcome::Available
        } else {
            ProbeOutcome::Unavailable
        }
    }

    #[inline]
    pub fn is_available(self) -> bool {
        matches!(self, ProbeOutcome::Available)
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Available => f.write_str("available"),
            ProbeOutcome::Unavailable => f.write_str("unavailable"),
        }
    }
}

/// Diagnostic view of one probe. The outcome is identical to what
/// `probe_acceleration` would return; the rest is best-effort detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccelReport {
    pub outcome: ProbeOutcome,

    #[serde(default)]
    pub library: Option<String>, // name or path that loaded
    #[serde(default)]
    pub status: Option<StatusCode>,
    #[serde(default)]
    pub status_name: Option<String>,

    // why the outcome is unavailable (library_not_found/create_failed/timeout/...)
    #[serde(default)]
    pub reason: Option<String>,

    #[serde(default)]
    pub cublas_version: Option<String>,
    pub probe_ms: u64,
}

impl AccelReport {
    pub(crate) fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            outcome: ProbeOutcome::Unavailable,
            library: None,
            status: None,
            status_name: None,
            reason: Some(reason.into()),
            cublas_version: None,
            probe_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_zero_is_success() {
        assert!(StatusCode(0).is_success());
        for code in [1, 3, 7, 8, 11, 13, 14, 15, 16, -1, 42] {
            assert!(!StatusCode(code).is_success(), "code {code}");
            assert_eq!(
                ProbeOutcome::from_status(StatusCode(code)),
                ProbeOutcome::Unavailable
            );
        }
        assert_eq!(
            ProbeOutcome::from_status(StatusCode::SUCCESS),
            ProbeOutcome::Available
        );
    }

    #[test]
    fn unknown_codes_have_a_name() {
        assert_eq!(StatusCode(99).name(), "CUBLAS_STATUS_UNKNOWN");
        assert_eq!(
            StatusCode::ALLOC_FAILED.to_string(),
            "CUBLAS_STATUS_ALLOC_FAILED (3)"
        );
    }
}
