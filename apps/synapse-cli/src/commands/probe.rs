use anyhow::Result;
use std::process::ExitCode;
use tracing::info;

use synapse_accel::{probe_acceleration, probe_report, ProbeOutcome};

/// Exit code 0 when a handle could be created, 2 otherwise.
pub fn run(json: bool) -> Result<ExitCode> {
    let (outcome, text) = render(json)?;
    println!("{text}");
    info!(%outcome, "acceleration probe");
    Ok(ExitCode::from(exit_status(outcome)))
}

fn render(json: bool) -> Result<(ProbeOutcome, String)> {
    if json {
        let report = probe_report();
        Ok((report.outcome, serde_json::to_string_pretty(&report)?))
    } else {
        let outcome = probe_acceleration();
        Ok((outcome, format!("GPU matrix acceleration: {outcome}")))
    }
}

fn exit_status(outcome: ProbeOutcome) -> u8 {
    if outcome.is_available() {
        0
    } else {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use synapse_accel::util::DISABLE_ENV;

    #[test]
    fn exit_status_per_outcome() {
        assert_eq!(exit_status(ProbeOutcome::Available), 0);
        assert_eq!(exit_status(ProbeOutcome::Unavailable), 2);
    }

    #[test]
    #[serial(cli_env)]
    fn disabled_env_exits_with_two() {
        temp_env::with_var(DISABLE_ENV, Some("1"), || {
            let want = format!("{:?}", ExitCode::from(2));
            assert_eq!(format!("{:?}", run(false).unwrap()), want);
            assert_eq!(format!("{:?}", run(true).unwrap()), want);
        });
    }

    #[test]
    #[serial(cli_env)]
    fn plain_output_names_the_outcome() {
        temp_env::with_var(DISABLE_ENV, Some("1"), || {
            let (outcome, text) = render(false).unwrap();
            assert_eq!(outcome, ProbeOutcome::Unavailable);
            assert_eq!(text, "GPU matrix acceleration: unavailable");
        });
    }

    #[test]
    #[serial(cli_env)]
    fn json_report_carries_the_reason() {
        temp_env::with_var(DISABLE_ENV, Some("1"), || {
            let (outcome, text) = render(true).unwrap();
            assert_eq!(outcome, ProbeOutcome::Unavailable);
            let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
            assert_eq!(doc["outcome"], "unavailable");
            assert_eq!(doc["reason"], "disabled_env");
        });
    }
}
