//! Outcome reporting
//!
//! Every run ends in exactly one [`Outcome`]; this is the only place that
//! turns it into operator output and a process exit code.

use crate::error::{describe_error_code, Outcome};
use tracing::error;

/// Print how the run ended and return the process exit code
pub fn report_outcome<T>(outcome: &Outcome<T>, verbose: u8) -> i32 {
    match outcome {
        Outcome::Success(_) => {}
        Outcome::Cancelled { step } => {
            eprintln!("Release cancelled ({step})");
        }
        Outcome::Failed(err) => {
            error!("Fatal error: {}", err);
            eprintln!("{}", err.user_message());
            if verbose >= 1 {
                eprintln!("  {}", describe_error_code(err.code()));
            }
        }
    }
    outcome.exit_code()
}

/// Errors raised before a run can start, such as an unreadable working directory
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> i32 {
    error!("Fatal error: {}", error);
    eprintln!("Error: {error}");

    if verbose >= 1 {
        eprintln!("\nError chain:");
        for (i, cause) in error.chain().enumerate() {
            eprintln!("  {}: {}", i, cause);
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseError;
    use std::path::PathBuf;

    #[test]
    fn test_report_outcome_exit_codes() {
        assert_eq!(report_outcome(&Outcome::Success(()), 0), 0);
        assert_eq!(
            report_outcome::<()>(
                &Outcome::Cancelled {
                    step: "stage selection".to_string()
                },
                0
            ),
            3
        );
        let missing = Outcome::<()>::Failed(ReleaseError::ConfigMissing {
            path: PathBuf::from("release.config.yaml"),
        });
        assert_eq!(report_outcome(&missing, 1), 2);
    }

    #[test]
    fn test_fatal_error_exit_code() {
        assert_eq!(handle_fatal_error(anyhow::anyhow!("no cwd"), 0), 1);
    }
}
