//! Why a `swagtest` invocation stopped
//!
//! Every variant maps to a process exit status: `1` when tests ran and some
//! failed, `2` when the run could not be set up at all.

use std::path::PathBuf;
use swagtest::SwagError;
use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Exit status for a run with failing tests
pub const EXIT_TESTS_FAILED: u8 = 1;
/// Exit status when nothing could be run
pub const EXIT_SETUP_FAILED: u8 = 2;

/// Failure of one CLI invocation
#[derive(Debug, Error)]
pub enum CliError {
    /// `--config` file missing, unreadable or not a valid run configuration
    #[error("config file {}: {source}", path.display())]
    ConfigFile {
        /// File named by `--config` or `SWAGTEST_CONFIG`
        path: PathBuf,
        /// What went wrong reading it
        source: SwagError,
    },

    /// `--filter` selected no registered test
    #[error("no registered test matches {filter:?}")]
    NoMatchingTests {
        /// The filter as given
        filter: String,
    },

    /// The run completed and at least one test failed on its last attempt
    #[error("{failed} of {total} tests failed; report at {}", report.display())]
    TestsFailed {
        /// Tests that finally failed
        failed: usize,
        /// Tests executed
        total: usize,
        /// Path of `report.json`
        report: PathBuf,
    },

    /// The async runtime could not start
    #[error("cannot start test runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// `list --json` could not be rendered
    #[error("cannot render test list: {0}")]
    Json(#[from] serde_json::Error),

    /// Anything the library reports: invalid settings, unwritable reports
    #[error(transparent)]
    Swag(#[from] SwagError),
}

impl CliError {
    /// Process exit status for this failure
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::TestsFailed { .. } => EXIT_TESTS_FAILED,
            _ => EXIT_SETUP_FAILED,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_error_names_the_file() {
        let err = CliError::ConfigFile {
            path: PathBuf::from("swagtest.yaml"),
            source: SwagError::config("unknown field `retires`"),
        };
        let text = err.to_string();
        assert!(text.starts_with("config file swagtest.yaml:"));
        assert!(text.contains("retires"));
        assert_eq!(err.exit_code(), EXIT_SETUP_FAILED);
    }

    #[test]
    fn test_failed_run_points_at_report() {
        let err = CliError::TestsFailed {
            failed: 2,
            total: 31,
            report: PathBuf::from("target/swagtest/report.json"),
        };
        assert_eq!(
            err.to_string(),
            "2 of 31 tests failed; report at target/swagtest/report.json"
        );
        assert_eq!(err.exit_code(), EXIT_TESTS_FAILED);
    }

    #[test]
    fn test_unmatched_filter_message() {
        let err = CliError::NoMatchingTests {
            filter: "cart::nope".to_string(),
        };
        assert_eq!(err.to_string(), "no registered test matches \"cart::nope\"");
    }

    #[test]
    fn test_library_error_keeps_its_message() {
        let cli_err: CliError = SwagError::config("workers must be at least 1").into();
        assert_eq!(
            cli_err.to_string(),
            "Configuration error: workers must be at least 1"
        );
        assert_eq!(cli_err.exit_code(), EXIT_SETUP_FAILED);
    }
}
