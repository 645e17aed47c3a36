//! Structured error handling and exit codes.

use serde::Serialize;

use crate::session::{SessionOutcome, SessionStatus};

/// Exit codes for the dupsleuth binary.
///
/// - 0: Success (scan completed, duplicates found and quarantined)
/// - 1: General error (session-fatal failure)
/// - 2: No duplicates (scan completed, nothing to quarantine)
/// - 3: Partial success (completed with some non-fatal per-file errors)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Scan completed and duplicates were quarantined.
    Success = 0,
    /// A session-fatal error occurred.
    GeneralError = 1,
    /// Scan completed but found no duplicates.
    NoDuplicates = 2,
    /// Scan completed but some files were skipped or failed to move.
    PartialSuccess = 3,
    /// Scan was interrupted by the user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::NoDuplicates => "DS002",
            Self::PartialSuccess => "DS003",
            Self::Interrupted => "DS130",
        }
    }

    /// Map a terminal session outcome to the process exit code.
    #[must_use]
    pub fn from_outcome(outcome: &SessionOutcome) -> Self {
        match outcome.status {
            SessionStatus::Failed => Self::GeneralError,
            SessionStatus::Cancelled => Self::Interrupted,
            SessionStatus::Completed => {
                if outcome.counts.errors > 0 || outcome.counts.quarantine_failures > 0 {
                    Self::PartialSuccess
                } else if outcome.counts.duplicates == 0 {
                    Self::NoDuplicates
                } else {
                    Self::Success
                }
            }
        }
    }
}

/// Structured error information for `--json-errors` output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DS001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: err.to_string(),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionCounts;

    fn outcome(status: SessionStatus, counts: SessionCounts) -> SessionOutcome {
        SessionOutcome {
            status,
            counts,
            quarantine_outcomes: Vec::new(),
            error: None,
        }
    }

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
        assert_eq!(ExitCode::NoDuplicates.as_i32(), 2);
        assert_eq!(ExitCode::PartialSuccess.as_i32(), 3);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
    }

    #[test]
    fn test_from_outcome_success() {
        let counts = SessionCounts {
            total_discovered: 3,
            scanned: 3,
            duplicates: 1,
            quarantined: 1,
            ..Default::default()
        };
        assert_eq!(
            ExitCode::from_outcome(&outcome(SessionStatus::Completed, counts)),
            ExitCode::Success
        );
    }

    #[test]
    fn test_from_outcome_no_duplicates() {
        let counts = SessionCounts {
            total_discovered: 3,
            scanned: 3,
            ..Default::default()
        };
        assert_eq!(
            ExitCode::from_outcome(&outcome(SessionStatus::Completed, counts)),
            ExitCode::NoDuplicates
        );
    }

    #[test]
    fn test_from_outcome_partial_success() {
        let counts = SessionCounts {
            total_discovered: 3,
            scanned: 3,
            errors: 1,
            ..Default::default()
        };
        assert_eq!(
            ExitCode::from_outcome(&outcome(SessionStatus::Completed, counts)),
            ExitCode::PartialSuccess
        );
    }

    #[test]
    fn test_from_outcome_terminal_states() {
        assert_eq!(
            ExitCode::from_outcome(&outcome(SessionStatus::Failed, SessionCounts::default())),
            ExitCode::GeneralError
        );
        assert_eq!(
            ExitCode::from_outcome(&outcome(SessionStatus::Cancelled, SessionCounts::default())),
            ExitCode::Interrupted
        );
    }

    #[test]
    fn test_structured_error_fields() {
        let err = anyhow::anyhow!("scan root does not exist: /missing");
        let structured = StructuredError::new(&err, ExitCode::GeneralError);

        assert_eq!(structured.code, "DS001");
        assert_eq!(structured.exit_code, 1);
        assert!(structured.message.contains("/missing"));
        assert!(!structured.interrupted);
    }
}
