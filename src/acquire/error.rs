//! Acquisition failure types.

use reelcast_common::Relay;
use std::fmt;
use std::path::PathBuf;

/// Why a single fetch attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttemptError {
    /// The tool ran and exited unsuccessfully.
    #[error("fetch exited unsuccessfully (code {code:?})")]
    Exited { code: Option<i32> },

    /// The tool ran and reported success, but left no file behind.
    #[error("fetch reported success but produced no file at {}", .path.display())]
    NoOutput { path: PathBuf },

    /// The tool could not be run at all.
    #[error("fetch could not be run: {0}")]
    Invocation(String),

    /// The requester went away and the tool was killed.
    #[error("fetch cancelled")]
    Cancelled,
}

impl AttemptError {
    /// Whether the fetch process actually ran to completion.
    pub fn process_ran(&self) -> bool {
        matches!(self, AttemptError::Exited { .. } | AttemptError::NoOutput { .. })
    }
}

/// One failed attempt, with the relay it went through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    /// 1-based attempt number.
    pub attempt: u32,
    /// Relay used, `None` for a direct attempt.
    pub relay: Option<Relay>,
    pub error: AttemptError,
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.relay {
            Some(relay) => write!(f, "attempt {} via {}: {}", self.attempt, relay, self.error),
            None => write!(f, "attempt {} direct: {}", self.attempt, self.error),
        }
    }
}

/// Acquisition could not produce a file.
#[derive(Debug, thiserror::Error)]
pub enum AcquisitionFailed {
    /// Every relay-backed attempt and the final direct attempt failed.
    #[error("download failed after {} attempts", .attempts.len())]
    Exhausted { attempts: Vec<AttemptFailure> },

    /// The requester went away before a file was produced.
    #[error("download cancelled after {} attempts", .attempts.len())]
    Cancelled { attempts: Vec<AttemptFailure> },
}

impl AcquisitionFailed {
    /// Every attempt made, in order.
    pub fn attempts(&self) -> &[AttemptFailure] {
        match self {
            AcquisitionFailed::Exhausted { attempts } | AcquisitionFailed::Cancelled { attempts } => {
                attempts
            }
        }
    }

    /// Error of the last attempt made.
    pub fn last_error(&self) -> Option<&AttemptError> {
        self.attempts().last().map(|failure| &failure.error)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, AcquisitionFailed::Cancelled { .. })
    }
}

impl From<AcquisitionFailed> for reelcast_common::Error {
    fn from(e: AcquisitionFailed) -> Self {
        match e.last_error() {
            Some(last) => reelcast_common::Error::acquisition(format!("{e}; last error: {last}")),
            None => reelcast_common::Error::acquisition(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(attempt: u32, error: AttemptError) -> AttemptFailure {
        AttemptFailure {
            attempt,
            relay: None,
            error,
        }
    }

    #[test]
    fn test_process_ran_distinguishes_invocation_failures() {
        assert!(AttemptError::Exited { code: Some(1) }.process_ran());
        assert!(AttemptError::NoOutput {
            path: PathBuf::from("/tmp/x.mp4")
        }
        .process_ran());
        assert!(!AttemptError::Invocation("spawn failed".into()).process_ran());
        assert!(!AttemptError::Cancelled.process_ran());
    }

    #[test]
    fn test_exhausted_display_and_last_error() {
        let err = AcquisitionFailed::Exhausted {
            attempts: vec![
                failure(1, AttemptError::Exited { code: Some(1) }),
                failure(
                    2,
                    AttemptError::NoOutput {
                        path: PathBuf::from("/v/a.mp4"),
                    },
                ),
            ],
        };
        assert_eq!(err.to_string(), "download failed after 2 attempts");
        assert!(matches!(err.last_error(), Some(AttemptError::NoOutput { .. })));
        assert!(!err.is_cancelled());
    }

    #[test]
    fn test_attempt_failure_display() {
        let relay: Relay = "1.2.3.4:80".parse().unwrap();
        let f = AttemptFailure {
            attempt: 3,
            relay: Some(relay),
            error: AttemptError::Exited { code: Some(2) },
        };
        assert_eq!(
            f.to_string(),
            "attempt 3 via 1.2.3.4:80: fetch exited unsuccessfully (code Some(2))"
        );
    }

    #[test]
    fn test_into_common_error_is_bad_gateway() {
        let err: reelcast_common::Error = AcquisitionFailed::Exhausted {
            attempts: vec![failure(1, AttemptError::Invocation("no yt-dlp".into()))],
        }
        .into();
        assert_eq!(err.http_status(), 502);
        assert!(err.to_string().contains("no yt-dlp"));
    }
}
