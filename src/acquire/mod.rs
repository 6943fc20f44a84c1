//! Media acquisition.
//!
//! The [`Acquirer`] drives the external fetch tool for one request, rotating
//! through relays on failure and finishing with one direct attempt.

mod error;
mod orchestrator;

pub use error::{AcquisitionFailed, AttemptError, AttemptFailure};
pub use orchestrator::{AcquisitionRequest, Acquirer, DEFAULT_MAX_ATTEMPTS};
