//! Common error types used throughout reelcast.
//!
//! Every failure that can reach an HTTP client funnels into [`Error`], which
//! knows its own status code via [`Error::http_status`].

/// Common error type for reelcast.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested video was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The media could not be acquired from the remote source.
    #[error("Acquisition failed: {0}")]
    Acquisition(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new Acquisition error.
    pub fn acquisition<S: Into<String>>(msg: S) -> Self {
        Self::Acquisition(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Map this error to an HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::NotFound(_) => 404,
            Error::InvalidInput(_) => 400,
            Error::Io(_) => 500,
            Error::Acquisition(_) => 502,
            Error::Internal(_) => 500,
        }
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
