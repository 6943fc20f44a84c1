//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`reelcast_common::Error`] so that route
//! handlers can return `Result<T, AppError>` and use `?` freely.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reelcast_common::Error;
use serde_json::json;

use crate::acquire::AcquisitionFailed;

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError(Error);

impl AppError {
    pub fn new(inner: Error) -> Self {
        Self(inner)
    }

    pub fn inner(&self) -> &Error {
        &self.0
    }
}

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        Self::new(e)
    }
}

impl From<AcquisitionFailed> for AppError {
    fn from(e: AcquisitionFailed) -> Self {
        Self::new(e.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.0,
                "Server error in handler"
            );
        }

        let code = match &self.0 {
            Error::NotFound(_) => "not_found",
            Error::InvalidInput(_) => "invalid_input",
            Error::Io(_) => "io_error",
            Error::Acquisition(_) => "acquisition_failed",
            Error::Internal(_) => "internal_error",
        };

        let body = json!({
            "error": self.0.to_string(),
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
