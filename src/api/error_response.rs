//! HTTP error response handling
//!
//! Converts domain errors into JSON error bodies with matching status codes.
//! Export failures never reach the CSV body: they are answered here, before any
//! download starts.

use crate::error::{ApiError, Error, ToHttpStatus};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status_code.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        let api_error: ApiError = self.into();

        (status_code, Json(api_error)).into_response()
    }
}

/// Explicit `ApiError`s default to 500; errors with known status go through [`Error`]
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}
