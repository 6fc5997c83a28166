//! Error types for freshdesk-export
//!
//! Two layers of errors exist:
//! - [`Error`] aborts a whole export request (bad input, exhausted sampling, startup failures)
//! - [`FetchError`] is scoped to a single ticket and never aborts the export
//!
//! [`ApiError`] is the JSON envelope returned by the HTTP surface, and [`ToHttpStatus`]
//! maps domain errors onto status codes and machine-readable codes.

use crate::types::TicketId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for freshdesk-export operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for freshdesk-export
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "export.utc_offset_seconds")
        key: Option<String>,
    },

    /// A submitted form field is missing or invalid
    #[error("invalid {field}: {message}")]
    Validation {
        /// Form field name as submitted (e.g., "minTicket")
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// Random sampling asked for more distinct tickets than the range holds
    #[error("cannot sample {requested} distinct tickets from a range of {available}")]
    SelectionExhausted {
        /// Number of tickets requested
        requested: u64,
        /// Number of ticket IDs in the range
        available: u64,
    },

    /// Network error outside of a per-ticket fetch (e.g., building the HTTP client)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV encoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a validation error for a form field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error for a config key
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}

/// Failure to fetch the conversations of one ticket
///
/// The pipeline records these and moves on to the next ticket.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the response body could not be read
    #[error("request for ticket {ticket} failed: {source}")]
    Transport {
        /// Ticket being fetched
        ticket: TicketId,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The helpdesk answered with a non-success status (bad credentials, unknown ticket, ...)
    #[error("helpdesk returned HTTP {status} for ticket {ticket}")]
    Status {
        /// Ticket being fetched
        ticket: TicketId,
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// The conversations URL could not be built from the configured template
    #[error("invalid conversations URL for ticket {ticket}: {reason}")]
    InvalidUrl {
        /// Ticket being fetched
        ticket: TicketId,
        /// Why the URL was rejected
        reason: String,
    },
}

impl FetchError {
    /// The ticket this failure belongs to
    pub fn ticket(&self) -> TicketId {
        match self {
            FetchError::Transport { ticket, .. }
            | FetchError::Status { ticket, .. }
            | FetchError::InvalidUrl { ticket, .. } => *ticket,
        }
    }
}

/// API error response format
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "validation_error",
///     "message": "invalid minTicket: must be a positive integer",
///     "details": {
///       "field": "minTicket"
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "validation_error", "selection_exhausted")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create an "internal server error"
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - the submitted form is unusable
            Error::Validation { .. } => 400,

            // 422 Unprocessable Entity - well-formed but unsatisfiable
            Error::SelectionExhausted { .. } => 422,

            // 502 Bad Gateway - helpdesk unreachable outside a ticket fetch
            Error::Network(_) => 502,

            // 500 Internal Server Error
            Error::Config { .. } => 500,
            Error::Serialization(_) => 500,
            Error::Csv(_) => 500,
            Error::Io(_) => 500,
            Error::ApiServerError(_) => 500,
            Error::Other(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Validation { .. } => "validation_error",
            Error::SelectionExhausted { .. } => "selection_exhausted",
            Error::Network(_) => "network_error",
            Error::Serialization(_) => "serialization_error",
            Error::Csv(_) => "csv_error",
            Error::Io(_) => "io_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::Other(_) => "internal_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::Validation { field, .. } => Some(serde_json::json!({
                "field": field,
            })),
            Error::SelectionExhausted {
                requested,
                available,
            } => Some(serde_json::json!({
                "requested": requested,
                "available": available,
            })),
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({
                "key": key,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
