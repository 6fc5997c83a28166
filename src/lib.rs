//! # freshdesk-export
//!
//! Export Freshdesk ticket conversations to a CSV download.
//!
//! A single form submission names a helpdesk, credentials, and a ticket range.
//! The service walks the selected tickets one by one, fetches each ticket's
//! conversations, flattens them to `(ticket, comment)` rows and answers with a
//! timestamped CSV attachment.
//!
//! ## Pipeline
//!
//! - [`selector`] - ticket IDs, sequential or randomly sampled
//! - [`client`] - one authenticated GET per ticket
//! - [`flatten`] - plain-text comment bodies
//! - [`table`] - rows under the fixed `Ticket ID,Comments` header
//! - [`export`] - CSV serialization and the download response
//! - [`pipeline`] - drives the steps above for one request
//!
//! ## Quick Start
//!
//! ```no_run
//! use freshdesk_export::{Config, ExportPipeline, HelpdeskClient};
//! use freshdesk_export::types::{Credentials, ExportRequest, Selection, TicketId};
//! use freshdesk_export::config::FailedTicketPolicy;
//! use rand::SeedableRng;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let client = HelpdeskClient::new(config.helpdesk.clone())?;
//!     let pipeline = ExportPipeline::new(&client, FailedTicketPolicy::Skip);
//!
//!     let request = ExportRequest {
//!         domain: "acme".to_string(),
//!         credentials: Credentials::ApiKey("your-api-key".to_string()),
//!         selection: Selection::Sequential { min: TicketId(100), max: TicketId(120) },
//!     };
//!
//!     let outcome = pipeline
//!         .run(&request, &mut rand::rngs::StdRng::from_entropy())
//!         .await?;
//!     let csv = freshdesk_export::export::to_csv_bytes(&outcome.table)?;
//!     std::fs::write("comments.csv", csv)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// HTTP server
pub mod api;
/// Helpdesk API client
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// CSV export emission
pub mod export;
/// Comment flattening
pub mod flatten;
/// Export pipeline driver
pub mod pipeline;
/// Ticket ID selection
pub mod selector;
/// Export table accumulation
pub mod table;
/// Core types
pub mod types;

// Re-export commonly used types
pub use client::{ConversationSource, HelpdeskClient};
pub use config::Config;
pub use error::{ApiError, Error, ErrorDetail, FetchError, Result, ToHttpStatus};
pub use pipeline::{ExportOutcome, ExportPipeline};
pub use table::ExportTable;
pub use types::{CommentRecord, Conversation, Credentials, ExportRequest, Selection, TicketId};

/// Resolve when the process is asked to stop.
///
/// - **Unix:** SIGTERM or SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** Ctrl+C via `tokio::signal::ctrl_c()`.
#[cfg(unix)]
pub async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Registration can fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register signal handlers, using ctrl_c fallback");
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

/// Resolve when the process is asked to stop (Ctrl+C).
#[cfg(not(unix))]
pub async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
