//! Application state for the HTTP server

use crate::Config;
use crate::client::ConversationSource;
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request (cheap Arc clone). Holds nothing export-specific.
#[derive(Clone)]
pub struct AppState {
    /// Where ticket conversations are fetched from
    pub source: Arc<dyn ConversationSource>,

    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(source: Arc<dyn ConversationSource>, config: Arc<Config>) -> Self {
        Self { source, config }
    }
}
