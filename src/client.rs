//! Helpdesk API client
//!
//! [`ConversationSource`] is the seam the export pipeline fetches through;
//! [`HelpdeskClient`] is the real implementation against the Freshdesk v2 API.
//!
//! One GET per ticket, no retries. A fetch either yields the ticket's conversations
//! or a [`FetchError`] scoped to that ticket.

use crate::config::HelpdeskConfig;
use crate::error::{FetchError, Result};
use crate::types::{Conversation, Credentials, TicketId};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

/// Longest response body kept in a [`FetchError::Status`]
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Something that can list the conversations of a ticket
#[async_trait]
pub trait ConversationSource: Send + Sync {
    /// Fetch the conversations of `ticket` on the helpdesk at `domain`
    async fn fetch_conversations(
        &self,
        domain: &str,
        ticket: TicketId,
        credentials: &Credentials,
    ) -> std::result::Result<Vec<Conversation>, FetchError>;
}

/// Freshdesk API client
#[derive(Clone, Debug)]
pub struct HelpdeskClient {
    http: reqwest::Client,
    config: HelpdeskConfig,
}

impl HelpdeskClient {
    /// Build a client from configuration
    ///
    /// Redirects are followed up to `max_redirects`, responses are decompressed, and
    /// TLS is verified against the bundled webpki roots. There is no timeout unless
    /// `request_timeout_secs` is set.
    pub fn new(config: HelpdeskConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.clone())
            .gzip(true)
            .deflate(true)
            .brotli(true);

        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        let http = builder.build()?;
        Ok(Self { http, config })
    }

    /// Conversations endpoint for a ticket
    pub fn conversations_url(
        &self,
        domain: &str,
        ticket: TicketId,
    ) -> std::result::Result<url::Url, FetchError> {
        let raw = format!(
            "{}/tickets/{}/conversations",
            self.config.api_base(domain),
            ticket
        );
        url::Url::parse(&raw).map_err(|e| FetchError::InvalidUrl {
            ticket,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl ConversationSource for HelpdeskClient {
    async fn fetch_conversations(
        &self,
        domain: &str,
        ticket: TicketId,
        credentials: &Credentials,
    ) -> std::result::Result<Vec<Conversation>, FetchError> {
        let url = self.conversations_url(domain, ticket)?;
        let (username, password) = credentials.basic_auth();

        tracing::debug!(ticket_id = %ticket, url = %url, "fetching conversations");

        let response = self
            .http
            .get(url)
            .basic_auth(username, Some(password))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .send()
            .await
            .map_err(|source| FetchError::Transport { ticket, source })?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY_CHARS)
                .collect();
            return Err(FetchError::Status {
                ticket,
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport { ticket, source })?;

        Ok(parse_conversations(ticket, &bytes))
    }
}

/// Decode a conversations payload
///
/// An empty body, `null`, or anything that isn't a list of conversation objects
/// counts as a ticket with no conversations.
pub fn parse_conversations(ticket: TicketId, body: &[u8]) -> Vec<Conversation> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Vec::new();
    }

    match serde_json::from_slice::<Option<Vec<Conversation>>>(body) {
        Ok(conversations) => conversations.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(
                ticket_id = %ticket,
                error = %e,
                "unexpected conversations payload, treating as no comments"
            );
            Vec::new()
        }
    }
}
