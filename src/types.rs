//! Core types for freshdesk-export

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Helpdesk ticket identifier
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct TicketId(pub u64);

impl TicketId {
    /// Create a new TicketId
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the inner u64 value
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for TicketId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<TicketId> for u64 {
    fn from(id: TicketId) -> Self {
        id.0
    }
}

impl PartialEq<u64> for TicketId {
    fn eq(&self, other: &u64) -> bool {
        self.0 == *other
    }
}

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TicketId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Credentials passed through to the helpdesk as HTTP Basic auth
///
/// Held only for the duration of one export. `Debug` never prints secrets.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// API key login: the key is the username, the password is empty
    ApiKey(String),
    /// Agent email and password login
    EmailPassword {
        /// Agent email address
        email: String,
        /// Agent password
        password: String,
    },
}

impl Credentials {
    /// Username and password for HTTP Basic auth
    pub fn basic_auth(&self) -> (&str, &str) {
        match self {
            Credentials::ApiKey(key) => (key, ""),
            Credentials::EmailPassword { email, password } => (email, password),
        }
    }

    /// Login mode tag, for logging
    pub fn mode(&self) -> &'static str {
        match self {
            Credentials::ApiKey(_) => "api-key",
            Credentials::EmailPassword { .. } => "email-password",
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::ApiKey(_) => f.debug_tuple("ApiKey").field(&"<redacted>").finish(),
            Credentials::EmailPassword { email, .. } => f
                .debug_struct("EmailPassword")
                .field("email", email)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

/// How the ticket IDs of an export are chosen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Every ticket in `[min, max]`
    Sequential {
        /// Lowest ticket ID, inclusive
        min: TicketId,
        /// Highest ticket ID, inclusive
        max: TicketId,
    },
    /// `count` distinct tickets drawn uniformly from `[min, max]`
    Random {
        /// Lowest ticket ID, inclusive
        min: TicketId,
        /// Highest ticket ID, inclusive
        max: TicketId,
        /// Number of tickets to draw
        count: u64,
    },
}

/// A validated export request
#[derive(Clone, Debug)]
pub struct ExportRequest {
    /// Helpdesk subdomain (`{domain}.freshdesk.com`)
    pub domain: String,
    /// Credentials for the helpdesk API
    pub credentials: Credentials,
    /// Ticket selection
    pub selection: Selection,
}

/// One conversation entry as returned by the helpdesk
///
/// Only the plain-text body is used; other fields are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Plain-text body of the comment (null in the payload becomes `None`)
    #[serde(default)]
    pub body_text: Option<String>,
}

impl Conversation {
    /// Create a conversation with the given body
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            body_text: Some(body.into()),
        }
    }
}

/// A single `(ticket, comment)` row of the export
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    /// Ticket the comment belongs to
    pub ticket: TicketId,
    /// Plain-text comment, empty for a ticket without comments
    pub comment: String,
}

/// A ticket whose conversations could not be fetched
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TicketFailure {
    /// Ticket that failed
    pub ticket: TicketId,
    /// Human-readable reason
    pub reason: String,
}
