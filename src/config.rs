//! Configuration types for freshdesk-export

use crate::error::{Error, Result};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::Path, time::Duration};

/// Main configuration
///
/// Every field has a default, so an empty JSON object is a valid configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Helpdesk API client settings
    #[serde(default)]
    pub helpdesk: HelpdeskConfig,

    /// Export file settings
    #[serde(default)]
    pub export: ExportConfig,

    /// API and external server integration
    #[serde(default)]
    pub server: ServerIntegrationConfig,
}

impl Config {
    /// Load a configuration from a JSON file, defaulting missing fields
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("failed to read {}: {}", path.display(), e),
            key: None,
        })?;
        let config: Config = serde_json::from_str(&raw).map_err(|e| Error::Config {
            message: format!("failed to parse {}: {}", path.display(), e),
            key: None,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde can't reject on its own
    pub fn validate(&self) -> Result<()> {
        self.export.utc_offset()?;

        let prefix = &self.export.filename_prefix;
        if prefix.trim().is_empty() {
            return Err(Error::config("export.filename_prefix", "must not be empty"));
        }
        if prefix
            .chars()
            .any(|c| c.is_control() || matches!(c, '"' | '/' | '\\'))
        {
            return Err(Error::config(
                "export.filename_prefix",
                "must not contain quotes, slashes or control characters",
            ));
        }

        if self.export.max_tickets == 0 {
            return Err(Error::config("export.max_tickets", "must be at least 1"));
        }

        let sample = self.helpdesk.api_base("example");
        url::Url::parse(&sample).map_err(|e| {
            Error::config(
                "helpdesk.api_base_template",
                format!("{sample:?} is not a valid URL: {e}"),
            )
        })?;

        Ok(())
    }
}

/// Helpdesk API client configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HelpdeskConfig {
    /// API base URL; `{domain}` is replaced by the submitted subdomain
    /// (default: "https://{domain}.freshdesk.com/api/v2")
    #[serde(default = "default_api_base_template")]
    pub api_base_template: String,

    /// Maximum redirects followed per request (default: 10)
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Per-request timeout in seconds (default: none, wait indefinitely)
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// User-Agent sent to the helpdesk
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HelpdeskConfig {
    fn default() -> Self {
        Self {
            api_base_template: default_api_base_template(),
            max_redirects: default_max_redirects(),
            request_timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

impl HelpdeskConfig {
    /// API base URL for a helpdesk subdomain, without trailing slash
    pub fn api_base(&self, domain: &str) -> String {
        self.api_base_template
            .replace("{domain}", domain)
            .trim_end_matches('/')
            .to_string()
    }

    /// Request timeout, if one is configured
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// What to write for a ticket whose conversations could not be fetched
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailedTicketPolicy {
    /// Leave the ticket out of the export
    #[default]
    Skip,
    /// Write one row whose comment describes the failure
    ErrorRow,
}

/// Export file configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Leading part of the download filename (default: "FreshdeskComments")
    #[serde(default = "default_filename_prefix")]
    pub filename_prefix: String,

    /// UTC offset used for the filename timestamp, in seconds (default: 28800, UTC+08:00)
    #[serde(default = "default_utc_offset_seconds")]
    pub utc_offset_seconds: i32,

    /// Handling of tickets whose fetch failed (default: skip)
    #[serde(default)]
    pub failed_ticket_policy: FailedTicketPolicy,

    /// Most tickets a single export may select (default: 10000)
    #[serde(default = "default_max_tickets")]
    pub max_tickets: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            filename_prefix: default_filename_prefix(),
            utc_offset_seconds: default_utc_offset_seconds(),
            failed_ticket_policy: FailedTicketPolicy::default(),
            max_tickets: default_max_tickets(),
        }
    }
}

impl ExportConfig {
    /// Filename timestamp offset
    pub fn utc_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_seconds).ok_or_else(|| {
            Error::config(
                "export.utc_offset_seconds",
                format!("{} is outside ±86399", self.utc_offset_seconds),
            )
        })
    }
}

/// Server integration configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ServerIntegrationConfig {
    /// REST API settings
    #[serde(default)]
    pub api: ApiConfig,
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:8080)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

// Default value functions
fn default_api_base_template() -> String {
    "https://{domain}.freshdesk.com/api/v2".into()
}

fn default_max_redirects() -> usize {
    10
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).into()
}

fn default_filename_prefix() -> String {
    "FreshdeskComments".into()
}

fn default_utc_offset_seconds() -> i32 {
    8 * 3600 // Asia/Kuala_Lumpur, no DST
}

fn default_max_tickets() -> u64 {
    10_000
}

fn default_true() -> bool {
    true
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}
