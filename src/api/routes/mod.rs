//! Route handlers
//!
//! - [`export`] — ticket comment export form
//! - [`system`] — health and OpenAPI

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

mod export;
mod system;

pub use export::*;
pub use system::*;

/// Form fields of `POST /export`
///
/// Field names match the HTML form that submits them. Every field is optional at
/// the decoding stage; which ones are required depends on `loginMode` and
/// `genOptions` and is checked when the form is turned into an export request.
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
pub struct ExportForm {
    /// `apiLogin` or `emailLogin`
    #[serde(rename = "loginMode")]
    pub login_mode: Option<String>,
    /// Helpdesk subdomain, e.g. `acme` for acme.freshdesk.com
    pub domain: Option<String>,
    /// API key (apiLogin)
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
    /// Agent email (emailLogin)
    pub id: Option<String>,
    /// Agent password (emailLogin)
    pub password: Option<String>,
    /// `sequential` or `random`
    #[serde(rename = "genOptions")]
    pub gen_options: Option<String>,
    /// Lowest ticket ID, inclusive
    #[serde(rename = "minTicket")]
    pub min_ticket: Option<String>,
    /// Highest ticket ID, inclusive
    #[serde(rename = "maxTicket")]
    pub max_ticket: Option<String>,
    /// Number of random tickets (random)
    #[serde(rename = "generateNum")]
    pub generate_num: Option<String>,
}

/// Accepted values of `loginMode`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub enum LoginMode {
    /// Authenticate with an API key
    #[serde(rename = "apiLogin")]
    ApiLogin,
    /// Authenticate with agent email and password
    #[serde(rename = "emailLogin")]
    EmailLogin,
}

impl std::str::FromStr for LoginMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apiLogin" => Ok(LoginMode::ApiLogin),
            "emailLogin" => Ok(LoginMode::EmailLogin),
            other => Err(format!(
                "unknown login mode {other:?}, expected apiLogin or emailLogin"
            )),
        }
    }
}

/// Accepted values of `genOptions`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GenOption {
    /// Every ticket between minTicket and maxTicket
    Sequential,
    /// generateNum distinct tickets between minTicket and maxTicket
    Random,
}

impl std::str::FromStr for GenOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sequential" => Ok(GenOption::Sequential),
            "random" => Ok(GenOption::Random),
            other => Err(format!(
                "unknown generation option {other:?}, expected sequential or random"
            )),
        }
    }
}
