//! Export form handler.

use super::{ExportForm, GenOption, LoginMode};
use crate::api::AppState;
use crate::error::{Error, Result};
use crate::export::CsvExport;
use crate::pipeline::ExportPipeline;
use crate::selector;
use crate::types::{Credentials, ExportRequest, Selection, TicketId};
use axum::{
    Form,
    extract::{State, rejection::FormRejection},
};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// POST /export - Export ticket comments as CSV
#[utoipa::path(
    post,
    path = "/export",
    tag = "export",
    request_body(content = ExportForm, description = "Export form", content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "CSV attachment; failure count in X-Export-Failed-Count, first 100 failed IDs in X-Export-Failed-Tickets", content_type = "text/csv"),
        (status = 400, description = "Missing or invalid form field, unreadable form body, or too many tickets selected", body = crate::error::ApiError),
        (status = 422, description = "More random tickets requested than the range holds", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError)
    )
)]
pub async fn export_comments(
    State(state): State<AppState>,
    form: std::result::Result<Form<ExportForm>, FormRejection>,
) -> Result<CsvExport> {
    let Form(form) = form.map_err(|rejection| Error::validation("form", rejection.body_text()))?;
    let request = ExportRequest::try_from(form)?;
    let export_config = &state.config.export;
    enforce_ticket_limit(&request.selection, export_config.max_tickets)?;
    let offset = export_config.utc_offset()?;

    let pipeline = ExportPipeline::new(state.source.as_ref(), export_config.failed_ticket_policy);
    let mut rng = StdRng::from_entropy();
    let outcome = pipeline.run(&request, &mut rng).await?;

    CsvExport::build(
        &outcome.table,
        outcome.failures,
        &export_config.filename_prefix,
        chrono::Utc::now(),
        offset,
    )
}

impl TryFrom<ExportForm> for ExportRequest {
    type Error = Error;

    fn try_from(form: ExportForm) -> Result<Self> {
        let login_mode: LoginMode = required("loginMode", form.login_mode)?
            .parse()
            .map_err(|e: String| Error::validation("loginMode", e))?;
        let domain = parse_domain(required("domain", form.domain)?)?;

        let credentials = match login_mode {
            LoginMode::ApiLogin => Credentials::ApiKey(required_raw("apiKey", form.api_key)?),
            LoginMode::EmailLogin => Credentials::EmailPassword {
                email: required_raw("id", form.id)?,
                password: required_raw("password", form.password)?,
            },
        };

        let gen_option: GenOption = required("genOptions", form.gen_options)?
            .parse()
            .map_err(|e: String| Error::validation("genOptions", e))?;

        let min = parse_number("minTicket", form.min_ticket)?;
        if min == 0 {
            return Err(Error::validation("minTicket", "must be at least 1"));
        }
        let min = TicketId(min);
        let max = TicketId(parse_number("maxTicket", form.max_ticket)?);

        let selection = match gen_option {
            GenOption::Sequential => Selection::Sequential { min, max },
            GenOption::Random => Selection::Random {
                min,
                max,
                count: parse_number("generateNum", form.generate_num)?,
            },
        };

        Ok(ExportRequest {
            domain,
            credentials,
            selection,
        })
    }
}

fn required(field: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(Error::validation(field, "is required")),
    }
}

/// Like [`required`] but keeps the value byte for byte; credentials are sent as typed
fn required_raw(field: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::validation(field, "is required")),
    }
}

/// Reject selections larger than the configured per-export limit, before anything is
/// materialized or fetched
fn enforce_ticket_limit(selection: &Selection, limit: u64) -> Result<()> {
    let requested = selector::ticket_count(selection);
    if requested <= limit {
        return Ok(());
    }
    let field = match selection {
        Selection::Sequential { .. } => "maxTicket",
        Selection::Random { .. } => "generateNum",
    };
    Err(Error::validation(
        field,
        format!("selects {requested} tickets, more than the limit of {limit}"),
    ))
}

fn parse_number(field: &str, value: Option<String>) -> Result<u64> {
    required(field, value)?
        .parse()
        .map_err(|_| Error::validation(field, "must be a non-negative integer"))
}

/// Accept only a single DNS label so the domain can't point the request elsewhere
fn parse_domain(domain: String) -> Result<String> {
    let valid = domain.len() <= 63
        && !domain.starts_with('-')
        && !domain.ends_with('-')
        && domain.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(domain.to_ascii_lowercase())
    } else {
        Err(Error::validation(
            "domain",
            "must be a helpdesk subdomain (letters, digits and hyphens)",
        ))
    }
}
