//! CSV export emission
//!
//! Serializes an [`ExportTable`] to UTF-8 CSV and wraps it in a file-download
//! response named after the moment the export was generated.

use crate::error::Result;
use crate::table::ExportTable;
use crate::types::TicketFailure;
use axum::{
    http::{
        HeaderName, HeaderValue, StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use chrono::{DateTime, FixedOffset, Utc};
use csv::{Terminator, WriterBuilder};
use std::io::Write;

/// Response header listing tickets that could not be fetched
pub const FAILED_TICKETS_HEADER: &str = "x-export-failed-tickets";

/// Response header carrying the number of tickets that could not be fetched
pub const FAILED_COUNT_HEADER: &str = "x-export-failed-count";

/// Most ticket IDs written into [`FAILED_TICKETS_HEADER`]; longer lists end in `,...`
pub const FAILED_TICKETS_LISTED: usize = 100;

/// Download filename for an export generated at `now`, e.g.
/// `FreshdeskComments - 2024-03-05 14-07-09.csv`
pub fn export_filename(prefix: &str, now: DateTime<Utc>, offset: FixedOffset) -> String {
    format!(
        "{} - {}.csv",
        prefix,
        now.with_timezone(&offset).format("%Y-%m-%d %H-%M-%S")
    )
}

/// Write `table` as CSV, header first
pub fn write_csv<W: Write>(table: &ExportTable, writer: W) -> Result<()> {
    let mut csv = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(table.header())?;
    for record in table.records() {
        let ticket = record.ticket.to_string();
        csv.write_record([ticket.as_str(), record.comment.as_str()])?;
    }
    csv.flush()?;
    Ok(())
}

/// Serialize `table` into an in-memory CSV document
pub fn to_csv_bytes(table: &ExportTable) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    Ok(buf)
}

/// A finished export, ready to be sent as a file attachment
#[derive(Debug, Clone)]
pub struct CsvExport {
    /// Attachment filename, including the `.csv` extension
    pub filename: String,
    /// Serialized CSV document
    pub body: Vec<u8>,
    /// Tickets that were attempted but could not be fetched
    pub failed_tickets: Vec<TicketFailure>,
}

impl CsvExport {
    /// Serialize `table` and name the export after `now`
    pub fn build(
        table: &ExportTable,
        failed_tickets: Vec<TicketFailure>,
        prefix: &str,
        now: DateTime<Utc>,
        offset: FixedOffset,
    ) -> Result<Self> {
        Ok(Self {
            filename: export_filename(prefix, now, offset),
            body: to_csv_bytes(table)?,
            failed_tickets,
        })
    }
}

impl IntoResponse for CsvExport {
    fn into_response(self) -> Response {
        let mut response = (
            StatusCode::OK,
            [
                (CONTENT_TYPE, HeaderValue::from_static("text/csv; charset=UTF-8")),
                (
                    HeaderName::from_static("content-description"),
                    HeaderValue::from_static("File Transfer"),
                ),
            ],
            self.body,
        )
            .into_response();

        match HeaderValue::from_str(&format!("attachment; filename=\"{}\"", self.filename)) {
            Ok(value) => {
                response.headers_mut().insert(CONTENT_DISPOSITION, value);
            }
            Err(e) => {
                tracing::warn!(filename = %self.filename, error = %e, "unencodable export filename");
                response.headers_mut().insert(
                    CONTENT_DISPOSITION,
                    HeaderValue::from_static("attachment; filename=\"export.csv\""),
                );
            }
        }

        let failed = self.failed_tickets.len();
        response.headers_mut().insert(
            HeaderName::from_static(FAILED_COUNT_HEADER),
            HeaderValue::from(failed),
        );

        if failed > 0 {
            let mut ids = self
                .failed_tickets
                .iter()
                .take(FAILED_TICKETS_LISTED)
                .map(|f| f.ticket.to_string())
                .collect::<Vec<_>>()
                .join(",");
            if failed > FAILED_TICKETS_LISTED {
                ids.push_str(",...");
            }
            if let Ok(value) = HeaderValue::from_str(&ids) {
                response
                    .headers_mut()
                    .insert(HeaderName::from_static(FAILED_TICKETS_HEADER), value);
            }
        }

        response
    }
}
