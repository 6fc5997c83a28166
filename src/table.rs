//! In-memory export table
//!
//! [`ExportTable`] owns the rows of one export. It always starts with the fixed
//! header and only grows by appending, so row order is the order tickets were
//! processed and, within a ticket, the order the helpdesk returned its comments.

use crate::types::{CommentRecord, TicketId};

/// Column headers of every export
pub const HEADER: [&str; 2] = ["Ticket ID", "Comments"];

/// Ordered `(ticket, comment)` rows under the fixed [`HEADER`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportTable {
    records: Vec<CommentRecord>,
}

impl ExportTable {
    /// A table holding only the header row
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one row per comment for `ticket`, keeping comment order
    pub fn append_rows<I>(&mut self, ticket: TicketId, comments: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.records
            .extend(comments.into_iter().map(|comment| CommentRecord { ticket, comment }));
    }

    /// The header row
    pub fn header(&self) -> &'static [&'static str; 2] {
        &HEADER
    }

    /// Data rows, excluding the header
    pub fn records(&self) -> &[CommentRecord] {
        &self.records
    }

    /// Number of data rows, excluding the header
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Number of rows including the header
    pub fn len(&self) -> usize {
        self.records.len() + 1
    }

    /// Whether the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
