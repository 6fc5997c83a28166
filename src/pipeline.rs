//! Export pipeline
//!
//! Drives one export end to end: select ticket IDs, then for each ticket in order
//! fetch its conversations, flatten them, and append the rows to a fresh
//! [`ExportTable`]. Tickets are processed one at a time. A ticket that fails to
//! fetch is recorded and the loop moves on; only selection errors abort the run,
//! and they do so before any request is sent.

use crate::client::ConversationSource;
use crate::config::FailedTicketPolicy;
use crate::error::Result;
use crate::flatten::flatten_comments;
use crate::selector;
use crate::table::ExportTable;
use crate::types::{ExportRequest, TicketFailure, TicketId};
use rand::Rng;

/// Comment text written for a failed ticket under [`FailedTicketPolicy::ErrorRow`]
pub const FETCH_FAILED_MARKER: &str = "[fetch failed]";

/// Result of a completed export run
#[derive(Debug, Clone, Default)]
pub struct ExportOutcome {
    /// Rows gathered for every ticket that was processed
    pub table: ExportTable,
    /// Tickets whose conversations could not be fetched, in processing order
    pub failures: Vec<TicketFailure>,
}

/// Sequential fetch, flatten and accumulate loop over a [`ConversationSource`]
pub struct ExportPipeline<'a> {
    source: &'a dyn ConversationSource,
    policy: FailedTicketPolicy,
}

impl<'a> ExportPipeline<'a> {
    /// Create a pipeline reading from `source`
    pub fn new(source: &'a dyn ConversationSource, policy: FailedTicketPolicy) -> Self {
        Self { source, policy }
    }

    /// Select the request's tickets with `rng`, then export them
    pub async fn run<R>(&self, request: &ExportRequest, rng: &mut R) -> Result<ExportOutcome>
    where
        R: Rng + Send + ?Sized,
    {
        let tickets = selector::select(&request.selection, rng)?;
        Ok(self.export_tickets(request, &tickets).await)
    }

    /// Export exactly `tickets`, in the given order
    pub async fn export_tickets(
        &self,
        request: &ExportRequest,
        tickets: &[TicketId],
    ) -> ExportOutcome {
        tracing::info!(
            domain = %request.domain,
            login_mode = request.credentials.mode(),
            tickets = tickets.len(),
            "starting export"
        );

        let mut outcome = ExportOutcome::default();

        for &ticket in tickets {
            match self
                .source
                .fetch_conversations(&request.domain, ticket, &request.credentials)
                .await
            {
                Ok(conversations) => {
                    tracing::debug!(
                        ticket_id = %ticket,
                        comments = conversations.len(),
                        "fetched conversations"
                    );
                    outcome
                        .table
                        .append_rows(ticket, flatten_comments(&conversations));
                }
                Err(e) => {
                    tracing::warn!(ticket_id = %ticket, error = %e, "failed to fetch conversations");
                    if self.policy == FailedTicketPolicy::ErrorRow {
                        outcome
                            .table
                            .append_rows(ticket, [format!("{FETCH_FAILED_MARKER} {e}")]);
                    }
                    outcome.failures.push(TicketFailure {
                        ticket,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            rows = outcome.table.record_count(),
            failed = outcome.failures.len(),
            "export finished"
        );

        outcome
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, FetchError};
    use crate::types::{Conversation, Credentials, Selection};
    use async_trait::async_trait;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory helpdesk: unknown tickets answer 404
    #[derive(Default)]
    struct FakeHelpdesk {
        tickets: HashMap<u64, Vec<&'static str>>,
        calls: Mutex<Vec<TicketId>>,
    }

    impl FakeHelpdesk {
        fn with(mut self, ticket: u64, comments: &[&'static str]) -> Self {
            self.tickets.insert(ticket, comments.to_vec());
            self
        }

        fn calls(&self) -> Vec<TicketId> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ConversationSource for FakeHelpdesk {
        async fn fetch_conversations(
            &self,
            _domain: &str,
            ticket: TicketId,
            _credentials: &Credentials,
        ) -> std::result::Result<Vec<Conversation>, FetchError> {
            self.calls.lock().unwrap().push(ticket);
            match self.tickets.get(&ticket.get()) {
                Some(comments) => Ok(comments
                    .iter()
                    .map(|c| Conversation::with_body(*c))
                    .collect()),
                None => Err(FetchError::Status {
                    ticket,
                    status: 404,
                    body: String::new(),
                }),
            }
        }
    }

    fn request(selection: Selection) -> ExportRequest {
        ExportRequest {
            domain: "acme".into(),
            credentials: Credentials::ApiKey("abc123".into()),
            selection,
        }
    }

    fn sequential(min: u64, max: u64) -> Selection {
        Selection::Sequential {
            min: TicketId(min),
            max: TicketId(max),
        }
    }

    fn rows(outcome: &ExportOutcome) -> Vec<(u64, String)> {
        outcome
            .table
            .records()
            .iter()
            .map(|r| (r.ticket.get(), r.comment.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_sequential_export_example() {
        let helpdesk = FakeHelpdesk::default()
            .with(100, &["hi", "thanks"])
            .with(101, &[])
            .with(102, &["done"]);
        let pipeline = ExportPipeline::new(&helpdesk, FailedTicketPolicy::Skip);
        let mut rng = StdRng::seed_from_u64(0);

        let outcome = pipeline
            .run(&request(sequential(100, 102)), &mut rng)
            .await
            .unwrap();

        assert_eq!(
            rows(&outcome),
            vec![
                (100, "hi".to_string()),
                (100, "thanks".to_string()),
                (101, String::new()),
                (102, "done".to_string()),
            ]
        );
        assert_eq!(outcome.table.len(), 5);
        assert!(outcome.failures.is_empty());
        assert_eq!(
            helpdesk.calls(),
            vec![TicketId(100), TicketId(101), TicketId(102)]
        );
    }

    #[tokio::test]
    async fn test_failed_ticket_is_skipped_and_loop_continues() {
        let helpdesk = FakeHelpdesk::default().with(1, &["a"]).with(3, &["c"]);
        let pipeline = ExportPipeline::new(&helpdesk, FailedTicketPolicy::Skip);
        let mut rng = StdRng::seed_from_u64(0);

        let outcome = pipeline
            .run(&request(sequential(1, 3)), &mut rng)
            .await
            .unwrap();

        assert_eq!(
            rows(&outcome),
            vec![(1, "a".to_string()), (3, "c".to_string())]
        );
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].ticket, TicketId(2));
        assert!(outcome.failures[0].reason.contains("404"));
        assert_eq!(helpdesk.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_error_row_policy_marks_failed_ticket() {
        let helpdesk = FakeHelpdesk::default().with(1, &["a"]);
        let pipeline = ExportPipeline::new(&helpdesk, FailedTicketPolicy::ErrorRow);
        let mut rng = StdRng::seed_from_u64(0);

        let outcome = pipeline
            .run(&request(sequential(1, 2)), &mut rng)
            .await
            .unwrap();

        let rows = rows(&outcome);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].0, 2);
        assert!(rows[1].1.starts_with(FETCH_FAILED_MARKER));
        assert_eq!(outcome.failures.len(), 1);
    }

    #[tokio::test]
    async fn test_inverted_range_exports_header_only() {
        let helpdesk = FakeHelpdesk::default();
        let pipeline = ExportPipeline::new(&helpdesk, FailedTicketPolicy::Skip);
        let mut rng = StdRng::seed_from_u64(0);

        let outcome = pipeline
            .run(&request(sequential(10, 5)), &mut rng)
            .await
            .unwrap();

        assert_eq!(outcome.table.len(), 1);
        assert!(helpdesk.calls().is_empty());
    }

    #[tokio::test]
    async fn test_random_export_visits_sorted_sample() {
        let mut helpdesk = FakeHelpdesk::default();
        for id in 1..=20 {
            helpdesk = helpdesk.with(id, &["x"]);
        }
        let pipeline = ExportPipeline::new(&helpdesk, FailedTicketPolicy::Skip);
        let mut rng = StdRng::seed_from_u64(99);

        let outcome = pipeline
            .run(
                &request(Selection::Random {
                    min: TicketId(1),
                    max: TicketId(20),
                    count: 6,
                }),
                &mut rng,
            )
            .await
            .unwrap();

        let calls = helpdesk.calls();
        assert_eq!(calls.len(), 6);
        assert!(calls.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(outcome.table.len(), 7);
    }

    #[tokio::test]
    async fn test_exhausted_sample_fails_before_fetching() {
        let helpdesk = FakeHelpdesk::default();
        let pipeline = ExportPipeline::new(&helpdesk, FailedTicketPolicy::Skip);
        let mut rng = StdRng::seed_from_u64(0);

        let err = pipeline
            .run(
                &request(Selection::Random {
                    min: TicketId(1),
                    max: TicketId(3),
                    count: 10,
                }),
                &mut rng,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::SelectionExhausted { .. }));
        assert!(helpdesk.calls().is_empty());
    }
}
