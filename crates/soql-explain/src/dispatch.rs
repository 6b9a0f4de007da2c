//! Row-by-row explain dispatch.

use apexscan_sf_client::ErrorKind as ClientErrorKind;
use tracing::{debug, info, instrument, warn};

use crate::client::ExplainClient;
use crate::error::Result;
use crate::normalize::SoqlNormalizer;
use crate::record::{ExplainRecord, Outcome, QueryRow};

/// Text stored in place of a plan when the org answered 200 with a body
/// that is not a JSON object.
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON in response";

/// Render a failed explain call as the cell text for the row.
///
/// - non-200 response: `Error: <status> - <body>`
/// - unparseable 200 body: [`INVALID_JSON_MESSAGE`]
/// - anything else (connection, timeout): `Error: <error>`
pub fn describe_failure(err: &apexscan_sf_client::Error) -> String {
    match &err.kind {
        ClientErrorKind::Http { status, body } => format!("Error: {status} - {body}"),
        ClientErrorKind::InvalidJson(_) => INVALID_JSON_MESSAGE.to_string(),
        _ => format!("Error: {err}"),
    }
}

/// Counts for one explain run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExplainSummary {
    pub total: usize,
    pub dispatched: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ExplainSummary {
    pub fn from_records(records: &[ExplainRecord]) -> Self {
        records.iter().fold(
            Self {
                total: records.len(),
                ..Self::default()
            },
            |mut summary, record| {
                match record.outcome {
                    Outcome::Skipped => summary.skipped += 1,
                    Outcome::Explained => summary.dispatched += 1,
                    Outcome::Failed => {
                        summary.dispatched += 1;
                        summary.failed += 1;
                    }
                }
                summary
            },
        )
    }
}

/// Normalizes rows and asks the org for their plans, one at a time.
#[derive(Debug)]
pub struct Explainer<C> {
    client: C,
    normalizer: SoqlNormalizer,
}

impl<C: ExplainClient> Explainer<C> {
    pub fn new(client: C) -> Result<Self> {
        Ok(Self {
            client,
            normalizer: SoqlNormalizer::new()?,
        })
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// A row is sent unless it comes from a test class or binds a variable.
    pub fn should_dispatch(row: &QueryRow) -> bool {
        !row.is_test_class && !row.has_binding
    }

    /// Normalize `row` and, if eligible, explain it. Never fails: a failed
    /// call is recorded in the returned record.
    #[instrument(skip(self, row), fields(class = %row.class_name))]
    pub async fn explain_row(&self, row: QueryRow) -> ExplainRecord {
        let modified_soql = self.normalizer.normalize(&row.soql_query);

        if !Self::should_dispatch(&row) {
            debug!(
                test_class = row.is_test_class,
                has_binding = row.has_binding,
                "Skipping query"
            );
            return ExplainRecord {
                row,
                modified_soql,
                explain_plan: String::new(),
                outcome: Outcome::Skipped,
            };
        }

        let (explain_plan, outcome) = match self.client.explain(&modified_soql).await {
            Ok(plan) => (plan.to_pretty_json(), Outcome::Explained),
            Err(err) => {
                warn!(error = %err, query = %modified_soql, "Explain failed");
                (describe_failure(&err), Outcome::Failed)
            }
        };

        ExplainRecord {
            row,
            modified_soql,
            explain_plan,
            outcome,
        }
    }

    /// Explain every row in order. Each call completes before the next starts.
    pub async fn explain_all(&self, rows: Vec<QueryRow>) -> Vec<ExplainRecord> {
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(self.explain_row(row).await);
        }

        let summary = ExplainSummary::from_records(&records);
        info!(
            total = summary.total,
            dispatched = summary.dispatched,
            skipped = summary.skipped,
            failed = summary.failed,
            "Explain run complete"
        );
        records
    }
}
