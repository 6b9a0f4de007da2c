//! # soql-explain
//!
//! Takes the extractor CSV, cleans each SOQL query, asks the org how it
//! would execute the query, and writes the answers to a CSV and an HTML
//! report.
//!
//! Rows from test classes or with bind variables are never sent; a bind
//! placeholder has no value to plan against. Every other row gets exactly
//! one explain call, in input order, and a failed call is written into that
//! row instead of stopping the run.
//!
//! ## Example
//!
//! ```rust,ignore
//! use apexscan_sf_client::SalesforceClient;
//! use apexscan_soql_explain::{explain_csv, Explainer};
//!
//! let client = SalesforceClient::new(instance_url, access_token)?;
//! let report = explain_csv(&Explainer::new(client)?, "soql.csv".as_ref(), "soql_with_explain.csv".as_ref()).await?;
//! println!("{} of {} queries explained", report.summary.dispatched, report.summary.total);
//! ```

use std::path::{Path, PathBuf};

mod client;
mod dispatch;
mod error;
mod normalize;
mod record;
mod report;

pub use client::ExplainClient;
pub use dispatch::{describe_failure, ExplainSummary, Explainer, INVALID_JSON_MESSAGE};
pub use error::{Error, ErrorKind, Result};
pub use normalize::{SoqlNormalizer, WITH_CLAUSE_PATTERN};
pub use record::{
    parse_flag, ExplainRecord, Outcome, QueryRow, QueryTable, CLASS_NAME_COLUMN,
    EXPLAIN_PLAN_COLUMN, HAS_BINDING_COLUMN, MODIFIED_SOQL_COLUMN, SOQL_QUERY_COLUMN,
    TEST_CLASS_COLUMN,
};
pub use report::{
    escape_html, html_report_path, render_html, write_explain_csv, write_explain_records,
    write_html, DEFAULT_OUTPUT_CSV,
};

/// Where an explain run wrote its reports, and what it did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainReport {
    pub csv_path: PathBuf,
    pub html_path: PathBuf,
    pub summary: ExplainSummary,
}

/// Read `input`, explain its rows, and write `output` plus `<output>.html`.
///
/// The input is read completely before any call is made, so a malformed
/// input fails without touching the org.
pub async fn explain_csv<C: ExplainClient>(
    explainer: &Explainer<C>,
    input: &Path,
    output: &Path,
) -> Result<ExplainReport> {
    let table = QueryTable::read_path(input)?;
    let records = explainer.explain_all(table.rows).await;

    write_explain_csv(output, &table.headers, &records)?;
    let html_path = html_report_path(output);
    write_html(&html_path, &records)?;

    Ok(ExplainReport {
        csv_path: output.to_path_buf(),
        html_path,
        summary: ExplainSummary::from_records(&records),
    })
}
