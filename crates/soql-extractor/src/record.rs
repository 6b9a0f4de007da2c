//! Output record and CSV serialization.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{Error, Result};

/// Column names of the extractor CSV, in order.
pub const CSV_HEADERS: [&str; 7] = [
    "class_name",
    "start_linenumber",
    "testClass",
    "has_binding",
    "soql_query",
    "sosl_query",
    "dml_operations",
];

/// One discovered SOQL occurrence plus its file-level context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRecord {
    /// File name the query was found in (e.g. `AccountService.cls`).
    pub class_name: String,
    #[serde(rename = "start_linenumber")]
    pub start_line: usize,
    #[serde(rename = "testClass")]
    pub is_test_class: bool,
    pub has_binding: bool,
    pub soql_query: String,
    pub sosl_query: String,
    pub dml_operations: String,
}

/// Write `records` to `path` as CSV. The header row is always written.
#[instrument(skip(records), fields(path = %path.display(), count = records.len()))]
pub fn write_csv(path: &Path, records: &[QueryRecord]) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|e| Error::io(path, e))?;
    write_records(file, records)
}

/// Write the header and `records` to any writer, one CRLF-terminated row each.
pub fn write_records<W: std::io::Write>(writer: W, records: &[QueryRecord]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);

    writer.write_record(CSV_HEADERS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
