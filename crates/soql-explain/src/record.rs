//! Extractor CSV rows and their explained counterparts.

use std::io::Read;
use std::path::Path;

use tracing::instrument;

use crate::error::{Error, ErrorKind, Result};

pub const CLASS_NAME_COLUMN: &str = "class_name";
pub const SOQL_QUERY_COLUMN: &str = "soql_query";
pub const TEST_CLASS_COLUMN: &str = "testClass";
pub const HAS_BINDING_COLUMN: &str = "has_binding";

/// Columns appended to the input columns in the explain CSV.
pub const MODIFIED_SOQL_COLUMN: &str = "modified_soql";
pub const EXPLAIN_PLAN_COLUMN: &str = "explain_plan";

/// One row of the extractor CSV.
///
/// Every input column is kept in `values` so the output can reproduce it;
/// the fields the explainer needs are pulled out by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRow {
    pub values: Vec<String>,
    pub class_name: String,
    pub soql_query: String,
    pub is_test_class: bool,
    pub has_binding: bool,
}

/// Parse a `testClass` / `has_binding` cell. Only `true` (any case) is true.
pub fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// Positions of the required columns in the header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    class_name: usize,
    soql_query: usize,
    test_class: usize,
    has_binding: usize,
}

impl Columns {
    fn locate(headers: &[String]) -> Result<Self> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| Error::new(ErrorKind::MissingColumn(name)))
        };

        Ok(Self {
            class_name: find(CLASS_NAME_COLUMN)?,
            soql_query: find(SOQL_QUERY_COLUMN)?,
            test_class: find(TEST_CLASS_COLUMN)?,
            has_binding: find(HAS_BINDING_COLUMN)?,
        })
    }

    fn row(&self, values: Vec<String>) -> QueryRow {
        let cell = |i: usize| values.get(i).cloned().unwrap_or_default();
        QueryRow {
            class_name: cell(self.class_name),
            soql_query: cell(self.soql_query),
            is_test_class: parse_flag(&cell(self.test_class)),
            has_binding: parse_flag(&cell(self.has_binding)),
            values,
        }
    }
}

/// The extractor CSV: its header row and data rows, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryTable {
    pub headers: Vec<String>,
    pub rows: Vec<QueryRow>,
}

impl QueryTable {
    /// Read the CSV at `path`.
    #[instrument(fields(path = %path.display()))]
    pub fn read_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| Error::io(path, e))?;
        Self::from_reader(file)
    }

    /// Read CSV from any reader. Fails before yielding rows if a required
    /// column is absent.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let columns = Columns::locate(&headers)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(columns.row(record.iter().map(str::to_string).collect()));
        }

        Ok(Self { headers, rows })
    }
}

/// What happened to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Test-class or bind-variable query; never sent.
    Skipped,
    /// Sent and answered with a plan.
    Explained,
    /// Sent; the cell holds the error text.
    Failed,
}

/// A row after normalization and (possibly) an explain call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainRecord {
    pub row: QueryRow,
    pub modified_soql: String,
    /// Pretty-printed plans, an error string, or empty when skipped.
    pub explain_plan: String,
    pub outcome: Outcome,
}

impl ExplainRecord {
    pub fn was_dispatched(&self) -> bool {
        self.outcome != Outcome::Skipped
    }
}
