//! # soql-extractor
//!
//! Finds embedded SOQL, SOSL and DML in Apex class files and reports one
//! [`QueryRecord`] per SOQL occurrence.
//!
//! Extraction is a set of regex rules over raw file text, not a parse.
//! Each file contributes:
//!
//! - one record per `[SELECT ...]` literal, with its 1-based start line and
//!   whether it references a bind variable (`:`),
//! - a file-wide SOSL aggregate and DML keyword set, repeated on each of
//!   that file's records,
//! - a file-wide test-class flag.
//!
//! Files without SOQL produce no records, so their SOSL/DML findings are
//! not reported anywhere.
//!
//! ## Known limitation
//!
//! A SOQL literal ends at the first `]` after `SELECT`. Queries containing
//! `]` (in a string literal or nested brackets) are cut short.
//!
//! ## Example
//!
//! ```rust,ignore
//! use apexscan_soql_extractor::{extract_to_csv, Extractor};
//!
//! let count = extract_to_csv(&Extractor::new()?, "force-app/main/default/classes".as_ref(), "soql.csv".as_ref())?;
//! println!("Extracted {count} SOQL queries");
//! ```

use std::path::Path;

mod error;
mod extractor;
mod record;
mod rules;
mod scan;

pub use error::{Error, ErrorKind, Result};
pub use extractor::{
    line_number, normalize_newlines, normalize_whitespace, Extractor, FileScan, SoqlOccurrence,
    DML_DELIMITER, SOSL_DELIMITER,
};
pub use record::{write_csv, write_records, QueryRecord, CSV_HEADERS};
pub use rules::{
    Rule, RuleMatch, Rules, DML_PATTERN, SOQL_PATTERN, SOSL_PATTERN, TEST_CLASS_PATTERN,
};
pub use scan::{discover_class_files, read_source, scan_folder, APEX_CLASS_EXTENSION};

/// Scan `folder` and write the records to `output`. Returns the record count.
pub fn extract_to_csv(extractor: &Extractor, folder: &Path, output: &Path) -> Result<usize> {
    let records = scan_folder(extractor, folder)?;
    write_csv(output, &records)?;
    Ok(records.len())
}
