//! Per-file extraction.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::record::QueryRecord;
use crate::rules::Rules;

/// Delimiter between SOSL statements in the file-level aggregate.
pub const SOSL_DELIMITER: &str = " | ";

/// Delimiter between DML keywords in the file-level aggregate.
pub const DML_DELIMITER: &str = ", ";

/// One SOQL occurrence inside a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoqlOccurrence {
    /// Whitespace-normalized query text, brackets included.
    pub query: String,
    /// 1-based line of the opening `[`.
    pub line: usize,
}

/// Everything the rules found in one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileScan {
    pub soql: Vec<SoqlOccurrence>,
    /// All SOSL statements, normalized and joined with [`SOSL_DELIMITER`].
    pub sosl: String,
    /// Sorted, lowercased, deduplicated DML keywords joined with [`DML_DELIMITER`].
    pub dml: String,
    pub is_test_class: bool,
}

impl FileScan {
    /// Expand into one record per SOQL occurrence.
    ///
    /// SOSL, DML and the test-class flag are file-level and repeat on every
    /// record. A file without SOQL yields nothing, whatever else it contains.
    pub fn into_records(self, class_name: &str) -> Vec<QueryRecord> {
        let FileScan {
            soql,
            sosl,
            dml,
            is_test_class,
        } = self;

        soql.into_iter()
            .map(|occurrence| QueryRecord {
                class_name: class_name.to_string(),
                start_line: occurrence.line,
                is_test_class,
                has_binding: occurrence.query.contains(':'),
                soql_query: occurrence.query,
                sosl_query: sosl.clone(),
                dml_operations: dml.clone(),
            })
            .collect()
    }
}

/// Applies [`Rules`] to file contents.
#[derive(Debug, Clone)]
pub struct Extractor {
    rules: Rules,
}

impl Extractor {
    /// Extractor with the standard rule set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            rules: Rules::standard()?,
        })
    }

    /// Run every rule over `content`.
    pub fn scan(&self, content: &str) -> FileScan {
        let soql = self
            .rules
            .soql
            .find_all(content)
            .into_iter()
            .map(|m| SoqlOccurrence {
                query: normalize_whitespace(m.text),
                line: line_number(content, m.start),
            })
            .collect();

        let sosl = self
            .rules
            .sosl
            .find_all(content)
            .into_iter()
            .map(|m| normalize_whitespace(m.text))
            .collect::<Vec<_>>()
            .join(SOSL_DELIMITER);

        let dml = self
            .rules
            .dml
            .find_all(content)
            .into_iter()
            .map(|m| m.text.to_lowercase())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>()
            .join(DML_DELIMITER);

        FileScan {
            soql,
            sosl,
            dml,
            is_test_class: self.rules.test_class.is_match(content),
        }
    }

    /// Scan `content` and build the records for a file called `class_name`.
    pub fn extract(&self, class_name: &str, content: &str) -> Vec<QueryRecord> {
        self.scan(content).into_records(class_name)
    }
}

/// Collapse every run of whitespace to one space and trim both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 1-based line number of byte `offset`: one plus the newlines before it.
pub fn line_number(content: &str, offset: usize) -> usize {
    content.as_bytes()[..offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

/// Translate `\r\n` and lone `\r` to `\n`, as text-mode reads do.
pub fn normalize_newlines(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n")
}
