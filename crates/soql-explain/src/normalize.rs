//! SOQL cleanup before submission to the explain endpoint.
//!
//! Purely textual: nothing is validated, and malformed input comes out the
//! other side for the org to reject.

use regex::Regex;

use crate::error::Result;

/// A ` WITH ...` modifier up to the next `]` or the end of the text.
pub const WITH_CLAUSE_PATTERN: &str = r"(?i)\s+WITH\s+[^\]]+";

/// Strips brackets and `WITH` clauses the explain endpoint rejects.
#[derive(Debug, Clone)]
pub struct SoqlNormalizer {
    with_clause: Regex,
}

impl SoqlNormalizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            with_clause: Regex::new(WITH_CLAUSE_PATTERN)?,
        })
    }

    /// Clean one extracted query.
    ///
    /// 1. Drop one leading `[` and one trailing `]`.
    /// 2. Remove every ` WITH <clause>` segment (e.g. `WITH SECURITY_ENFORCED`).
    /// 3. Trim surrounding whitespace.
    pub fn normalize(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        let unbracketed = trimmed.strip_prefix('[').unwrap_or(trimmed);
        let unbracketed = unbracketed.strip_suffix(']').unwrap_or(unbracketed);

        self.with_clause
            .replace_all(unbracketed, "")
            .trim()
            .to_string()
    }
}
