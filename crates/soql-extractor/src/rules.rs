//! Named pattern matchers.
//!
//! Each [`Rule`] answers one question about a file's text: "where does
//! pattern R match, and what did it capture?". The extractor combines the
//! answers; nothing here knows about records or CSV.
//!
//! The patterns are intentionally naive. In particular the SOQL rule pairs
//! `[` with the *nearest* following `]`, so a literal `]` inside a query
//! string or nested brackets truncate the match.
//!
//! `\s`, `\w` and `\b` are Unicode-aware: a no-break space counts as
//! whitespace and `é` counts as a word character.

use regex::Regex;

use crate::error::{Error, ErrorKind, Result};

/// `[`, optional whitespace, `SELECT`, then the shortest run up to `]`.
pub const SOQL_PATTERN: &str = r"(?is)\[\s*SELECT.*?\]";

/// `FIND '<term>' IN ALL FIELDS RETURNING ... ;` (either quote style).
pub const SOSL_PATTERN: &str = r#"(?is)FIND\s+['"].+?['"]\s+IN\s+ALL\s+FIELDS\s+RETURNING.+?;"#;

/// Whole-word DML keywords; group 1 is the keyword as written.
pub const DML_PATTERN: &str = r"(?i)\b(insert|update|delete|upsert|merge)\b";

/// `@isTest`, or `isTest` later on a `class <Name>` declaration line.
pub const TEST_CLASS_PATTERN: &str = r"(?i)@isTest|class\s+\w+\s+.*isTest";

/// One match of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch<'t> {
    /// Byte offset of the first character of the whole match.
    pub start: usize,
    /// Byte offset one past the end of the whole match.
    pub end: usize,
    /// Capture group 1 when the pattern has one, otherwise the whole match.
    pub text: &'t str,
}

/// A named, compiled pattern.
#[derive(Debug, Clone)]
pub struct Rule {
    name: &'static str,
    regex: Regex,
}

impl Rule {
    /// Compile `pattern` under `name`.
    pub fn new(name: &'static str, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| {
            Error::with_source(
                ErrorKind::Pattern {
                    rule: name,
                    message: e.to_string(),
                },
                e,
            )
        })?;
        Ok(Self { name, regex })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// All non-overlapping matches, left to right.
    pub fn find_all<'t>(&self, text: &'t str) -> Vec<RuleMatch<'t>> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let captured = caps.get(1).unwrap_or(whole);
                Some(RuleMatch {
                    start: whole.start(),
                    end: whole.end(),
                    text: captured.as_str(),
                })
            })
            .collect()
    }

    /// True if the rule matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// The ordered rule set applied to every file.
#[derive(Debug, Clone)]
pub struct Rules {
    pub soql: Rule,
    pub sosl: Rule,
    pub dml: Rule,
    pub test_class: Rule,
}

impl Rules {
    /// Compile the standard rules.
    pub fn standard() -> Result<Self> {
        Ok(Self {
            soql: Rule::new("soql", SOQL_PATTERN)?,
            sosl: Rule::new("sosl", SOSL_PATTERN)?,
            dml: Rule::new("dml", DML_PATTERN)?,
            test_class: Rule::new("test_class", TEST_CLASS_PATTERN)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> Rules {
        Rules::standard().unwrap()
    }

    #[test]
    fn test_rule_names() {
        let rules = rules();
        assert_eq!(rules.soql.name(), "soql");
        assert_eq!(rules.test_class.name(), "test_class");
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = Rule::new("broken", "(unclosed").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Pattern { rule: "broken", .. }));
    }

    #[test]
    fn test_soql_single_line() {
        let text = "List<Account> a = [SELECT Id FROM Account];";
        let matches = rules().soql.find_all(text);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "[SELECT Id FROM Account]");
        assert_eq!(matches[0].start, text.find('[').unwrap());
    }

    #[test]
    fn test_soql_case_insensitive_and_multiline() {
        let text = "x = [\n   select Id,\n  Name\n FROM Contact\n];";
        let matches = rules().soql.find_all(text);
        assert_eq!(matches.len(), 1);
        assert!(matches[0].text.starts_with("[\n   select"));
        assert!(matches[0].text.ends_with("Contact\n]"));
    }

    #[test]
    fn test_soql_ignores_non_select_brackets() {
        let text = "Integer[] xs = new Integer[5]; String s = names[0];";
        assert!(rules().soql.find_all(text).is_empty());
    }

    #[test]
    fn test_soql_nearest_bracket_truncates() {
        // A `]` inside a string literal ends the match early.
        let text = "[SELECT Id FROM Account WHERE Name = 'a]b']";
        let matches = rules().soql.find_all(text);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "[SELECT Id FROM Account WHERE Name = 'a]");
    }

    #[test]
    fn test_soql_multiple_matches() {
        let text = "[SELECT Id FROM A] and [ SELECT Id FROM B]";
        let texts: Vec<_> = rules().soql.find_all(text).iter().map(|m| m.text).collect();
        assert_eq!(texts, vec!["[SELECT Id FROM A]", "[ SELECT Id FROM B]"]);
    }

    #[test]
    fn test_soql_unicode_whitespace_after_bracket() {
        let text = "a = [\u{a0}SELECT Id FROM Account];";
        let matches = rules().soql.find_all(text);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "[\u{a0}SELECT Id FROM Account]");
    }

    #[test]
    fn test_sosl_both_quote_styles() {
        let text = "List<List<SObject>> r = [FIND 'Acme' IN ALL FIELDS RETURNING Account(Id)];\n\
                    Search.query(\"FIND \\\"x\\\" in all fields returning Contact\");";
        let matches = rules().sosl.find_all(text);
        assert_eq!(matches.len(), 1);
        assert_eq!(
            matches[0].text,
            "FIND 'Acme' IN ALL FIELDS RETURNING Account(Id)];"
        );

        let text = "FIND \"Acme\"\n  in all fields\n  RETURNING Lead;";
        let matches = rules().sosl.find_all(text);
        assert_eq!(matches.len(), 1);
        assert!(matches[0].text.ends_with("Lead;"));
    }

    #[test]
    fn test_dml_captures_keyword_only() {
        let text = "insert acc; UPDATE acc; Database.upsert(list); merge a b;";
        let words: Vec<_> = rules().dml.find_all(text).iter().map(|m| m.text).collect();
        assert_eq!(words, vec!["insert", "UPDATE", "upsert", "merge"]);
    }

    #[test]
    fn test_dml_whole_words_only() {
        let text = "insertRecords(); updated = true; deleteAll; undelete x;";
        assert!(rules().dml.find_all(text).is_empty());
    }

    #[test]
    fn test_dml_unicode_letters_are_word_characters() {
        let text = "éinsert x; insertá y; Üdelete z; naïve_update;";
        assert!(rules().dml.find_all(text).is_empty());
    }

    #[test]
    fn test_test_class_annotation() {
        let rules = rules();
        assert!(rules.test_class.is_match("@IsTest\nprivate class FooTest {}"));
        assert!(rules.test_class.is_match("@isTest(SeeAllData=true)"));
        assert!(!rules.test_class.is_match("public class Foo {}"));
    }

    #[test]
    fn test_test_class_declaration_line() {
        let rules = rules();
        assert!(rules
            .test_class
            .is_match("private class FooTest extends Base implements IsTestable {"));
        // Only on the declaration line: `.` does not cross newlines.
        assert!(!rules
            .test_class
            .is_match("public class Foo {\n  Boolean isTest = false;\n}"));
    }
}
