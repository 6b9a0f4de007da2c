//! CSV and HTML output of an explain run.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::error::{Error, Result};
use crate::record::{ExplainRecord, EXPLAIN_PLAN_COLUMN, MODIFIED_SOQL_COLUMN};

/// Default output CSV name.
pub const DEFAULT_OUTPUT_CSV: &str = "soql_with_explain.csv";

/// The HTML report sits next to the CSV: `<csv path>.html`.
pub fn html_report_path(csv_path: &Path) -> PathBuf {
    let mut path = csv_path.as_os_str().to_owned();
    path.push(".html");
    PathBuf::from(path)
}

/// Write the explain CSV: input columns plus `modified_soql` and `explain_plan`.
#[instrument(skip(headers, records), fields(path = %path.display(), count = records.len()))]
pub fn write_explain_csv(path: &Path, headers: &[String], records: &[ExplainRecord]) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|e| Error::io(path, e))?;
    write_explain_records(file, headers, records)
}

pub fn write_explain_records<W: std::io::Write>(
    writer: W,
    headers: &[String],
    records: &[ExplainRecord],
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .flexible(true)
        .from_writer(writer);

    writer.write_record(
        headers
            .iter()
            .map(String::as_str)
            .chain([MODIFIED_SOQL_COLUMN, EXPLAIN_PLAN_COLUMN]),
    )?;

    for record in records {
        writer.write_record(
            record
                .row
                .values
                .iter()
                .map(String::as_str)
                .chain([record.modified_soql.as_str(), record.explain_plan.as_str()]),
        )?;
    }

    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Escape text for an HTML element body.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const HTML_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>SOQL Explain Plan Report</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-50 p-4">
    <div class="max-w-full mx-auto bg-white shadow-lg rounded-lg overflow-x-auto">
        <table class="min-w-full table-auto text-left border">
            <thead class="bg-gray-200 sticky top-0 z-10">
                <tr>
                    <th class="px-4 py-2 text-sm font-bold text-gray-700">Class Name</th>
                    <th class="px-4 py-2 text-sm font-bold text-gray-700">SOQL Query</th>
                    <th class="px-4 py-2 text-sm font-bold text-gray-700">Modified SOQL</th>
                    <th class="px-4 py-2 text-sm font-bold text-gray-700">Explain Plan</th>
                </tr>
            </thead>
            <tbody>
"#;

/// Render the HTML report. Only dispatched rows appear, in input order.
pub fn render_html(records: &[ExplainRecord], generated_at: DateTime<Utc>) -> String {
    let mut html = String::from(HTML_HEAD);

    for record in records.iter().filter(|r| r.was_dispatched()) {
        // Writing to a String cannot fail.
        let _ = write!(
            html,
            r#"                <tr class="hover:bg-gray-100 border-b">
                    <td class="px-4 py-2 text-sm">{}</td>
                    <td class="px-4 py-2 text-sm whitespace-pre-wrap">{}</td>
                    <td class="px-4 py-2 text-sm whitespace-pre-wrap">{}</td>
                    <td class="px-4 py-2 text-sm whitespace-pre-wrap"><pre>{}</pre></td>
                </tr>
"#,
            escape_html(&record.row.class_name),
            escape_html(&record.row.soql_query),
            escape_html(&record.modified_soql),
            escape_html(&record.explain_plan),
        );
    }

    let _ = write!(
        html,
        r#"            </tbody>
            <tfoot class="bg-gray-100 sticky bottom-0">
                <tr>
                    <td colspan="4" class="text-center text-xs text-gray-600 p-2">Generated by SOQL Explain Plan Tool on {}</td>
                </tr>
            </tfoot>
        </table>
    </div>
</body>
</html>
"#,
        generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
    );

    html
}

/// Write the HTML report to `path`, stamped with the current time.
#[instrument(skip(records), fields(path = %path.display()))]
pub fn write_html(path: &Path, records: &[ExplainRecord]) -> Result<()> {
    std::fs::write(path, render_html(records, Utc::now())).map_err(|e| Error::io(path, e))
}
