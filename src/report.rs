//! Aggregated scan results and their export formats.

use crate::segment::TextBlock;
use serde::Serialize;

/// Outcome of processing a single discovered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentStatus {
    /// Fetched and parsed; matches may still be empty.
    Ok,
    /// Retrieval failed (timeout, refusal, non-2xx).
    FetchError,
    /// Retrieved but the PDF could not be parsed.
    ParseError,
}

impl DocumentStatus {
    /// Stable textual form used in tabular exports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::FetchError => "fetch-error",
            Self::ParseError => "parse-error",
        }
    }
}

/// Per-document result: the link, how processing went, and the matching
/// blocks in source order. A zero-match document keeps its entry with an
/// empty list rather than being dropped.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    /// Absolute document URL.
    pub url: String,
    /// Processing status for this document.
    pub status: DocumentStatus,
    /// Matching blocks in order of appearance; empty on no match or error.
    pub matches: Vec<TextBlock>,
}

impl MatchResult {
    /// Builds a successful result with the given matches.
    pub fn ok(url: String, matches: Vec<TextBlock>) -> Self {
        Self {
            url,
            status: DocumentStatus::Ok,
            matches,
        }
    }

    /// Builds an error-marker result with no matches.
    pub fn failed(url: String, status: DocumentStatus) -> Self {
        Self {
            url,
            status,
            matches: Vec::new(),
        }
    }
}

/// How the listing page itself fared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageOutcome {
    /// The page rendered and at least one PDF link was processed.
    Scanned,
    /// The page rendered but exposed no PDF links.
    NoDocuments,
    /// Rendering failed; link discovery never ran.
    RenderFailed,
}

/// Immutable report for one scan of one listing page.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// The scanned listing page.
    pub page_url: String,
    /// Page-level outcome, distinguishing "no links" from "render failed".
    pub outcome: PageOutcome,
    /// Render failure detail when `outcome` is `render-failed`.
    pub render_error: Option<String>,
    /// One entry per discovered document, sorted by URL.
    pub results: Vec<MatchResult>,
}

impl RunReport {
    /// Builds a report, normalizing result order with a stable sort by URL
    /// so completion order never leaks into the output.
    pub fn new(page_url: String, mut results: Vec<MatchResult>) -> Self {
        results.sort_by(|a, b| a.url.cmp(&b.url));
        let outcome = if results.is_empty() {
            PageOutcome::NoDocuments
        } else {
            PageOutcome::Scanned
        };
        Self {
            page_url,
            outcome,
            render_error: None,
            results,
        }
    }

    /// Builds the degraded "no links found" report for a render failure.
    pub fn render_failed(page_url: String, error: String) -> Self {
        Self {
            page_url,
            outcome: PageOutcome::RenderFailed,
            render_error: Some(error),
            results: Vec::new(),
        }
    }

    /// Serializes the report as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Renders the report as CSV with columns `document_url,status,matches`.
    pub fn to_csv(&self, options: &ExportOptions) -> String {
        let mut out = String::from("document_url,status,matches\n");
        for result in &self.results {
            let cell = options.matches_cell(result);
            out.push_str(&csv_field(&result.url));
            out.push(',');
            out.push_str(result.status.as_str());
            out.push(',');
            out.push_str(&csv_field(&cell));
            out.push('\n');
        }
        out
    }
}

/// Export knobs: joining delimiter and the zero-match marker.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Delimiter between matched blocks inside one CSV cell.
    pub join_delimiter: String,
    /// Cell content for a document that fetched fine but matched nothing.
    pub not_found_marker: String,
}

impl ExportOptions {
    /// Builds export options from the given delimiter and marker.
    pub fn new(join_delimiter: String, not_found_marker: String) -> Self {
        Self {
            join_delimiter,
            not_found_marker,
        }
    }

    /// Cell text for one result: joined matches, the zero-match marker, or
    /// a bracketed error marker.
    pub fn matches_cell(&self, result: &MatchResult) -> String {
        match result.status {
            DocumentStatus::Ok if result.matches.is_empty() => self.not_found_marker.clone(),
            DocumentStatus::Ok => result
                .matches
                .iter()
                .map(|block| block.text.as_str())
                .collect::<Vec<_>>()
                .join(&self.join_delimiter),
            DocumentStatus::FetchError => String::from("[fetch error]"),
            DocumentStatus::ParseError => String::from("[parse error]"),
        }
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            join_delimiter: String::from("; "),
            not_found_marker: String::from("not found"),
        }
    }
}

fn csv_field(value: &str) -> String {
    if value.contains(['"', ',', '\n', '\r']) {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(text: &str) -> TextBlock {
        TextBlock {
            text: text.to_string(),
            byte_start: 0,
            byte_end: text.len(),
        }
    }

    #[test]
    fn results_are_sorted_by_url() {
        let report = RunReport::new(
            String::from("http://x/page"),
            vec![
                MatchResult::ok(String::from("http://x/b.pdf"), Vec::new()),
                MatchResult::ok(String::from("http://x/a.pdf"), Vec::new()),
            ],
        );
        let urls: Vec<_> = report.results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["http://x/a.pdf", "http://x/b.pdf"]);
        assert_eq!(report.outcome, PageOutcome::Scanned);
    }

    #[test]
    fn empty_results_mean_no_documents() {
        let report = RunReport::new(String::from("http://x/page"), Vec::new());
        assert_eq!(report.outcome, PageOutcome::NoDocuments);
        assert!(report.render_error.is_none());
    }

    #[test]
    fn render_failure_is_distinct_from_no_documents() {
        let report =
            RunReport::render_failed(String::from("http://x/page"), String::from("timed out"));
        assert_eq!(report.outcome, PageOutcome::RenderFailed);
        assert_eq!(report.render_error.as_deref(), Some("timed out"));
        assert!(report.results.is_empty());
    }

    #[test]
    fn csv_joins_matches_and_marks_misses() {
        let report = RunReport::new(
            String::from("http://x/page"),
            vec![
                MatchResult::ok(
                    String::from("http://x/a.pdf"),
                    vec![block("prórroga uno"), block("prórroga dos")],
                ),
                MatchResult::ok(String::from("http://x/b.pdf"), Vec::new()),
                MatchResult::failed(String::from("http://x/c.pdf"), DocumentStatus::FetchError),
            ],
        );
        let csv = report.to_csv(&ExportOptions::default());
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "document_url,status,matches");
        assert_eq!(lines[1], "http://x/a.pdf,ok,prórroga uno; prórroga dos");
        assert_eq!(lines[2], "http://x/b.pdf,ok,not found");
        assert_eq!(lines[3], "http://x/c.pdf,fetch-error,[fetch error]");
    }

    #[test]
    fn csv_quotes_fields_with_commas_and_quotes() {
        let report = RunReport::new(
            String::from("http://x/page"),
            vec![MatchResult::ok(
                String::from("http://x/a.pdf"),
                vec![block("prórroga, con \"comillas\"")],
            )],
        );
        let csv = report.to_csv(&ExportOptions::default());
        assert!(csv.contains("\"prórroga, con \"\"comillas\"\"\""));
    }

    #[test]
    fn json_export_carries_statuses() {
        let report = RunReport::new(
            String::from("http://x/page"),
            vec![MatchResult::failed(
                String::from("http://x/c.pdf"),
                DocumentStatus::ParseError,
            )],
        );
        let json = report.to_json().expect("serialize");
        assert!(json.contains("\"parse-error\""));
        assert!(json.contains("\"scanned\""));
    }
}
