//! Scan tuning knobs and the command-line surface shared by executors.

use crate::matcher::TriggerVocabulary;
use crate::render::RenderMode;
use crate::report::ExportOptions;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Tunable knobs that bound a single-page scan.
#[derive(Clone, Debug)]
pub struct ScanControls {
    render_mode: RenderMode,
    settle_delay: Duration,
    fetch_timeout: Duration,
    max_links_per_page: usize,
    max_concurrent_fetches: usize,
    vocabulary: TriggerVocabulary,
}

impl ScanControls {
    /// Constructs a new set of scan controls.
    pub fn new(
        render_mode: RenderMode,
        settle_delay: Duration,
        fetch_timeout: Duration,
        max_links_per_page: usize,
        max_concurrent_fetches: usize,
        vocabulary: TriggerVocabulary,
    ) -> Self {
        Self {
            render_mode,
            settle_delay,
            fetch_timeout,
            max_links_per_page,
            max_concurrent_fetches: max_concurrent_fetches.max(1),
            vocabulary,
        }
    }

    /// Rendering strategy for the listing page.
    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    /// Time allowed for scripted content to settle in dynamic mode.
    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Per-request timeout applied to page and document retrieval.
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    /// Maximum number of PDF links collected from the page.
    pub fn max_links_per_page(&self) -> usize {
        self.max_links_per_page
    }

    /// Upper bound on concurrently processed documents.
    pub fn max_concurrent_fetches(&self) -> usize {
        self.max_concurrent_fetches
    }

    /// Returns the trigger vocabulary used for matching.
    pub fn vocabulary(&self) -> &TriggerVocabulary {
        &self.vocabulary
    }
}

impl Default for ScanControls {
    fn default() -> Self {
        Self {
            render_mode: RenderMode::Static,
            settle_delay: Duration::from_millis(4000),
            fetch_timeout: Duration::from_secs(10),
            max_links_per_page: 64,
            max_concurrent_fetches: 4,
            vocabulary: TriggerVocabulary::default(),
        }
    }
}

/// CLI-facing render mode selector.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderModeArg {
    /// Single HTTP fetch, no script execution.
    Static,
    /// Headless browser session with a settle wait.
    Dynamic,
}

impl From<RenderModeArg> for RenderMode {
    fn from(arg: RenderModeArg) -> Self {
        match arg {
            RenderModeArg::Static => RenderMode::Static,
            RenderModeArg::Dynamic => RenderMode::Dynamic,
        }
    }
}

/// Command-line interface for the scanner binary.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "clausecrawl",
    about = "Scans a contract-listing page for PDFs mentioning extension (prórroga) clauses"
)]
pub struct Cli {
    /// Contract listing page to scan
    #[arg(long, env = "CLAUSECRAWL_URL")]
    pub url: String,

    /// Rendering strategy for the listing page
    #[arg(long, env = "CLAUSECRAWL_MODE", value_enum, default_value = "static")]
    pub mode: RenderModeArg,

    /// Milliseconds to let scripted content settle in dynamic mode
    #[arg(long, env = "CLAUSECRAWL_SETTLE_MS", default_value_t = 4000)]
    pub settle_ms: u64,

    /// Per-request timeout in seconds
    #[arg(long, env = "CLAUSECRAWL_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Maximum PDF links collected from the page
    #[arg(long, env = "CLAUSECRAWL_MAX_LINKS", default_value_t = 64)]
    pub max_links: usize,

    /// Concurrent document downloads
    #[arg(long, env = "CLAUSECRAWL_CONCURRENCY", default_value_t = 4)]
    pub concurrency: usize,

    /// Extra trigger terms appended to the built-in vocabulary, comma separated
    #[arg(long, env = "CLAUSECRAWL_TERMS", default_value = "")]
    pub terms: String,

    /// Write the report as CSV to this path
    #[arg(long, env = "CLAUSECRAWL_CSV")]
    pub csv: Option<PathBuf>,

    /// Emit the report as JSON on stdout instead of the plain table
    #[arg(long, env = "CLAUSECRAWL_JSON", default_value_t = false)]
    pub json: bool,

    /// Delimiter joining matched blocks in CSV export
    #[arg(long, env = "CLAUSECRAWL_DELIMITER", default_value = "; ")]
    pub delimiter: String,

    /// Marker written when a document produced no matches
    #[arg(long, env = "CLAUSECRAWL_NOT_FOUND", default_value = "not found")]
    pub not_found_marker: String,
}

impl Cli {
    /// Converts the parsed CLI into `ScanControls`.
    pub fn build_controls(&self) -> ScanControls {
        let mut vocabulary = TriggerVocabulary::default();
        for term in self
            .terms
            .split(',')
            .map(str::trim)
            .filter(|term| !term.is_empty())
        {
            vocabulary.add_term(term);
        }

        ScanControls::new(
            self.mode.into(),
            Duration::from_millis(self.settle_ms),
            Duration::from_secs(self.timeout_secs),
            self.max_links,
            self.concurrency,
            vocabulary,
        )
    }

    /// Export settings derived from the CLI.
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions::new(self.delimiter.clone(), self.not_found_marker.clone())
    }
}
