//! Scan orchestration: render the page, discover links, process each
//! document, and assemble the ordered report.

use crate::controls::ScanControls;
use crate::debug_log;
use crate::fetch::DocumentFetcher;
use crate::links::extract_pdf_links;
use crate::matcher::TriggerVocabulary;
use crate::pdf::extract_text;
use crate::render::{RenderMode, RenderedPage, Renderer, StaticRenderer};
use crate::report::{DocumentStatus, MatchResult, RunReport};
use crate::segment::segment;
use futures_util::stream::{self, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use url::Url;

#[cfg(feature = "browser")]
use crate::render::BrowserRenderer;

/// Runs one full scan of `page_url` under the given controls.
///
/// Nothing here is fatal: render failures degrade to a `render-failed`
/// report, per-document failures become error-marker entries, and an empty
/// link set is reported as `no-documents`.
pub async fn run(controls: &ScanControls, page_url: &Url) -> RunReport {
    let start = Instant::now();
    let metrics = Metrics::default();

    let rendered = match render_page(controls, page_url).await {
        Ok(page) => page,
        Err(err) => {
            eprintln!("render failed for {page_url}: {err}");
            metrics.report(start.elapsed());
            return RunReport::render_failed(page_url.to_string(), err);
        }
    };
    metrics.record_page_rendered();

    let links = match extract_pdf_links(
        &rendered.html,
        &rendered.base,
        controls.max_links_per_page(),
    ) {
        Ok(links) => links,
        Err(err) => {
            // Malformed markup at page level degrades the same way as a
            // render failure: link discovery cannot be trusted.
            eprintln!("link extraction failed for {page_url}: {err}");
            metrics.report(start.elapsed());
            return RunReport::render_failed(page_url.to_string(), err.to_string());
        }
    };
    metrics.record_links_discovered(links.len());
    debug_log!("{page_url}: {} pdf link(s) discovered", links.len());

    let fetcher = match DocumentFetcher::new(controls.fetch_timeout()) {
        Ok(fetcher) => fetcher,
        Err(err) => {
            // The page rendered fine; only retrieval is unavailable, so the
            // discovered links stay in the report as fetch errors.
            eprintln!("fetcher construction failed: {err}");
            metrics.report(start.elapsed());
            return RunReport::new(page_url.to_string(), fetch_unavailable_results(links));
        }
    };

    let vocabulary = controls.vocabulary();
    let results: Vec<MatchResult> = stream::iter(
        links
            .into_iter()
            .map(|link| process_link(&fetcher, vocabulary, &metrics, link)),
    )
    .buffer_unordered(controls.max_concurrent_fetches())
    .collect()
    .await;

    metrics.report(start.elapsed());
    RunReport::new(page_url.to_string(), results)
}

async fn render_page(controls: &ScanControls, page_url: &Url) -> Result<RenderedPage, String> {
    match controls.render_mode() {
        RenderMode::Static => {
            let renderer =
                StaticRenderer::new(controls.fetch_timeout()).map_err(|err| err.to_string())?;
            renderer
                .render(page_url)
                .await
                .map_err(|err| err.to_string())
        }
        #[cfg(feature = "browser")]
        RenderMode::Dynamic => {
            let renderer = BrowserRenderer::new(controls.settle_delay());
            renderer
                .render(page_url)
                .await
                .map_err(|err| err.to_string())
        }
        #[cfg(not(feature = "browser"))]
        RenderMode::Dynamic => Err(String::from(
            "dynamic rendering requested but built without browser support",
        )),
    }
}

/// Marks every discovered link as a fetch error when no fetcher could be
/// built at all.
fn fetch_unavailable_results(links: std::collections::BTreeSet<Url>) -> Vec<MatchResult> {
    links
        .into_iter()
        .map(|link| MatchResult::failed(link.to_string(), DocumentStatus::FetchError))
        .collect()
}

/// Fetches, extracts, segments, and matches one document.
///
/// Failures are recorded in the returned `MatchResult` and never abort the
/// batch: one bad PDF must not prevent siblings from being scanned.
pub(crate) async fn process_link(
    fetcher: &DocumentFetcher,
    vocabulary: &TriggerVocabulary,
    metrics: &Metrics,
    link: Url,
) -> MatchResult {
    let url = link.to_string();

    let bytes = match fetcher.fetch(&link).await {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("fetch failed for {url}: {err}");
            metrics.record_fetch_error();
            return MatchResult::failed(url, DocumentStatus::FetchError);
        }
    };
    metrics.record_document_fetched();

    // Bytes are owned by this task and dropped with this scope.
    let text = match extract_text(&bytes) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("pdf extraction failed for {url}: {err}");
            metrics.record_parse_error();
            return MatchResult::failed(url, DocumentStatus::ParseError);
        }
    };

    let blocks = segment(&text);
    let matches = vocabulary.matching_blocks(&blocks);
    metrics.record_blocks_matched(matches.len());
    debug_log!(
        "{url}: {} of {} block(s) matched",
        matches.len(),
        blocks.len()
    );

    MatchResult::ok(url, matches)
}

#[derive(Default)]
pub(crate) struct Metrics {
    pages_rendered: AtomicUsize,
    links_discovered: AtomicUsize,
    documents_fetched: AtomicUsize,
    fetch_errors: AtomicUsize,
    parse_errors: AtomicUsize,
    blocks_matched: AtomicUsize,
}

impl Metrics {
    fn record_page_rendered(&self) {
        self.pages_rendered.fetch_add(1, Ordering::Relaxed);
    }

    fn record_links_discovered(&self, count: usize) {
        self.links_discovered.fetch_add(count, Ordering::Relaxed);
    }

    fn record_document_fetched(&self) {
        self.documents_fetched.fetch_add(1, Ordering::Relaxed);
    }

    fn record_fetch_error(&self) {
        self.fetch_errors.fetch_add(1, Ordering::Relaxed);
    }

    fn record_parse_error(&self) {
        self.parse_errors.fetch_add(1, Ordering::Relaxed);
    }

    fn record_blocks_matched(&self, count: usize) {
        self.blocks_matched.fetch_add(count, Ordering::Relaxed);
    }

    fn report(&self, elapsed: Duration) {
        eprintln!("--- scan metrics ({:.2}s) ---", elapsed.as_secs_f32());
        eprintln!(
            "pages rendered: {}",
            self.pages_rendered.load(Ordering::Relaxed)
        );
        eprintln!(
            "pdf links discovered: {}",
            self.links_discovered.load(Ordering::Relaxed)
        );
        eprintln!(
            "documents fetched: {}",
            self.documents_fetched.load(Ordering::Relaxed)
        );
        eprintln!(
            "fetch errors: {}",
            self.fetch_errors.load(Ordering::Relaxed)
        );
        eprintln!(
            "parse errors: {}",
            self.parse_errors.load(Ordering::Relaxed)
        );
        eprintln!(
            "blocks matched: {}",
            self.blocks_matched.load(Ordering::Relaxed)
        );
    }
}
