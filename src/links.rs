//! PDF link discovery built on `lol_html`.

use lol_html::{element, HtmlRewriter, OutputSink, Settings};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt;
use std::sync::{Arc, Mutex};
use url::Url;

/// Collects absolute PDF links from a rendered HTML snapshot.
///
/// Every `a[href]` is resolved against `base`; only URLs whose path ends in
/// `.pdf` (ASCII case-insensitive) are retained. The result is a set, so a
/// URL linked several times appears once, and iteration order is already
/// lexicographic. Collection stops once `limit` distinct links are held.
pub fn extract_pdf_links(
    html: &str,
    base: &Url,
    limit: usize,
) -> Result<BTreeSet<Url>, LinkExtractError> {
    if limit == 0 {
        return Ok(BTreeSet::new());
    }

    let links: Arc<Mutex<BTreeSet<Url>>> = Arc::new(Mutex::new(BTreeSet::new()));
    let links_handle = Arc::clone(&links);
    let base = base.clone();

    let handler = element!("a[href]", move |el| {
        let mut entries = links_handle
            .lock()
            .unwrap_or_else(|_| panic!("link collector mutex poisoned"));
        if entries.len() >= limit {
            return Ok(());
        }

        if let Some(href) = el.get_attribute("href") {
            if let Some(candidate) = base.join(&href).ok().filter(is_pdf_url) {
                entries.insert(candidate);
            }
        }
        Ok(())
    });

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![handler],
            ..Settings::default()
        },
        NoopSink,
    );

    rewriter
        .write(html.as_bytes())
        .map_err(LinkExtractError::Rewrite)?;
    rewriter.end().map_err(LinkExtractError::Rewrite)?;

    let collected = Arc::try_unwrap(links)
        .map_err(|_| LinkExtractError::CollectorInUse)?
        .into_inner()
        .map_err(|_| LinkExtractError::CollectorPoisoned)?;

    Ok(collected)
}

/// Suffix check on the URL path, not MIME sniffing.
fn is_pdf_url(url: &Url) -> bool {
    url.path().to_ascii_lowercase().ends_with(".pdf")
}

/// Errors surfaced while walking rendered HTML.
#[derive(Debug)]
pub enum LinkExtractError {
    /// The HTML rewriter encountered malformed markup.
    Rewrite(lol_html::errors::RewritingError),
    /// Internal buffer still had outstanding references.
    CollectorInUse,
    /// Collector mutex was poisoned while draining results.
    CollectorPoisoned,
}

impl fmt::Display for LinkExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rewrite(err) => write!(f, "html rewrite error: {err}"),
            Self::CollectorInUse => write!(f, "link collector still in use"),
            Self::CollectorPoisoned => write!(f, "link collector mutex poisoned"),
        }
    }
}

impl Error for LinkExtractError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Rewrite(err) => Some(err),
            Self::CollectorInUse | Self::CollectorPoisoned => None,
        }
    }
}

struct NoopSink;

impl OutputSink for NoopSink {
    fn handle_chunk(&mut self, _chunk: &[u8]) {}
}
