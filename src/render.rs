//! Page rendering strategies for link discovery.
//!
//! The pipeline only needs "give me the realized HTML for this URL", so both
//! strategies sit behind the [`Renderer`] trait: [`StaticRenderer`] issues a
//! single fetch and never executes scripts, while [`BrowserRenderer`] drives
//! a headless Chromium session and reads the live DOM after a settle wait.
//! The two are not interchangeable on script-populated listings.

use async_trait::async_trait;
use reqwest::Client;
use std::error::Error;
use std::fmt;
use std::time::Duration;
use url::Url;

#[cfg(feature = "browser")]
use chromiumoxide::browser::{Browser, BrowserConfig};
#[cfg(feature = "browser")]
use futures_util::StreamExt;

const USER_AGENT: &str = "clausecrawl/0.1";

/// Rendering strategy selected per scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// Single HTTP fetch; script-driven content never appears.
    Static,
    /// Headless browser session; script-driven content gets a settle wait.
    Dynamic,
}

/// Realized page HTML plus the base URL links should resolve against.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Base for resolving relative hrefs (final URL after redirects).
    pub base: Url,
    /// Realized document markup.
    pub html: String,
}

/// Capability to turn a page URL into realized HTML.
#[async_trait]
pub trait Renderer {
    /// Renders the page at `url` into an HTML snapshot.
    async fn render(&self, url: &Url) -> Result<RenderedPage, RenderError>;
}

/// Renderer that performs a single fetch without script execution.
pub struct StaticRenderer {
    client: Client,
}

impl StaticRenderer {
    /// Builds a static renderer with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, RenderError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(RenderError::Http)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Renderer for StaticRenderer {
    async fn render(&self, url: &Url) -> Result<RenderedPage, RenderError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(RenderError::Http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Status(status.as_u16()));
        }

        // Redirected listings resolve relative links against the final URL.
        let base = response.url().clone();
        let html = response.text().await.map_err(RenderError::Http)?;
        Ok(RenderedPage { base, html })
    }
}

/// Renderer that loads the page in a headless browsing session.
///
/// The settle wait is a fixed sleep, not a "content loaded" signal; pages
/// still populating after the wait will be read incomplete.
#[cfg(feature = "browser")]
pub struct BrowserRenderer {
    settle_delay: Duration,
}

#[cfg(feature = "browser")]
impl BrowserRenderer {
    /// Builds a browser renderer that waits `settle_delay` after navigation.
    pub fn new(settle_delay: Duration) -> Self {
        Self { settle_delay }
    }

    async fn navigate(&self, browser: &Browser, url: &Url) -> Result<RenderedPage, RenderError> {
        let page = browser
            .new_page(url.as_str())
            .await
            .map_err(|err| RenderError::Navigation(err.to_string()))?;

        // Best-effort: slow pages fall through to the settle sleep below.
        let _ = page.wait_for_navigation().await;
        tokio::time::sleep(self.settle_delay).await;

        let html = page
            .content()
            .await
            .map_err(|err| RenderError::Navigation(err.to_string()))?;

        Ok(RenderedPage {
            base: url.clone(),
            html,
        })
    }
}

#[cfg(feature = "browser")]
#[async_trait]
impl Renderer for BrowserRenderer {
    async fn render(&self, url: &Url) -> Result<RenderedPage, RenderError> {
        let config = BrowserConfig::builder()
            .build()
            .map_err(RenderError::Launch)?;
        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|err| RenderError::Launch(err.to_string()))?;

        let event_pump = tokio::task::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        // Teardown must run on every exit path, so navigation happens in an
        // inner future and the session is closed before inspecting the result.
        let outcome = self.navigate(&browser, url).await;

        let _ = browser.close().await;
        let _ = browser.wait().await;
        event_pump.abort();

        outcome
    }
}

/// Errors surfaced while rendering a page.
#[derive(Debug)]
pub enum RenderError {
    /// Transport-level failure fetching the page.
    Http(reqwest::Error),
    /// The page responded with a non-success status.
    Status(u16),
    /// The browsing session could not be launched.
    Launch(String),
    /// Navigation or DOM capture failed inside the session.
    Navigation(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(err) => write!(f, "page fetch error: {err}"),
            Self::Status(code) => write!(f, "page responded with status {code}"),
            Self::Launch(message) => write!(f, "browser launch error: {message}"),
            Self::Navigation(message) => write!(f, "browser navigation error: {message}"),
        }
    }
}

impl Error for RenderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Status(_) | Self::Launch(_) | Self::Navigation(_) => None,
        }
    }
}
