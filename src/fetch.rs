//! Bounded-timeout retrieval of linked documents.

use reqwest::Client;
use std::error::Error;
use std::fmt;
use std::time::Duration;

const USER_AGENT: &str = "clausecrawl/0.1";

/// Downloads document bytes with a per-request timeout.
///
/// One fetcher (and thus one connection pool) is shared across all links of
/// a scan; failures are scoped to the URL that produced them.
#[derive(Clone)]
pub struct DocumentFetcher {
    client: Client,
}

impl DocumentFetcher {
    /// Builds a fetcher whose requests abort after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(FetchError::from_reqwest)?;
        Ok(Self { client })
    }

    /// Retrieves the raw bytes behind `url`.
    pub async fn fetch(&self, url: &url::Url) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await.map_err(FetchError::from_reqwest)?;
        Ok(bytes.to_vec())
    }
}

/// Errors surfaced while retrieving a single document.
#[derive(Debug)]
pub enum FetchError {
    /// The request exceeded the configured timeout.
    Timeout,
    /// Transport-level failure (connection refused, DNS, TLS).
    Http(reqwest::Error),
    /// The server responded with a non-success status.
    Status(u16),
}

impl FetchError {
    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "document fetch timed out"),
            Self::Http(err) => write!(f, "document fetch error: {err}"),
            Self::Status(code) => write!(f, "document responded with status {code}"),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Timeout | Self::Status(_) => None,
        }
    }
}
