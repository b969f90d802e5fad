use async_trait::async_trait;
use std::time::Duration;
use tracing::{instrument, warn};

use crate::fetcher::{client::fetch_with_timeout, errors::FetchError};

/// The two values the extractor needs from a fetched job page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub final_url: String,
    pub body: String,
}

/// Fetch collaborator: given a URL, produce the page body and post-redirect URL.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// HTTP-backed fetcher bounded by a per-call timeout.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    timeout: Duration,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for HttpPageFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    #[instrument(skip(self))]
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = fetch_with_timeout(url, self.timeout).await.inspect_err(|e| {
            warn!(error = %e, transient = e.should_retry(), "job page fetch failed");
        })?;

        Ok(FetchedPage {
            final_url: response.url_final.to_string(),
            body: response.body_utf8,
        })
    }
}
