use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder, header};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::fetcher::{
    decode::decode_page,
    errors::{FetchError, is_retriable_status},
    types::PageResponse,
};

/// Job pages beyond this are not postings.
const MAX_BODY_SIZE: u64 = 5 * 1024 * 1024;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_REDIRECTS: usize = 10;
// Several boards serve a stripped page or a 403 to non-browser agents
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("text/html,application/xhtml+xml,text/plain;q=0.9,*/*;q=0.5"),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header::HeaderValue::from_static("en-US,en;q=0.8"),
    );
    ClientBuilder::new()
        .connect_timeout(Duration::from_secs(10))
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .default_headers(headers)
        .build()
        .unwrap_or_else(|_| Client::new())
});

pub async fn fetch(url: &str) -> Result<PageResponse, FetchError> {
    fetch_with_timeout(url, DEFAULT_TIMEOUT).await
}

/// Fetches a job page, following redirects, bounded by `timeout` for the
/// whole call. Only HTML, XHTML and plain-text pages are accepted.
#[instrument(skip_all, fields(url = %url, timeout_ms = timeout.as_millis() as u64))]
pub async fn fetch_with_timeout(url: &str, timeout: Duration) -> Result<PageResponse, FetchError> {
    let requested = url::Url::parse(url)?;

    let response = HTTP_CLIENT
        .get(requested.clone())
        .timeout(timeout)
        .send()
        .await
        .map_err(FetchError::from_reqwest_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Http {
            status,
            retriable: is_retriable_status(status),
        });
    }

    if let Some(length) = response.content_length()
        && length > MAX_BODY_SIZE
    {
        return Err(FetchError::BodyTooLarge(length));
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .unwrap_or("text/html")
        .to_string();
    if !is_page_content_type(&content_type) {
        return Err(FetchError::UnsupportedContentType(content_type));
    }

    let final_url = response.url().clone();
    let body = response
        .bytes()
        .await
        .map_err(FetchError::from_reqwest_error)?;
    // Content-Length may be absent or wrong
    if body.len() as u64 > MAX_BODY_SIZE {
        return Err(FetchError::BodyTooLarge(body.len() as u64));
    }

    debug!(final_url = %final_url, bytes = body.len(), "fetched job page");
    Ok(decode_page(requested, final_url, status, &content_type, &body))
}

// Job boards occasionally serve postings as text/plain
fn is_page_content_type(content_type: &str) -> bool {
    let lower = content_type.to_ascii_lowercase();
    ["text/html", "application/xhtml", "text/plain"]
        .iter()
        .any(|accepted| lower.contains(accepted))
}
