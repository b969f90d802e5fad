use reqwest::StatusCode;
use thiserror::Error;

/// Why a job page could not be fetched.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("could not reach job board: {0}")]
    Connect(String),

    #[error("connect timeout")]
    ConnectTimeout,

    #[error("request timeout")]
    RequestTimeout,

    #[error("too many redirects")]
    TooManyRedirects,

    #[error("job board answered {status}")]
    Http { status: StatusCode, retriable: bool },

    #[error("page too large ({0} bytes)")]
    BodyTooLarge(u64),

    #[error("not a job page, content-type: {0}")]
    UnsupportedContentType(String),

    #[error("fetch failed: {0}")]
    Other(String),
}

impl FetchError {
    /// Connectivity and server-side trouble may clear up; anything about the
    /// URL or the page itself will not.
    pub fn should_retry(&self) -> bool {
        match self {
            Self::Http { retriable, .. } => *retriable,
            Self::Connect(_)
            | Self::ConnectTimeout
            | Self::RequestTimeout
            | Self::TooManyRedirects => true,
            Self::InvalidUrl(_)
            | Self::Other(_)
            | Self::BodyTooLarge(_)
            | Self::UnsupportedContentType(_) => false,
        }
    }

    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return if err.is_connect() {
                Self::ConnectTimeout
            } else {
                Self::RequestTimeout
            };
        }
        if err.is_redirect() {
            return Self::TooManyRedirects;
        }
        if let Some(status) = err.status() {
            return Self::Http {
                status,
                retriable: is_retriable_status(status),
            };
        }
        if err.is_connect() || err.is_request() {
            Self::Connect(err.to_string())
        } else {
            Self::Other(err.to_string())
        }
    }
}

/// Server errors and throttling are transient; other statuses are final.
pub fn is_retriable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}
