use serde::Serialize;
use serde_json::{Map, Value, json};
use std::fmt::{Display, Formatter};
use thiserror::Error;

use crate::fetcher::FetchError;

/// Categories used to decide retry eligibility and user-facing wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Network,
    Validation,
    Generation,
    Parsing,
    Authentication,
    RateLimit,
    Timeout,
    Unknown,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Validation => "validation",
            Self::Generation => "generation",
            Self::Parsing => "parsing",
            Self::Authentication => "authentication",
            Self::RateLimit => "rate_limit",
            Self::Timeout => "timeout",
            Self::Unknown => "unknown",
        }
    }

    /// Only transient categories are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network | Self::Timeout | Self::RateLimit)
    }
}

impl Display for ErrorCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A categorized failure from a collaborator call.
///
/// `message` is the internal diagnostic; `user_message` is what a caller can
/// show to the applicant.
#[derive(Debug, Clone, Error)]
#[error("{category} error: {message}")]
pub struct AgentError {
    pub category: ErrorCategory,
    pub message: String,
    pub user_message: String,
    pub details: Map<String, Value>,
}

impl AgentError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            category,
            user_message: message.clone(),
            message,
            details: Map::new(),
        }
    }

    pub fn with_user_message(mut self, user_message: impl Into<String>) -> Self {
        self.user_message = user_message.into();
        self
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    pub fn network(message: impl Into<String>, url: Option<&str>, status: Option<u16>) -> Self {
        let message = message.into();
        let user_message = network_user_message(&message, status);
        Self::new(ErrorCategory::Network, message)
            .with_user_message(user_message)
            .with_detail("url", url.map(str::to_string))
            .with_detail("status_code", status)
    }

    pub fn validation(message: impl Into<String>, field: Option<&str>) -> Self {
        let user_message = match field {
            Some("job_description_url") => {
                "Please provide a valid job posting URL (must start with http:// or https://)."
            }
            Some(f) if f.to_lowercase().contains("profile") => {
                "Please provide a complete profile with career background and education information."
            }
            _ => "Please check your input and try again.",
        };
        Self::new(ErrorCategory::Validation, message)
            .with_user_message(user_message)
            .with_detail("field", field.map(str::to_string))
    }

    pub fn authentication(message: impl Into<String>, provider: Option<&str>) -> Self {
        Self::new(ErrorCategory::Authentication, message)
            .with_user_message(
                "This job posting requires login to view. Please try a different job board or copy-paste the description directly.",
            )
            .with_detail("provider", provider.map(str::to_string))
    }

    pub fn generation(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        let user_message = if lower.contains("api key") || lower.contains("authentication") {
            "AI service is not configured properly. Please contact support."
        } else if lower.contains("rate limit") || lower.contains("quota") {
            "AI service is temporarily busy. Please try again in a few minutes."
        } else if lower.contains("timeout") || lower.contains("timed out") {
            "AI response timed out. Please try again."
        } else {
            "AI service temporarily unavailable. Please try again."
        };
        Self::new(ErrorCategory::Generation, message).with_user_message(user_message)
    }

    pub fn parsing(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Parsing, message)
            .with_user_message("The response could not be understood. Please try again.")
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::RateLimit, message)
            .with_user_message("The service is temporarily busy. Please try again in a few minutes.")
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Timeout, message).with_user_message(
            "The request timed out. Please check your internet connection and try again.",
        )
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Unknown, message)
            .with_user_message("Something went wrong. Please try again.")
    }

    pub fn is_retryable(&self) -> bool {
        self.category.is_retryable()
    }

    /// API-facing rendering: user message, category and details.
    pub fn to_json(&self) -> Value {
        json!({
            "error": self.user_message,
            "category": self.category,
            "details": self.details,
        })
    }
}

fn network_user_message(message: &str, status: Option<u16>) -> &'static str {
    let lower = message.to_lowercase();
    match status {
        Some(404) => NOT_FOUND_MESSAGE,
        Some(403) => {
            "Access to this job posting is restricted. Try using a different job board or copy-paste the description."
        }
        Some(s) if s >= 500 => "The job board is temporarily unavailable. Please try again later.",
        _ if lower.contains("404") || lower.contains("not found") => NOT_FOUND_MESSAGE,
        _ if lower.contains("timeout") => {
            "The request timed out. Please check your internet connection and try again."
        }
        _ => {
            "Unable to access the job posting. Please try a different URL or copy-paste the job description."
        }
    }
}

const NOT_FOUND_MESSAGE: &str =
    "The job posting URL could not be found. Please check the URL and try again.";

impl From<FetchError> for AgentError {
    fn from(err: FetchError) -> Self {
        let message = err.to_string();
        match err {
            FetchError::InvalidUrl(_) => Self::validation(message, Some("job_description_url")),
            FetchError::ConnectTimeout | FetchError::RequestTimeout => Self::timeout(message),
            FetchError::Http { status, .. } => match status.as_u16() {
                401 => Self::authentication(message, None),
                429 => Self::rate_limited(message),
                code => Self::network(message, None, Some(code)),
            },
            FetchError::Connect(_) | FetchError::TooManyRedirects => {
                Self::network(message, None, None)
            }
            FetchError::BodyTooLarge(_) | FetchError::UnsupportedContentType(_) => {
                Self::parsing(message)
            }
            FetchError::Other(_) => Self::unknown(message),
        }
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        Self::parsing(format!("invalid JSON: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_network_user_message_for_404() {
        let err = AgentError::network("404 Not Found", Some("https://example.com/job"), Some(404));
        assert_eq!(err.category, ErrorCategory::Network);
        assert!(err.user_message.contains("could not be found"));
        assert_ne!(err.user_message, err.message);
        assert_eq!(err.details["status_code"], json!(404));
    }

    #[test]
    fn test_validation_user_message_for_url_field() {
        let err = AgentError::validation("Invalid URL", Some("job_description_url"));
        assert_eq!(err.category, ErrorCategory::Validation);
        assert!(err.user_message.contains("valid job posting URL"));
    }

    #[test]
    fn test_generation_user_message_for_rate_limit() {
        let err = AgentError::generation("Rate limit exceeded");
        assert_eq!(err.category, ErrorCategory::Generation);
        assert!(err.user_message.contains("busy"));
    }

    #[test]
    fn test_authentication_user_message() {
        let err = AgentError::authentication("Requires login", Some("LinkedIn"));
        assert!(err.user_message.contains("requires login to view"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_retryable_categories() {
        assert!(ErrorCategory::Network.is_retryable());
        assert!(ErrorCategory::Timeout.is_retryable());
        assert!(ErrorCategory::RateLimit.is_retryable());
        for category in [
            ErrorCategory::Validation,
            ErrorCategory::Generation,
            ErrorCategory::Parsing,
            ErrorCategory::Authentication,
            ErrorCategory::Unknown,
        ] {
            assert!(!category.is_retryable(), "{category} should not retry");
        }
    }

    #[test]
    fn test_fetch_error_classification() {
        let timeout: AgentError = FetchError::RequestTimeout.into();
        assert_eq!(timeout.category, ErrorCategory::Timeout);

        let throttled: AgentError = FetchError::Http {
            status: StatusCode::TOO_MANY_REQUESTS,
            retriable: false,
        }
        .into();
        assert_eq!(throttled.category, ErrorCategory::RateLimit);

        let missing: AgentError = FetchError::Http {
            status: StatusCode::NOT_FOUND,
            retriable: false,
        }
        .into();
        assert_eq!(missing.category, ErrorCategory::Network);
        assert!(missing.user_message.contains("could not be found"));

        let unauthorized: AgentError = FetchError::Http {
            status: StatusCode::UNAUTHORIZED,
            retriable: false,
        }
        .into();
        assert_eq!(unauthorized.category, ErrorCategory::Authentication);

        let invalid: AgentError = FetchError::InvalidUrl(url::ParseError::EmptyHost).into();
        assert_eq!(invalid.category, ErrorCategory::Validation);
    }

    #[test]
    fn test_to_json_uses_user_message() {
        let err = AgentError::timeout("read timed out after 30s");
        let value = err.to_json();
        assert_eq!(value["category"], json!("timeout"));
        assert_eq!(value["error"], json!(err.user_message));
    }
}
