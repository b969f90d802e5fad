//! URL validation and job-board classification.
//!
//! Classification is pure string matching against static tables in
//! [`providers`]; nothing here touches the network.

pub mod login;
pub mod providers;

use serde::{Deserialize, Serialize};
use url::Url;

use providers::{
    CAREER_PAGE_MARKERS, CAREER_PAGE_RECOMMENDATION, CAREER_PAGE_TIPS, COMPANY_CAREER_PAGE,
    UNKNOWN_PLATFORM, UNKNOWN_RECOMMENDATION, find_job_board, is_social_media,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformInfo {
    pub provider: String,
    pub requires_login: bool,
    pub recommendation: String,
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlAnalysis {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_info: Option<PlatformInfo>,
    pub warnings: Vec<String>,
}

impl UrlAnalysis {
    fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
            platform_info: None,
            warnings: Vec::new(),
        }
    }
}

/// Validates a job posting URL and identifies the platform hosting it.
pub fn validate_and_analyze(url: &str) -> UrlAnalysis {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return UrlAnalysis::invalid("URL is empty");
    }

    let parsed = match Url::parse(trimmed) {
        Ok(parsed) => parsed,
        Err(e) => return UrlAnalysis::invalid(format!("Invalid URL: {}", e)),
    };

    let host = match parsed.host_str() {
        Some(host) if !host.is_empty() && !parsed.scheme().is_empty() => host.to_lowercase(),
        _ => return UrlAnalysis::invalid("Invalid URL: missing scheme or host"),
    };

    if is_social_media(&host) {
        return UrlAnalysis::invalid(format!(
            "{} is a social media site, not a job posting source",
            host
        ));
    }

    let platform_info = classify(&host, trimmed);

    let mut warnings = Vec::new();
    match parsed.scheme() {
        "https" => {}
        "http" => warnings.push("URL uses plain http; the page may redirect to https".to_string()),
        other => warnings.push(format!("Unusual URL scheme '{}'; fetching may fail", other)),
    }
    if platform_info.requires_login {
        warnings.push(format!(
            "{} may require login; extraction could return incomplete data",
            platform_info.provider
        ));
    }
    if platform_info.provider == UNKNOWN_PLATFORM {
        warnings.push("Unrecognised job platform; results depend on generic heuristics".to_string());
    }

    UrlAnalysis {
        valid: true,
        error: None,
        platform_info: Some(platform_info),
        warnings,
    }
}

/// Provider detection: named boards by host, then careers-page markers
/// anywhere in the URL, then the unknown bucket.
pub fn classify(host: &str, url: &str) -> PlatformInfo {
    if let Some(board) = find_job_board(host) {
        return PlatformInfo {
            provider: board.name.to_string(),
            requires_login: board.requires_login,
            recommendation: board.recommendation.to_string(),
            tips: board.tips.iter().map(|t| t.to_string()).collect(),
        };
    }

    let url_lower = url.to_lowercase();
    if CAREER_PAGE_MARKERS.iter().any(|m| url_lower.contains(m)) {
        return PlatformInfo {
            provider: COMPANY_CAREER_PAGE.to_string(),
            requires_login: false,
            recommendation: CAREER_PAGE_RECOMMENDATION.to_string(),
            tips: CAREER_PAGE_TIPS.iter().map(|t| t.to_string()).collect(),
        };
    }

    PlatformInfo {
        provider: UNKNOWN_PLATFORM.to_string(),
        requires_login: false,
        recommendation: UNKNOWN_RECOMMENDATION.to_string(),
        tips: Vec::new(),
    }
}
