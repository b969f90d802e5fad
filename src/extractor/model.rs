use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Structured view of a job advertisement.
///
/// `role_summary` and `company_context` are never empty: the extractor
/// substitutes a synthetic sentence when the page has nothing usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub url: String,
    pub title: Option<String>,
    pub responsibilities: Vec<String>,
    pub requirements: Vec<String>,
    pub role_summary: String,
    pub company_context: String,
}

/// Plain-text rendering of a parsed page.
#[derive(Debug, Default)]
pub struct ReadResult {
    pub title: Option<String>,
    pub text: String,
}

static SPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\u{a0}]+").unwrap());
static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n+").unwrap());

/// Collapses runs of spaces and tabs and squeezes blank-line runs to one blank line.
pub fn normalize_whitespace(text: &str) -> String {
    let spaced = SPACE_RUN.replace_all(text.trim(), " ");
    BLANK_LINES.replace_all(&spaced, "\n\n").to_string()
}

/// Single-line form: every whitespace run becomes one space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
