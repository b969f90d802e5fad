pub mod fallback;
pub mod model;
pub mod reader;
pub mod sections;

#[cfg(test)]
mod tests;

pub use model::JobPosting;

use tracing::debug;

use fallback::{MIN_COMPANY_CHARS, MIN_SUMMARY_CHARS, company_from_url, synthesize_summary};
use model::normalize_whitespace;
use sections::{Section, list_section, prose_section};

/// Source URL recorded for postings pasted in by hand.
pub const MANUAL_SOURCE: &str = "manual";

/// Bounds on the first line of pasted text for it to count as a title.
const MIN_PASTED_TITLE_CHARS: usize = 6;
const MAX_PASTED_TITLE_CHARS: usize = 120;

/// Turns a job page into a [`JobPosting`].
///
/// Never fails: sections that cannot be found come back empty, and the summary
/// and company context fall back to synthetic sentences.
pub fn extract(html: &str, source_url: &str) -> JobPosting {
    let page = reader::read(html);
    build_posting(source_url, page.title, &page.text)
}

/// Same heuristics over a description the applicant pasted as plain text.
pub fn extract_from_text(text: &str) -> JobPosting {
    let text = normalize_whitespace(text);
    let title = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .filter(|line| {
            let len = line.chars().count();
            (MIN_PASTED_TITLE_CHARS..=MAX_PASTED_TITLE_CHARS).contains(&len)
        })
        .map(str::to_string);

    build_posting(MANUAL_SOURCE, title, &text)
}

fn build_posting(source_url: &str, title: Option<String>, text: &str) -> JobPosting {
    let responsibilities = list_section(text, Section::Responsibilities);
    let requirements = list_section(text, Section::Requirements);

    let role_summary = prose_section(text, Section::Summary, MIN_SUMMARY_CHARS)
        .unwrap_or_else(|| synthesize_summary(text, title.as_deref()));
    let company_context = prose_section(text, Section::Company, MIN_COMPANY_CHARS)
        .unwrap_or_else(|| company_from_url(source_url));

    debug!(
        url = source_url,
        has_title = title.is_some(),
        responsibilities = responsibilities.len(),
        requirements = requirements.len(),
        "extracted job posting"
    );

    JobPosting {
        url: source_url.to_string(),
        title,
        responsibilities,
        requirements,
        role_summary,
        company_context,
    }
}
