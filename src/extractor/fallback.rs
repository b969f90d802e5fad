use url::Url;

use crate::platform::providers::host_matches;

/// Summaries at or below this many characters are replaced by a synthetic one.
pub const MIN_SUMMARY_CHARS: usize = 50;
/// Company blocks at or below this many characters are replaced by a URL-derived one.
pub const MIN_COMPANY_CHARS: usize = 30;

/// Lines shorter than this are not used to synthesize a summary.
const MIN_SUMMARY_LINE_CHARS: usize = 20;
const SUMMARY_LINES: usize = 3;

const UNDISCLOSED_COMPANY: &str = "This is a position at an undisclosed company.";

/// Boards named in the company sentence when the page says nothing about the employer.
const BOARD_NAMES: &[(&str, &str)] = &[
    ("linkedin.com", "LinkedIn"),
    ("indeed.com", "Indeed"),
    ("glassdoor.com", "Glassdoor"),
    ("monster.com", "Monster"),
    ("dice.com", "Dice"),
    ("ziprecruiter.com", "ZipRecruiter"),
];

/// `"{title}. {first substantial lines}"`, or a generic sentence when there is
/// no title or no substantial line.
pub fn synthesize_summary(text: &str, title: Option<&str>) -> String {
    if let Some(title) = title {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| line.chars().count() > MIN_SUMMARY_LINE_CHARS && *line != title)
            .take(SUMMARY_LINES)
            .collect();

        if !lines.is_empty() {
            return format!("{}. {}", title, lines.join(" "));
        }
    }

    format!(
        "This is a {} position requiring specific skills and experience.",
        title.unwrap_or("job")
    )
}

/// Company sentence derived from the posting URL's host.
pub fn company_from_url(source_url: &str) -> String {
    let host = Url::parse(source_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_lowercase));

    let Some(host) = host else {
        return UNDISCLOSED_COMPANY.to_string();
    };
    let domain = host.strip_prefix("www.").unwrap_or(&host);

    if let Some((_, board)) = BOARD_NAMES.iter().find(|(d, _)| host_matches(domain, d)) {
        return format!("This position is posted on {}, a leading job platform.", board);
    }

    match domain.split('.').next().map(title_case) {
        Some(name) if !name.is_empty() => format!("This is a position at {}.", name),
        _ => UNDISCLOSED_COMPANY.to_string(),
    }
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest.
fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut at_word_start = true;
    for c in word.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
