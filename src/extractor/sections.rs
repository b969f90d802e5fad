use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::extractor::model::collapse_whitespace;

/// Upper bound on responsibilities and requirements kept per posting.
pub const MAX_ITEMS: usize = 10;

/// List items shorter than this are headings or noise.
const MIN_ITEM_CHARS: usize = 10;

const RESPONSIBILITY_HEADERS: &[&str] = &[
    r"responsibilit(?:y|ies)",
    r"what you(?:'|’)?ll do",
    r"role responsibilities",
    r"key responsibilities",
    r"your role",
    r"duties",
];

const REQUIREMENT_HEADERS: &[&str] = &[
    r"requirements?",
    r"what you need",
    r"qualifications",
    r"skills required",
    r"you have",
    r"what we(?:'|’)?re looking for",
];

const SUMMARY_HEADERS: &[&str] = &[
    r"about the role",
    r"job summary",
    r"position summary",
    r"overview",
    r"role overview",
];

const COMPANY_HEADERS: &[&str] = &[
    r"about us",
    r"about the company",
    r"who we are",
    r"company description",
    r"company overview",
];

static RESPONSIBILITY_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile_headers(RESPONSIBILITY_HEADERS));
static REQUIREMENT_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile_headers(REQUIREMENT_HEADERS));
static SUMMARY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile_headers(SUMMARY_HEADERS));
static COMPANY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile_headers(COMPANY_HEADERS));

static BULLET_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*•·‣▪●◦–]\s*").unwrap());
static NUMBER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}[.)](?:\s+|$)").unwrap());

/// A header must open its line, optionally behind a markdown hash. Behind a
/// bullet it must be the whole line, otherwise it is a list item.
fn compile_headers(headers: &[&str]) -> Vec<Regex> {
    headers
        .iter()
        .map(|h| {
            Regex::new(&format!(
                r"(?im)^[ \t]*(?:(?:#+[ \t]*)?(?:{h})\b[ \t]*:?|[-*•]+[ \t]*(?:{h})[ \t]*:?[ \t]*$)"
            ))
            .unwrap()
        })
        .collect()
}

/// Which part of the posting a header table describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Responsibilities,
    Requirements,
    Summary,
    Company,
}

impl Section {
    fn patterns(self) -> &'static [Regex] {
        match self {
            Section::Responsibilities => &RESPONSIBILITY_PATTERNS,
            Section::Requirements => &REQUIREMENT_PATTERNS,
            Section::Summary => &SUMMARY_PATTERNS,
            Section::Company => &COMPANY_PATTERNS,
        }
    }
}

/// Every block introduced by one of the section's headers, pattern order first,
/// then position in the text.
pub fn section_blocks(text: &str, section: Section) -> Vec<String> {
    let mut blocks = Vec::new();
    for pattern in section.patterns() {
        for header in pattern.find_iter(text) {
            let block = block_after(&text[header.end()..]);
            if !block.is_empty() {
                blocks.push(block);
            }
        }
    }
    blocks
}

/// Text following a header up to a blank line, a line opening with a capital
/// letter, or the end of the text. The first line is always taken.
fn block_after(rest: &str) -> String {
    let rest = rest.trim_start();
    let mut lines = rest.split('\n');
    let Some(first) = lines.next() else {
        return String::new();
    };

    let mut block = vec![first.trim_end()];
    for line in lines {
        let starts_upper = line.trim_start().chars().next().is_some_and(char::is_uppercase);
        if line.trim().is_empty() || starts_upper {
            break;
        }
        block.push(line.trim_end());
    }
    block.join("\n").trim().to_string()
}

/// Bulleted or numbered lines of a block with their markers removed.
pub fn parse_list_items(block: &str) -> Vec<String> {
    block
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let line = BULLET_PREFIX.replace(line, "");
            let line = NUMBER_PREFIX.replace(&line, "");
            let item = collapse_whitespace(&line);
            let substantial = item.chars().count() >= MIN_ITEM_CHARS;
            let is_link = item.starts_with("http") || item.starts_with("www.");
            (substantial && !is_link).then_some(item)
        })
        .collect()
}

/// Pooled list items for a section: deduplicated in first-seen order, capped.
pub fn list_section(text: &str, section: Section) -> Vec<String> {
    let mut seen = HashSet::new();
    section_blocks(text, section)
        .iter()
        .flat_map(|block| parse_list_items(block))
        .filter(|item| seen.insert(item.clone()))
        .take(MAX_ITEMS)
        .collect()
}

/// First block of a prose section longer than `min_chars`, on one line.
pub fn prose_section(text: &str, section: Section, min_chars: usize) -> Option<String> {
    section_blocks(text, section)
        .into_iter()
        .map(|block| collapse_whitespace(&block))
        .find(|block| block.chars().count() > min_chars)
}
