use scraper::{Html, Selector, node::Node};
use std::sync::LazyLock;

use crate::extractor::model::{ReadResult, collapse_whitespace};

/// Titles at or below this many characters are treated as noise.
const MIN_TITLE_CHARS: usize = 5;

/// Subtrees whose text never belongs to the posting. `<head>` goes too, so the
/// page title only reaches the posting through title extraction.
const SKIPPED_TAGS: &[&str] = &["head", "script", "style", "noscript", "template"];

/// Job-title candidates in priority order; the page `<title>` is tried last.
const TITLE_SELECTORS: &[&str] = &[
    "h1",
    ".job-title",
    ".position-title",
    "[data-testid='job-title']",
    "[class*='job-title']",
    ".top-card-layout__title",
    ".jobsearch-JobInfoHeader-title",
];

static TITLE_CANDIDATES: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    TITLE_SELECTORS
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .collect()
});

static PAGE_TITLE: LazyLock<Option<Selector>> = LazyLock::new(|| Selector::parse("title").ok());

pub fn read(html: &str) -> ReadResult {
    let document = Html::parse_document(html);
    ReadResult {
        title: extract_title(&document),
        text: text_content(&document),
    }
}

/// Newline-separated text of every non-empty text node outside skipped subtrees.
///
/// The first line of each `<li>` is prefixed with `- ` so list items read as
/// bullets and stay inside the section block that precedes them.
fn text_content(document: &Html) -> String {
    let mut lines = Vec::new();
    let mut pending_bullet = false;
    // Explicit stack so hostile nesting depth cannot exhaust the call stack
    let mut stack: Vec<_> = document.tree.root().children().rev().collect();

    while let Some(node) = stack.pop() {
        match node.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if std::mem::take(&mut pending_bullet) {
                    lines.push(format!("- {}", trimmed));
                } else {
                    lines.push(trimmed.to_string());
                }
            }
            Node::Element(element) if SKIPPED_TAGS.contains(&element.name()) => {}
            Node::Element(element) => {
                if element.name() == "li" {
                    pending_bullet = true;
                }
                stack.extend(node.children().rev());
            }
            _ => {}
        }
    }

    lines.join("\n")
}

fn extract_title(document: &Html) -> Option<String> {
    for selector in TITLE_CANDIDATES.iter() {
        if let Some(element) = document.select(selector).next() {
            let title = collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "));
            if title.chars().count() > MIN_TITLE_CHARS {
                return Some(title);
            }
        }
    }

    let selector = PAGE_TITLE.as_ref()?;
    let page_title = document
        .select(selector)
        .next()
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))?;

    title_from_page_title(&page_title)
}

/// "Job Title | Company" keeps the first segment, "Company - Job Title" the last.
pub fn title_from_page_title(page_title: &str) -> Option<String> {
    // Dashes only count as separators when spaced, so "Front-End" survives
    let segment = if page_title.contains('|') {
        page_title.split('|').next()
    } else if let Some((_, last)) = page_title.rsplit_once(" - ") {
        Some(last)
    } else if let Some((_, last)) = page_title.rsplit_once(" \u{2013} ") {
        Some(last)
    } else {
        None
    };

    segment
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_TITLE_CHARS)
        .or_else(|| {
            let whole = page_title.trim();
            (whole.chars().count() > MIN_TITLE_CHARS).then_some(whole)
        })
        .map(str::to_string)
}
