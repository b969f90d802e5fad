use std::collections::HashSet;
use std::fs;

use crate::extractor::{MANUAL_SOURCE, extract, extract_from_text};

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{}", name))
        .expect("Failed to read test fixture")
}

#[test]
fn test_extract_greenhouse_posting() {
    let html = fixture("greenhouse.html");
    let posting = extract(&html, "https://boards.greenhouse.io/northwind/jobs/4012345");

    assert_eq!(posting.url, "https://boards.greenhouse.io/northwind/jobs/4012345");
    assert_eq!(posting.title.as_deref(), Some("Senior Data Engineer"));
    assert_eq!(
        posting.responsibilities,
        vec![
            "Design and build streaming pipelines on Kafka and Flink",
            "Own the data warehouse schema and its migrations",
            "Partner with analysts on metric definitions",
        ]
    );
    assert_eq!(
        posting.requirements,
        vec![
            "5+ years building production data systems",
            "Fluency in Python or Scala",
            "Experience with Airflow or Dagster",
        ]
    );
    assert!(posting.role_summary.starts_with("You will design and operate"));
    assert_eq!(
        posting.company_context,
        "Northwind builds supply-chain forecasting software for mid-sized retailers across Europe."
    );
}

#[test]
fn test_extract_linkedin_guest_page() {
    let html = fixture("linkedin_guest.html");
    let posting = extract(&html, "https://www.linkedin.com/jobs/view/3712345");

    assert_eq!(posting.title.as_deref(), Some("Machine Learning Engineer"));
    assert_eq!(
        posting.responsibilities,
        vec![
            "train and ship ranking models for search",
            "build offline evaluation harnesses",
            "work with product on experiment design",
        ]
    );
    assert_eq!(
        posting.requirements,
        vec!["hands-on PyTorch experience in production", "solid grasp of statistics"]
    );
    assert!(posting.role_summary.starts_with("Machine Learning Engineer. "));
    assert_eq!(
        posting.company_context,
        "This position is posted on LinkedIn, a leading job platform."
    );
}

#[test]
fn test_extract_sectionless_page_uses_fallbacks() {
    let html = fixture("sectionless.html");
    let posting = extract(&html, "https://www.initech.com/careers/platform-engineer");

    assert_eq!(posting.title.as_deref(), Some("Platform Engineer"));
    assert!(posting.responsibilities.is_empty());
    assert!(posting.requirements.is_empty());
    assert_eq!(
        posting.role_summary,
        "Platform Engineer. Initech is hiring engineers who enjoy building internal platforms. \
         Our platform group runs the deploy tooling used by every product team. \
         We value small pull requests and calm incident reviews."
    );
    assert_eq!(posting.company_context, "This is a position at Initech.");
}

#[test]
fn test_heading_and_inline_list_scenario() {
    let html = "<h1>Senior Backend Engineer</h1><p>Responsibilities:\n- Build APIs\n- Write code</p>";
    let posting = extract(html, "https://example.com/jobs/1");

    assert_eq!(posting.title.as_deref(), Some("Senior Backend Engineer"));
    assert!(posting.responsibilities.contains(&"Build APIs".to_string()));
    assert!(posting.responsibilities.contains(&"Write code".to_string()));
}

#[test]
fn test_list_item_opening_with_header_word_stays_in_its_section() {
    let html = "<h2>Responsibilities</h2><ul><li>Requirements gathering with product owners</li><li>Design data models for billing</li></ul>";
    let posting = extract(html, "https://example.com/jobs/2");

    assert_eq!(
        posting.responsibilities,
        vec!["Requirements gathering with product owners", "Design data models for billing"]
    );
    assert!(posting.requirements.is_empty());
}

#[test]
fn test_empty_html_returns_fallbacks() {
    let posting = extract("", "https://example.com/job");

    assert_eq!(posting.title, None);
    assert!(posting.responsibilities.is_empty());
    assert_eq!(
        posting.role_summary,
        "This is a job position requiring specific skills and experience."
    );
    assert_eq!(posting.company_context, "This is a position at Example.");
}

#[test]
fn test_garbage_input_never_leaves_fields_empty() {
    let bytes: Vec<u8> = (0u16..2048).map(|i| (i.wrapping_mul(37) % 256) as u8).collect();
    let garbage = String::from_utf8_lossy(&bytes).to_string();
    let posting = extract(&garbage, "not a url");

    assert!(!posting.role_summary.is_empty());
    assert_eq!(posting.company_context, "This is a position at an undisclosed company.");
}

#[test]
fn test_malformed_html() {
    let html = "<html><head><title>Broken Staff Role</title><body><h1>Staff Engineer<div>Responsibilities<ul><li>lead the storage migration project";
    let posting = extract(html, "https://example.com/broken");

    assert!(posting.title.is_some());
    assert!(!posting.role_summary.is_empty());
    assert!(!posting.company_context.is_empty());
}

#[test]
fn test_lists_are_capped_and_unique() {
    let mut items = String::new();
    for i in 0..30 {
        // Every item appears twice, once with extra spacing
        items.push_str(&format!("<li>operate cluster number {}</li>", i % 12));
        items.push_str(&format!("<li>operate  cluster number   {}</li>", i % 12));
    }
    let html = format!("<h2>Responsibilities</h2><ul>{}</ul>", items);
    let posting = extract(&html, "https://example.com/jobs/2");

    assert_eq!(posting.responsibilities.len(), 10);
    let unique: HashSet<_> = posting.responsibilities.iter().collect();
    assert_eq!(unique.len(), posting.responsibilities.len());
}

#[test]
fn test_extract_from_pasted_text() {
    let text = "Site Reliability Engineer\n\nAbout the role\nyou will keep our payment APIs fast and available for millions of merchants worldwide.\n\nWhat you'll do\n- run capacity planning each quarter\n- improve alerting quality\n\nAbout us\nwe are a payments company headquartered in Lisbon with a remote-first team.";
    let posting = extract_from_text(text);

    assert_eq!(posting.url, MANUAL_SOURCE);
    assert_eq!(posting.title.as_deref(), Some("Site Reliability Engineer"));
    assert_eq!(
        posting.responsibilities,
        vec!["run capacity planning each quarter", "improve alerting quality"]
    );
    assert!(posting.role_summary.starts_with("you will keep our payment APIs"));
    assert!(posting.company_context.starts_with("we are a payments company"));
}

#[test]
fn test_pasted_text_without_usable_title() {
    let posting = extract_from_text("Hi\nplease see the attached description for details");

    assert_eq!(posting.title, None);
    assert_eq!(
        posting.role_summary,
        "This is a job position requiring specific skills and experience."
    );
    assert_eq!(posting.company_context, "This is a position at an undisclosed company.");
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_leaves_fallbacks_empty(
            html in ".*",
            url in "https://[a-z]+\\.com/.*"
        ) {
            let posting = extract(&html, &url);
            prop_assert!(!posting.role_summary.is_empty());
            prop_assert!(!posting.company_context.is_empty());
        }

        #[test]
        fn test_extract_lists_bounded(
            lines in proptest::collection::vec("[a-z ]{0,40}", 0..40),
        ) {
            let body: String = lines.iter().map(|l| format!("<li>{}</li>", l)).collect();
            let html = format!("<p>Requirements</p><ul>{}</ul>", body);
            let posting = extract(&html, "https://example.com");
            prop_assert!(posting.requirements.len() <= 10);
            let unique: HashSet<_> = posting.requirements.iter().collect();
            prop_assert_eq!(unique.len(), posting.requirements.len());
        }

        #[test]
        fn test_pasted_text_never_panics(text in "\\PC*") {
            let posting = extract_from_text(&text);
            prop_assert_eq!(posting.url, MANUAL_SOURCE);
        }
    }
}
