#![no_main]

use libfuzzer_sys::fuzz_target;

use job_agent::extractor::{extract, extract_from_text};

fuzz_target!(|data: &[u8]| {
    // Scraped pages are not always valid UTF-8
    let html = String::from_utf8_lossy(data);

    let posting = extract(&html, "https://example.com/jobs/1");
    assert!(!posting.role_summary.is_empty());
    assert!(!posting.company_context.is_empty());
    assert!(posting.responsibilities.len() <= 10);
    assert!(posting.requirements.len() <= 10);

    let pasted = extract_from_text(&html);
    assert!(!pasted.company_context.is_empty());
});
