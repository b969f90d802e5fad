use crate::fetcher::types::{Charset, PageResponse};
use chrono::Utc;
use encoding_rs::Encoding;
use regex::Regex;
use reqwest::StatusCode;
use std::sync::LazyLock;
use tracing::{debug, warn};
use url::Url;

/// Only the head of the document is scanned for `<meta>` declarations.
const META_SCAN_BYTES: usize = 4096;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

static META_HTTP_EQUIV_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap()
});

/// Decodes a downloaded page body into a [`PageResponse`]. Malformed byte
/// sequences become U+FFFD.
pub fn decode_page(
    url_requested: Url,
    url_final: Url,
    status: StatusCode,
    content_type: &str,
    body: &[u8],
) -> PageResponse {
    let charset = detect_charset(content_type, body);
    let body_utf8 = decode_to_utf8(body, charset);
    debug!(charset = charset.name(), chars = body_utf8.len(), "decoded job page");

    PageResponse {
        url_requested,
        url_final,
        status,
        charset,
        body_utf8,
        fetched_at: Utc::now(),
    }
}

/// Header charset wins, then `<meta charset>`, then `<meta http-equiv>`,
/// then byte-level detection.
fn detect_charset(content_type: &str, body_bytes: &[u8]) -> Charset {
    if let Some(encoding) = label_from(&CHARSET_REGEX, content_type) {
        return Charset::from_encoding(encoding);
    }

    let head = &body_bytes[..body_bytes.len().min(META_SCAN_BYTES)];
    let head_str = String::from_utf8_lossy(head);

    let declared = label_from(&META_CHARSET_REGEX, &head_str)
        .or_else(|| label_from(&META_HTTP_EQUIV_REGEX, &head_str));
    if let Some(encoding) = declared {
        return Charset::from_encoding(encoding);
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(head, false);
    Charset::from_encoding(detector.guess(None, true))
}

fn label_from(regex: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let label = regex.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes())
}

fn decode_to_utf8(body: &[u8], charset: Charset) -> String {
    let (decoded, _, had_errors) = charset.encoding().decode(body);
    if had_errors {
        warn!(charset = charset.name(), "page has malformed byte sequences, replaced");
    }
    decoded.into_owned()
}
