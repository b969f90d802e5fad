use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::profile::flatten::{flatten_to_text, value_text};
use crate::profile::model::{EDUCATION_PLACEHOLDER, MOTIVATION_PLACEHOLDER};

const EDUCATION_KEYS: &[&str] = &[
    "education",
    "education_background",
    "academic_background",
    "degrees",
    "university",
    "college",
    "school",
];

const MOTIVATION_KEYS: &[&str] = &[
    "motivation",
    "goals",
    "objectives",
    "why",
    "interest",
    "passion",
    "career_goals",
    "aspirations",
    "purpose",
];

// Labels must stand alone, so `education_profile: ...` does not count as education
static EDUCATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["education", "degree", "university"]
        .iter()
        .map(|label| labelled_line(label))
        .collect()
});

static MOTIVATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["motivation", "goals", "why"]
        .iter()
        .map(|label| labelled_line(label))
        .collect()
});

fn labelled_line(label: &str) -> Regex {
    Regex::new(&format!(r"(?im)\b{}\b:?[ \t]*\n?[ \t]*(\S.*)$", label)).unwrap()
}

pub fn education_background(raw: &Value) -> String {
    extract_field(raw, EDUCATION_KEYS, &EDUCATION_PATTERNS)
        .unwrap_or_else(|| EDUCATION_PLACEHOLDER.to_string())
}

pub fn motivation(raw: &Value) -> String {
    extract_field(raw, MOTIVATION_KEYS, &MOTIVATION_PATTERNS)
        .unwrap_or_else(|| MOTIVATION_PLACEHOLDER.to_string())
}

/// Top-level key lookup, then a labelled line anywhere in the flattened profile.
fn extract_field(raw: &Value, keys: &[&str], patterns: &[Regex]) -> Option<String> {
    if let Some(map) = raw.as_object() {
        let direct = keys
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(field_text);
        if direct.is_some() {
            return direct;
        }
    }

    let flattened = flatten_to_text(raw);
    patterns.iter().find_map(|pattern| {
        pattern
            .captures(&flattened)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|text| !text.is_empty())
    })
}

/// Lists become one line per item; empty values yield nothing.
fn field_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Array(items) => items
            .iter()
            .map(value_text)
            .filter(|item| !item.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        other => value_text(other),
    };
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direct_education_key() {
        let raw = json!({"education": "MSc Computer Science, TU Delft"});
        assert_eq!(education_background(&raw), "MSc Computer Science, TU Delft");
    }

    #[test]
    fn test_education_list_joined_by_newline() {
        let raw = json!({"degrees": ["BSc Physics", "", "MSc Statistics"]});
        assert_eq!(education_background(&raw), "BSc Physics\nMSc Statistics");
    }

    #[test]
    fn test_empty_direct_value_falls_through_to_next_key() {
        let raw = json!({"education": "", "university": "University of Porto"});
        assert_eq!(education_background(&raw), "University of Porto");
    }

    #[test]
    fn test_education_found_in_nested_text() {
        let raw = json!({"about": {"history": "Degree: BEng Mechatronics"}});
        assert_eq!(education_background(&raw), "BEng Mechatronics");
    }

    #[test]
    fn test_prefixed_labels_do_not_count() {
        let raw = json!({"stories": {"education_profile": "Bootcamp"}});
        assert_eq!(education_background(&raw), EDUCATION_PLACEHOLDER);
    }

    #[test]
    fn test_motivation_keys_and_patterns() {
        assert_eq!(
            motivation(&json!({"aspirations": "Lead a platform team"})),
            "Lead a platform team"
        );
        assert_eq!(
            motivation(&json!({"notes": "Why: I like hard infrastructure problems"})),
            "I like hard infrastructure problems"
        );
        assert_eq!(motivation(&json!({"name": "Ada"})), MOTIVATION_PLACEHOLDER);
        assert_eq!(motivation(&json!("free text only")), MOTIVATION_PLACEHOLDER);
    }
}
