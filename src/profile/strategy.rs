use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::profile::flatten::{flatten_to_text, value_text};
use crate::profile::model::{CareerEntry, CareerStory};
use crate::profile::taxonomy::Taxonomy;

/// Conventional names for the part of a profile that describes a career.
const CAREER_KEYS: &[&str] = &[
    "career",
    "career_background",
    "background",
    "experience",
    "work_experience",
    "professional_experience",
    "roles",
    "positions",
];

static SECTION_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n|;;|##").unwrap());

/// Shape of the career data found in a raw profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CareerSource<'a> {
    Mapping(&'a Map<String, Value>),
    List(&'a [Value]),
    Text(&'a str),
}

impl<'a> CareerSource<'a> {
    pub fn from_value(value: &'a Value) -> Option<Self> {
        match value {
            Value::Object(map) if !map.is_empty() => Some(Self::Mapping(map)),
            Value::Array(items) if !items.is_empty() => Some(Self::List(items)),
            Value::String(text) if !text.trim().is_empty() => Some(Self::Text(text)),
            _ => None,
        }
    }
}

/// Finds the career section: a conventional key first, then any nested
/// mapping whose content mentions a career.
pub fn locate_career_data(raw: &Value) -> Option<CareerSource<'_>> {
    let map = raw.as_object()?;

    for key in CAREER_KEYS {
        if let Some(source) = map.get(*key).and_then(CareerSource::from_value) {
            return Some(source);
        }
    }

    map.values()
        .filter(|value| value.is_object())
        .find(|value| value.to_string().to_lowercase().contains("career"))
        .and_then(CareerSource::from_value)
}

/// Whether the slots came from the taxonomy or were declared by the profile itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotShape {
    Taxonomy,
    Declared,
}

/// Slot contents produced by one strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub shape: SlotShape,
    pub slots: BTreeMap<String, Option<CareerEntry>>,
}

impl Assignment {
    fn classified(slots: BTreeMap<String, String>) -> Option<Self> {
        let assignment = Self {
            shape: SlotShape::Taxonomy,
            slots: slots
                .into_iter()
                .map(|(name, text)| (name, Some(CareerEntry::Text(text))))
                .collect(),
        };
        (!assignment.is_empty()).then_some(assignment)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.values().all(Option::is_none)
    }
}

/// One step of the career normalization chain.
pub trait NormalizationStrategy: Send + Sync {
    /// Returns `None` when the strategy does not apply or assigns nothing.
    fn apply(&self, raw: &Value, taxonomy: &Taxonomy) -> Option<Assignment>;

    fn name(&self) -> &'static str;
}

/// The chain in priority order.
pub fn default_chain() -> Vec<Box<dyn NormalizationStrategy>> {
    vec![
        Box::new(StructuredCareers),
        Box::new(DirectKeyMatch),
        Box::new(ListDistribution),
        Box::new(TextDistribution),
        Box::new(GlobalFallback),
    ]
}

/// Profiles already shaped as `career_background.careers: {name: story}`
/// keep every named slot as given, populated or not.
pub struct StructuredCareers;

impl NormalizationStrategy for StructuredCareers {
    fn apply(&self, raw: &Value, _taxonomy: &Taxonomy) -> Option<Assignment> {
        let careers = raw.get("career_background")?.get("careers")?.as_object()?;
        if careers.is_empty() {
            return None;
        }

        Some(Assignment {
            shape: SlotShape::Declared,
            slots: careers
                .iter()
                .map(|(name, value)| (name.clone(), career_entry(value)))
                .collect(),
        })
    }

    fn name(&self) -> &'static str {
        "structured_careers"
    }
}

fn career_entry(value: &Value) -> Option<CareerEntry> {
    match value {
        Value::Null => None,
        Value::Object(_) => match serde_json::from_value::<CareerStory>(value.clone()) {
            Ok(story) if !story.is_empty() => Some(CareerEntry::Story(story)),
            Ok(_) => None,
            Err(_) => non_empty_text(value).map(CareerEntry::Text),
        },
        other => non_empty_text(other).map(CareerEntry::Text),
    }
}

fn non_empty_text(value: &Value) -> Option<String> {
    let text = value_text(value);
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Keys of the career mapping, or of the whole profile when no career section
/// exists, matched against category keywords and names.
pub struct DirectKeyMatch;

impl NormalizationStrategy for DirectKeyMatch {
    fn apply(&self, raw: &Value, taxonomy: &Taxonomy) -> Option<Assignment> {
        let map = match locate_career_data(raw) {
            Some(CareerSource::Mapping(map)) => map,
            Some(_) => return None,
            None => raw.as_object()?,
        };

        let mut slots = BTreeMap::new();
        for category in taxonomy.categories() {
            let matched = map
                .iter()
                .find(|(key, _)| category.matches(key))
                .map(|(_, value)| value)
                .or_else(|| map.get(category.name()));

            if let Some(text) = matched.and_then(non_empty_text) {
                slots.insert(category.name().to_string(), text);
            }
        }
        Assignment::classified(slots)
    }

    fn name(&self) -> &'static str {
        "direct_key_match"
    }
}

/// Each list item goes to its first matching category; leftovers share the
/// first category that is still empty.
pub struct ListDistribution;

impl NormalizationStrategy for ListDistribution {
    fn apply(&self, raw: &Value, taxonomy: &Taxonomy) -> Option<Assignment> {
        let Some(CareerSource::List(items)) = locate_career_data(raw) else {
            return None;
        };

        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut unassigned = Vec::new();
        for text in items.iter().filter_map(non_empty_text) {
            match taxonomy.classify(&text) {
                Some(category) => grouped
                    .entry(category.name().to_string())
                    .or_default()
                    .push(text),
                None => unassigned.push(text),
            }
        }

        let mut slots: BTreeMap<String, String> = grouped
            .into_iter()
            .map(|(name, texts)| (name, texts.join("\n")))
            .collect();

        if !unassigned.is_empty()
            && let Some(empty) = taxonomy.names().find(|name| !slots.contains_key(*name))
        {
            slots.insert(empty.to_string(), unassigned.join("\n"));
        }
        Assignment::classified(slots)
    }

    fn name(&self) -> &'static str {
        "list_distribution"
    }
}

/// A single career string split into sections and classified per section.
pub struct TextDistribution;

impl NormalizationStrategy for TextDistribution {
    fn apply(&self, raw: &Value, taxonomy: &Taxonomy) -> Option<Assignment> {
        let Some(CareerSource::Text(text)) = locate_career_data(raw) else {
            return None;
        };
        Assignment::classified(distribute_text(text, taxonomy))
    }

    fn name(&self) -> &'static str {
        "text_distribution"
    }
}

/// The whole profile flattened to text, then distributed like a career string.
pub struct GlobalFallback;

impl NormalizationStrategy for GlobalFallback {
    fn apply(&self, raw: &Value, taxonomy: &Taxonomy) -> Option<Assignment> {
        Assignment::classified(distribute_text(&flatten_to_text(raw), taxonomy))
    }

    fn name(&self) -> &'static str {
        "global_fallback"
    }
}

/// Sections mentioning a category keyword go to that category; sections of the
/// same category are joined. While nothing has matched, an unclassified section
/// fills the first empty category.
pub fn distribute_text(text: &str, taxonomy: &Taxonomy) -> BTreeMap<String, String> {
    let mut slots: BTreeMap<String, String> = BTreeMap::new();

    for section in SECTION_SEPARATOR.split(text).map(str::trim) {
        if section.is_empty() {
            continue;
        }

        if let Some(category) = taxonomy.classify(section) {
            slots
                .entry(category.name().to_string())
                .and_modify(|existing| {
                    existing.push_str("\n\n");
                    existing.push_str(section);
                })
                .or_insert_with(|| section.to_string());
        } else if slots.is_empty()
            && let Some(first) = taxonomy.names().next()
        {
            slots.insert(first.to_string(), section.to_string());
        }
    }
    slots
}
