use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const EDUCATION_PLACEHOLDER: &str = "Education background not specified.";
pub const MOTIVATION_PLACEHOLDER: &str = "Motivation not specified.";

/// One career narrative: what started it, a representative achievement, and
/// the education and goals that go with it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CareerStory {
    pub initiator: Option<String>,
    pub achievement_sample: Option<String>,
    pub education_profile: Option<String>,
    pub motivation_goals: Option<String>,
}

impl CareerStory {
    pub fn is_empty(&self) -> bool {
        [
            &self.initiator,
            &self.achievement_sample,
            &self.education_profile,
            &self.motivation_goals,
        ]
        .iter()
        .all(|field| field.as_deref().is_none_or(|s| s.trim().is_empty()))
    }
}

/// Content of a career slot: a structured story or free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CareerEntry {
    Story(CareerStory),
    Text(String),
}

/// Named career slots. Unpopulated slots are kept with a `None` value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerBackground {
    pub careers: BTreeMap<String, Option<CareerEntry>>,
}

impl CareerBackground {
    pub fn get(&self, name: &str) -> Option<&CareerEntry> {
        self.careers.get(name).and_then(Option::as_ref)
    }

    /// Slots that carry content, in name order.
    pub fn populated(&self) -> impl Iterator<Item = (&str, &CareerEntry)> {
        self.careers
            .iter()
            .filter_map(|(name, entry)| entry.as_ref().map(|e| (name.as_str(), e)))
    }
}

/// Fixed-shape view of an applicant, independent of how the raw profile was laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalProfile {
    pub career_background: CareerBackground,
    pub education_background: String,
    pub motivation: String,
}
