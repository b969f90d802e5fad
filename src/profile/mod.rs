//! Profile normalization.
//!
//! Raw profiles arrive in whatever shape the applicant's tooling produced.
//! [`ProfileNormalizer`] maps any JSON value onto a [`CanonicalProfile`] by
//! running a chain of [`NormalizationStrategy`] steps in priority order and
//! keeping the first one that assigns anything. Normalization never fails.

pub mod fields;
pub mod flatten;
pub mod model;
pub mod strategy;
pub mod taxonomy;

pub use model::{CanonicalProfile, CareerBackground, CareerEntry, CareerStory};
pub use strategy::{Assignment, CareerSource, NormalizationStrategy, SlotShape};
pub use taxonomy::{Category, Taxonomy};

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

pub struct ProfileNormalizer {
    taxonomy: Taxonomy,
    strategies: Vec<Box<dyn NormalizationStrategy>>,
}

impl ProfileNormalizer {
    pub fn new() -> Self {
        Self::with_taxonomy(Taxonomy::legacy())
    }

    pub fn with_taxonomy(taxonomy: Taxonomy) -> Self {
        Self {
            taxonomy,
            strategies: strategy::default_chain(),
        }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn normalize(&self, raw: &Value) -> CanonicalProfile {
        CanonicalProfile {
            career_background: self.career_background(raw),
            education_background: fields::education_background(raw),
            motivation: fields::motivation(raw),
        }
    }

    fn career_background(&self, raw: &Value) -> CareerBackground {
        let assignment = self.strategies.iter().find_map(|strategy| {
            let assignment = strategy.apply(raw, &self.taxonomy)?;
            debug!(strategy = strategy.name(), "career data assigned");
            Some(assignment)
        });

        let mut careers: BTreeMap<String, Option<CareerEntry>> = BTreeMap::new();
        match assignment {
            Some(Assignment {
                shape: SlotShape::Declared,
                slots,
            }) => careers = slots,
            Some(Assignment {
                shape: SlotShape::Taxonomy,
                slots,
            }) => {
                careers.extend(self.taxonomy.names().map(|name| (name.to_string(), None)));
                careers.extend(slots);
            }
            None => {
                debug!("no career data found in profile");
                careers.extend(self.taxonomy.names().map(|name| (name.to_string(), None)));
            }
        }

        CareerBackground { careers }
    }
}

impl Default for ProfileNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
