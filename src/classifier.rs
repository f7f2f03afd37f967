//! Tag classification for raw calendar events
//!
//! An event's tags come from two places: `#tag` tokens written in its
//! description, and an override table mapping well-known event names to an
//! implied tag (a recurring "Gym" block does not need `#gym` typed into every
//! instance). Events that end up with no tags are left out of the report.
//!
//! # Examples
//!
//! ```
//! use calreport::classifier::TagClassifier;
//! use calreport_core::types::RawEvent;
//! use chrono::DateTime;
//! use chrono_tz::Tz;
//!
//! let classifier = TagClassifier::with_default_overrides();
//! let raw = RawEvent {
//!     summary: "Gym".to_string(),
//!     description: Some("#squat".to_string()),
//!     start: DateTime::parse_from_rfc3339("2024-01-08T08:00:00Z").unwrap(),
//!     end: DateTime::parse_from_rfc3339("2024-01-08T09:00:00Z").unwrap(),
//! };
//!
//! let event = classifier.classify(&raw, &Tz::UTC).unwrap();
//! assert!(event.has_tag("#gym"));
//! assert!(event.has_tag("#squat"));
//! ```

use calreport_core::types::{RawEvent, Tag, TagSet, TaggedEvent, well_known};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

static TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#[a-z]+").expect("tag pattern is a valid regex"));

/// Name-to-tag overrides applied when no configuration replaces them
pub const DEFAULT_OVERRIDES: [(&str, &str); 4] = [
    ("US Bank", well_known::WORK),
    ("Entrepreneurship Block", well_known::WORK),
    ("Learning Block", well_known::WORK),
    ("Gym", well_known::GYM),
];

/// Derives tags for raw events and drops the ones without any
#[derive(Debug, Clone, Default)]
pub struct TagClassifier {
    overrides: HashMap<String, Tag>,
}

impl TagClassifier {
    /// Create a classifier with the given override table
    ///
    /// Keys are normalized the same way event names are, so a key written
    /// with `&` still matches.
    pub fn new(overrides: impl IntoIterator<Item = (String, Tag)>) -> Self {
        Self {
            overrides: overrides
                .into_iter()
                .map(|(name, tag)| (normalize_summary(&name), tag))
                .collect(),
        }
    }

    /// Create a classifier using [`DEFAULT_OVERRIDES`]
    pub fn with_default_overrides() -> Self {
        Self::new(default_overrides())
    }

    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    /// Tags implied by an event, description tags and override combined
    pub fn tags_for(&self, summary: &str, description: Option<&str>) -> TagSet {
        let mut tags = description.map(description_tags).unwrap_or_default();

        if let Some(tag) = self.overrides.get(&normalize_summary(summary)) {
            tags.insert(tag.clone());
        }

        tags
    }

    /// Classify one event in the report timezone
    ///
    /// Returns `None` when the event carries no tags at all.
    pub fn classify(&self, raw: &RawEvent, tz: &Tz) -> Option<TaggedEvent> {
        let summary = normalize_summary(&raw.summary);
        let tags = self.tags_for(&summary, raw.description.as_deref());

        if tags.is_empty() {
            debug!("Dropping untagged event '{}'", summary);
            return None;
        }

        TaggedEvent::new(
            summary,
            raw.start.with_timezone(tz),
            raw.end.with_timezone(tz),
            tags,
        )
    }
}

/// The built-in override table as owned, validated pairs
pub fn default_overrides() -> Vec<(String, Tag)> {
    DEFAULT_OVERRIDES
        .iter()
        .filter_map(|(name, tag)| Tag::parse(tag).ok().map(|t| (name.to_string(), t)))
        .collect()
}

/// Every `#tag` token in a description
pub fn description_tags(description: &str) -> TagSet {
    TAG_PATTERN
        .find_iter(description)
        .filter_map(|m| Tag::parse(m.as_str()).ok())
        .collect()
}

/// Display form of an event name, with `&` spelled out
pub fn normalize_summary(summary: &str) -> String {
    summary.replace('&', "and")
}
