//! Core domain types for calreport
//!
//! This module contains the fundamental types used throughout the calreport
//! crates: raw calendar events as delivered by an event source, validated
//! tags, tagged events with their derived duration, and the inclusive date
//! range a report covers.

use crate::error::{CalreportError, Result};
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use tracing::warn;

/// Tags with a fixed meaning in reports
pub mod well_known {
    /// Events counted towards work hours
    pub const WORK: &str = "#work";
    /// Gym sessions
    pub const GYM: &str = "#gym";
    /// Squat days
    pub const SQUAT: &str = "#squat";
    /// Bench days
    pub const BENCH: &str = "#bench";

    /// Any of these marks an event as a fitness session
    pub const FITNESS: [&str; 3] = [GYM, SQUAT, BENCH];
}

/// A category label such as `#work` or `#gym`
///
/// Tags always match `#[a-z]+`.
///
/// # Examples
/// ```
/// use calreport_core::types::Tag;
///
/// let tag = Tag::parse("#work").unwrap();
/// assert_eq!(tag.as_str(), "#work");
/// assert!(Tag::parse("#Work").is_err());
/// assert!(Tag::parse("work").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    /// Parse and validate a tag
    pub fn parse(raw: &str) -> Result<Self> {
        let body = raw
            .strip_prefix('#')
            .ok_or_else(|| CalreportError::InvalidTag(format!("'{raw}' must start with '#'")))?;

        if body.is_empty() || !body.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(CalreportError::InvalidTag(format!(
                "'{raw}' must be '#' followed by lowercase letters"
            )));
        }

        Ok(Self(raw.to_string()))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Tag {
    type Error = CalreportError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.0
    }
}

impl Borrow<str> for Tag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A deduplicated, ordered collection of tags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet(BTreeSet<Tag>);

impl TagSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag; returns false if it was already present
    pub fn insert(&mut self, tag: Tag) -> bool {
        self.0.insert(tag)
    }

    /// Whether the set holds the given tag
    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    /// Whether the set holds at least one of the given tags
    pub fn contains_any(&self, tags: &[&str]) -> bool {
        tags.iter().any(|t| self.contains(t))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.0.iter().map(Tag::as_str).collect();
        write!(f, "{}", joined.join(" "))
    }
}

/// A calendar event as delivered by an event source
///
/// Timestamps are already localized: they carry the offset the calendar
/// reported them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Display name of the event
    pub summary: String,
    /// Free-text description, where `#tags` live
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Start of the event
    pub start: DateTime<FixedOffset>,
    /// End of the event
    pub end: DateTime<FixedOffset>,
}

/// An event that survived classification
///
/// Holds at least one tag. The duration is derived once, on construction.
///
/// # Examples
/// ```
/// use calreport_core::types::{Tag, TagSet, TaggedEvent};
/// use chrono::TimeZone;
/// use chrono_tz::Tz;
///
/// let tz = Tz::UTC;
/// let start = tz.with_ymd_and_hms(2024, 1, 8, 14, 0, 0).unwrap();
/// let end = tz.with_ymd_and_hms(2024, 1, 8, 16, 30, 0).unwrap();
/// let tags: TagSet = [Tag::parse("#work").unwrap()].into_iter().collect();
///
/// let event = TaggedEvent::new("Learning Block", start, end, tags).unwrap();
/// assert_eq!(event.duration_minutes, 150);
/// assert_eq!(event.hours(), 2.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedEvent {
    /// Normalized display name, used as the work category
    pub summary: String,
    /// Start, expressed in the report timezone
    pub start: DateTime<Tz>,
    /// End, expressed in the report timezone
    pub end: DateTime<Tz>,
    /// Tags derived for this event, never empty
    pub tags: TagSet,
    /// Whole minutes between start and end, never negative
    pub duration_minutes: i64,
}

impl TaggedEvent {
    /// Create a tagged event, or `None` when there are no tags
    ///
    /// An end before the start yields a zero duration.
    pub fn new(
        summary: impl Into<String>,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
        tags: TagSet,
    ) -> Option<Self> {
        if tags.is_empty() {
            return None;
        }

        let summary = summary.into();
        let mut duration_minutes = (end - start).num_minutes();
        if duration_minutes < 0 {
            warn!(
                "Event '{}' ends before it starts ({} -> {}), counting it as 0 minutes",
                summary, start, end
            );
            duration_minutes = 0;
        }

        Some(Self {
            summary,
            start,
            end,
            tags,
            duration_minutes,
        })
    }

    /// Local calendar date the event is attributed to
    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Duration in fractional hours
    pub fn hours(&self) -> f64 {
        self.duration_minutes as f64 / 60.0
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

impl fmt::Display for TaggedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {} ({:.1} hour(s))",
            self.summary,
            self.start.format("%H:%M"),
            self.end.format("%H:%M"),
            self.hours()
        )
    }
}

/// Inclusive range of calendar dates a report covers
///
/// # Examples
/// ```
/// use calreport_core::types::DateRange;
/// use chrono::NaiveDate;
///
/// let range = DateRange::new(
///     NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 13).unwrap(),
/// )
/// .unwrap();
/// assert_eq!(range.days().len(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range; `start` must not be after `end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(CalreportError::InvalidArgument(format!(
                "Range start {start} is after range end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// A range covering one day
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Every date in the range, in order
    pub fn days(&self) -> Vec<NaiveDate> {
        self.start.iter_days().take_while(|d| *d <= self.end).collect()
    }

    pub fn num_days(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// First and last instant of the range in `tz`
    ///
    /// Normally `[start 00:00:00, end 23:59:59]`. Where a DST change skips
    /// midnight the range opens at the first local time that exists, and it
    /// always closes one second before the day after `end` begins.
    pub fn local_bounds(&self, tz: &Tz) -> Result<(DateTime<Tz>, DateTime<Tz>)> {
        let first = first_instant(tz, self.start)?;
        let after = self.end.succ_opt().ok_or_else(|| {
            CalreportError::InvalidDate(format!("No day follows {}", self.end))
        })?;
        let last = first_instant(tz, after)? - Duration::seconds(1);
        Ok((first, last))
    }
}

/// Earliest instant whose local date in `tz` is `date`
fn first_instant(tz: &Tz, date: NaiveDate) -> Result<DateTime<Tz>> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..24 * 60)
        .map(|minute| midnight + Duration::minutes(minute))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
        .ok_or_else(|| {
            CalreportError::InvalidDate(format!("{} does not exist in {}", date, tz.name()))
        })
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Hours of work expected per day of the week
///
/// Defaults to 6 hours Monday to Friday, 4 on Saturday and none on Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetPolicy {
    /// Monday to Friday
    pub weekday: f64,
    pub saturday: f64,
    pub sunday: f64,
}

impl Default for TargetPolicy {
    fn default() -> Self {
        Self {
            weekday: 6.0,
            saturday: 4.0,
            sunday: 0.0,
        }
    }
}

impl TargetPolicy {
    /// Target hours for one date
    pub fn target_for(&self, date: NaiveDate) -> f64 {
        match date.weekday() {
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
            _ => self.weekday,
        }
    }

    /// Sum of the daily targets over a range
    pub fn total_for(&self, range: &DateRange) -> f64 {
        range.days().into_iter().map(|d| self.target_for(d)).sum()
    }
}
