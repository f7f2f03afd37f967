//! Aggregation module for summarizing tagged events
//!
//! This module turns the tagged events of one report into the rollups the
//! report is built from:
//!
//! - a work rollup: hours per (category, day), where the category is the
//!   event summary of every `#work` event
//! - a fitness rollup: how many gym, squat and bench sessions happened
//! - day buckets: the events of each day, in chronological order
//!
//! Hours are kept at full `f64` precision here; rounding happens only when a
//! report is rendered.
//!
//! # Examples
//!
//! ```
//! use calreport::aggregation::Aggregator;
//! use calreport_core::types::DateRange;
//! use chrono::NaiveDate;
//!
//! let range = DateRange::new(
//!     NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 1, 13).unwrap(),
//! )
//! .unwrap();
//! let aggregator = Aggregator::new(&range);
//!
//! let rollup = aggregator.extract_work_rollup(&[]);
//! assert!(rollup.is_empty());
//! assert_eq!(rollup.grand_total(), 0.0);
//! ```

use calreport_core::types::{DateRange, TaggedEvent, well_known};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Work hours per category and day
///
/// Every category has exactly one entry per day of the range, zero when
/// nothing happened. Categories keep the order in which they were first seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkRollup {
    days: Vec<NaiveDate>,
    categories: Vec<String>,
    /// `hours[category][day]`
    hours: Vec<Vec<f64>>,
}

impl WorkRollup {
    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Whether no `#work` event was seen
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    fn category_index(&self, category: &str) -> Option<usize> {
        self.categories.iter().position(|c| c == category)
    }

    fn day_index(&self, day: NaiveDate) -> Option<usize> {
        self.days.iter().position(|d| *d == day)
    }

    /// Hours for one (category, day) cell
    pub fn hours(&self, category: &str, day: NaiveDate) -> Option<f64> {
        let c = self.category_index(category)?;
        let d = self.day_index(day)?;
        Some(self.hours[c][d])
    }

    /// Per-day hours of one category, in day order
    pub fn row(&self, category: &str) -> Option<&[f64]> {
        self.category_index(category)
            .map(|c| self.hours[c].as_slice())
    }

    /// Every category with its per-day hours
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.categories
            .iter()
            .map(String::as_str)
            .zip(self.hours.iter().map(Vec::as_slice))
    }

    /// Hours of one category across the whole range
    pub fn category_total(&self, category: &str) -> f64 {
        self.row(category).map(|r| r.iter().sum()).unwrap_or(0.0)
    }

    /// Range totals for every category, in category order
    pub fn category_totals(&self) -> Vec<(&str, f64)> {
        self.rows()
            .map(|(category, hours)| (category, hours.iter().sum()))
            .collect()
    }

    /// Hours across all categories on one day
    pub fn daily_total(&self, day: NaiveDate) -> f64 {
        match self.day_index(day) {
            Some(d) => self.hours.iter().map(|row| row[d]).sum(),
            None => 0.0,
        }
    }

    /// Totals for every day, in day order
    pub fn daily_totals(&self) -> Vec<f64> {
        (0..self.days.len())
            .map(|d| self.hours.iter().map(|row| row[d]).sum())
            .collect()
    }

    /// Hours across all categories and days
    pub fn grand_total(&self) -> f64 {
        self.hours.iter().flatten().sum()
    }
}

/// Sum of every category's hours on `day`
pub fn daily_total(rollup: &WorkRollup, day: NaiveDate) -> f64 {
    rollup.daily_total(day)
}

/// Counts of fitness sessions
///
/// `gym` counts every event tagged `#gym`, `#squat` or `#bench`, so an event
/// tagged only `#squat` still counts as a gym session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FitnessRollup {
    #[serde(rename = "Gym")]
    pub gym: u32,
    #[serde(rename = "Squat")]
    pub squat: u32,
    #[serde(rename = "Bench")]
    pub bench: u32,
}

impl FitnessRollup {
    /// Column labels, in display order
    pub const KEYS: [&'static str; 3] = ["Gym", "Squat", "Bench"];

    /// Counts paired with their labels, in display order
    pub fn entries(&self) -> [(&'static str, u32); 3] {
        [
            (Self::KEYS[0], self.gym),
            (Self::KEYS[1], self.squat),
            (Self::KEYS[2], self.bench),
        ]
    }

    fn add_event(&mut self, event: &TaggedEvent) {
        if !event.tags.contains_any(&well_known::FITNESS) {
            return;
        }

        self.gym += 1;
        if event.has_tag(well_known::SQUAT) {
            self.squat += 1;
        }
        if event.has_tag(well_known::BENCH) {
            self.bench += 1;
        }
    }
}

/// A date with the events that started on it
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket<'a> {
    pub date: NaiveDate,
    /// Every tagged event of the day, work or not, by start time
    pub events: Vec<&'a TaggedEvent>,
}

impl DayBucket<'_> {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Accumulator for the work rollup
struct WorkAccumulator {
    day_index: HashMap<NaiveDate, usize>,
    category_index: HashMap<String, usize>,
    categories: Vec<String>,
    minutes: Vec<Vec<i64>>,
}

impl WorkAccumulator {
    fn new(days: &[NaiveDate]) -> Self {
        Self {
            day_index: days.iter().enumerate().map(|(i, d)| (*d, i)).collect(),
            category_index: HashMap::new(),
            categories: Vec::new(),
            minutes: Vec::new(),
        }
    }

    fn add_event(&mut self, event: &TaggedEvent) {
        let width = self.day_index.len();
        let c = match self.category_index.get(&event.summary) {
            Some(&c) => c,
            None => {
                let c = self.categories.len();
                self.category_index.insert(event.summary.clone(), c);
                self.categories.push(event.summary.clone());
                self.minutes.push(vec![0; width]);
                c
            }
        };

        // Events outside the range still register their category
        if let Some(&d) = self.day_index.get(&event.date()) {
            self.minutes[c][d] += event.duration_minutes;
        }
    }

    fn into_work_rollup(self, days: Vec<NaiveDate>) -> WorkRollup {
        WorkRollup {
            days,
            categories: self.categories,
            hours: self
                .minutes
                .into_iter()
                .map(|row| row.into_iter().map(|m| m as f64 / 60.0).collect())
                .collect(),
        }
    }
}

/// Main aggregation engine
///
/// Holds the days of one report range; every rollup it produces covers
/// exactly those days.
#[derive(Debug, Clone)]
pub struct Aggregator {
    days: Vec<NaiveDate>,
}

impl Aggregator {
    /// Create an aggregator for every day of `range`
    pub fn new(range: &DateRange) -> Self {
        Self {
            days: range.days(),
        }
    }

    /// Create an aggregator for an explicit list of days
    pub fn for_days(days: Vec<NaiveDate>) -> Self {
        Self { days }
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    /// Hours per (category, day) for every `#work` event
    pub fn extract_work_rollup(&self, events: &[TaggedEvent]) -> WorkRollup {
        let mut acc = WorkAccumulator::new(&self.days);

        for event in events.iter().filter(|e| e.has_tag(well_known::WORK)) {
            acc.add_event(event);
        }

        let rollup = acc.into_work_rollup(self.days.clone());
        debug!(
            "Work rollup: {} categories over {} days, {:.2} hours",
            rollup.categories.len(),
            rollup.days.len(),
            rollup.grand_total()
        );
        rollup
    }

    /// Count fitness sessions in a single pass
    pub fn extract_fitness_rollup(events: &[TaggedEvent]) -> FitnessRollup {
        let mut rollup = FitnessRollup::default();
        for event in events {
            rollup.add_event(event);
        }
        rollup
    }

    /// The events of each day, one bucket per day even when empty
    pub fn bucket_by_day<'a>(&self, events: &'a [TaggedEvent]) -> Vec<DayBucket<'a>> {
        self.days
            .iter()
            .map(|&date| {
                let mut day_events: Vec<&TaggedEvent> =
                    events.iter().filter(|e| e.date() == date).collect();
                day_events.sort_by_key(|e| e.start);
                DayBucket {
                    date,
                    events: day_events,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calreport_core::types::{Tag, TagSet};
    use chrono::TimeZone;
    use chrono_tz::Tz;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn week() -> DateRange {
        DateRange::new(date(7), date(13)).unwrap()
    }

    fn event(summary: &str, tags: &[&str], day: u32, start: (u32, u32), end: (u32, u32)) -> TaggedEvent {
        let tz = Tz::UTC;
        let tags: TagSet = tags.iter().map(|t| Tag::parse(t).unwrap()).collect();
        TaggedEvent::new(
            summary,
            tz.with_ymd_and_hms(2024, 1, day, start.0, start.1, 0).unwrap(),
            tz.with_ymd_and_hms(2024, 1, day, end.0, end.1, 0).unwrap(),
            tags,
        )
        .unwrap()
    }

    #[test]
    fn test_work_accumulator() {
        let days = week().days();
        let mut acc = WorkAccumulator::new(&days);
        acc.add_event(&event("US Bank", &["#work"], 8, (9, 0), (12, 0)));
        acc.add_event(&event("US Bank", &["#work"], 8, (13, 0), (14, 30)));

        assert_eq!(acc.categories, vec!["US Bank"]);
        assert_eq!(acc.minutes[0][1], 270);
    }

    #[test]
    fn test_work_rollup_fills_every_day() {
        let aggregator = Aggregator::new(&week());
        let events = vec![event("Learning Block", &["#work"], 8, (14, 0), (16, 30))];

        let rollup = aggregator.extract_work_rollup(&events);
        let row = rollup.row("Learning Block").unwrap();
        assert_eq!(row.len(), 7);
        assert_eq!(row[1], 2.5);
        assert_eq!(row.iter().filter(|h| **h == 0.0).count(), 6);
        assert_eq!(rollup.hours("Learning Block", date(8)), Some(2.5));
        assert_eq!(rollup.hours("Learning Block", date(9)), Some(0.0));
    }

    #[test]
    fn test_work_rollup_ignores_non_work_events() {
        let aggregator = Aggregator::new(&week());
        let events = vec![
            event("Gym", &["#gym", "#squat"], 8, (8, 0), (9, 0)),
            event("Reading", &["#book"], 8, (20, 0), (21, 0)),
        ];

        let rollup = aggregator.extract_work_rollup(&events);
        assert!(rollup.is_empty());
        assert_eq!(rollup.daily_total(date(8)), 0.0);
    }

    #[test]
    fn test_same_summary_same_day_sums_into_one_cell() {
        let aggregator = Aggregator::new(&week());
        let events = vec![
            event("US Bank", &["#work"], 9, (9, 0), (11, 0)),
            event("US Bank", &["#work"], 9, (13, 0), (14, 0)),
        ];

        let rollup = aggregator.extract_work_rollup(&events);
        assert_eq!(rollup.categories().len(), 1);
        assert_eq!(rollup.hours("US Bank", date(9)), Some(3.0));
    }

    #[test]
    fn test_categories_keep_first_seen_order() {
        let aggregator = Aggregator::new(&week());
        let events = vec![
            event("Learning Block", &["#work"], 10, (9, 0), (10, 0)),
            event("US Bank", &["#work"], 8, (9, 0), (10, 0)),
            event("Learning Block", &["#work"], 8, (11, 0), (12, 0)),
            event("Entrepreneurship Block", &["#work"], 9, (9, 0), (10, 0)),
        ];

        let rollup = aggregator.extract_work_rollup(&events);
        assert_eq!(
            rollup.categories(),
            &["Learning Block", "US Bank", "Entrepreneurship Block"]
        );
    }

    #[test]
    fn test_totals_agree() {
        let aggregator = Aggregator::new(&week());
        let events = vec![
            event("US Bank", &["#work"], 8, (9, 0), (12, 20)),
            event("Learning Block", &["#work"], 8, (13, 0), (14, 10)),
            event("US Bank", &["#work"], 12, (9, 0), (17, 0)),
            event("Entrepreneurship Block", &["#work"], 13, (10, 0), (10, 45)),
        ];

        let rollup = aggregator.extract_work_rollup(&events);
        let by_day: f64 = rollup.daily_totals().iter().sum();
        let by_category: f64 = rollup.category_totals().iter().map(|(_, h)| h).sum();

        assert!((by_day - by_category).abs() < 1e-9);
        assert!((rollup.grand_total() - by_day).abs() < 1e-9);
        assert!((daily_total(&rollup, date(8)) - (200.0 + 70.0) / 60.0).abs() < 1e-9);
        assert!((rollup.category_total("US Bank") - (200.0 + 480.0) / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_length_event_is_kept() {
        let aggregator = Aggregator::new(&week());
        let events = vec![event("US Bank", &["#work"], 8, (9, 0), (9, 0))];

        let rollup = aggregator.extract_work_rollup(&events);
        assert_eq!(rollup.categories(), &["US Bank"]);
        assert_eq!(rollup.grand_total(), 0.0);
    }

    #[test]
    fn test_fitness_rollup() {
        let events = vec![
            event("Gym", &["#gym", "#squat"], 8, (8, 0), (9, 0)),
            event("Gym", &["#gym", "#bench"], 10, (8, 0), (9, 0)),
            event("Home workout", &["#squat"], 11, (8, 0), (8, 30)),
            event("US Bank", &["#work"], 11, (9, 0), (17, 0)),
        ];

        let fitness = Aggregator::extract_fitness_rollup(&events);
        assert_eq!(
            fitness,
            FitnessRollup {
                gym: 3,
                squat: 2,
                bench: 1
            }
        );
        assert_eq!(
            fitness.entries(),
            [("Gym", 3), ("Squat", 2), ("Bench", 1)]
        );
    }

    #[test]
    fn test_bucket_by_day() {
        let aggregator = Aggregator::new(&week());
        let events = vec![
            event("US Bank", &["#work"], 8, (13, 0), (14, 0)),
            event("Gym", &["#gym"], 8, (7, 0), (8, 0)),
            event("Learning Block", &["#work"], 10, (9, 0), (10, 0)),
        ];

        let buckets = aggregator.bucket_by_day(&events);
        assert_eq!(buckets.len(), 7);
        assert!(buckets[0].is_empty());

        let monday: Vec<&str> = buckets[1].events.iter().map(|e| e.summary.as_str()).collect();
        assert_eq!(monday, vec!["Gym", "US Bank"]);
        assert_eq!(buckets[3].events.len(), 1);
    }

    #[test]
    fn test_rollup_serializes() {
        let aggregator = Aggregator::new(&DateRange::single(date(8)));
        let events = vec![event("US Bank", &["#work"], 8, (9, 0), (10, 30))];
        let rollup = aggregator.extract_work_rollup(&events);

        let json = serde_json::to_value(&rollup).unwrap();
        assert_eq!(json["categories"][0], "US Bank");
        assert_eq!(json["hours"][0][0], 1.5);

        let fitness = serde_json::to_value(FitnessRollup::default()).unwrap();
        assert_eq!(fitness["Gym"], 0);
    }
}
