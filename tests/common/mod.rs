//! Common test utilities and helpers for calreport tests
//!
//! Builders for raw events and calendar export fixtures written to a
//! temporary directory.

#![allow(dead_code)]

use calreport::types::RawEvent;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use serde_json::{Value, json};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Sunday 2024-01-07
pub fn week_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn timestamp(rfc3339: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(rfc3339).unwrap()
}

/// Builder for [`RawEvent`]s in tests
pub struct RawEventBuilder {
    summary: String,
    description: Option<String>,
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
}

impl RawEventBuilder {
    pub fn new(summary: &str) -> Self {
        Self {
            summary: summary.to_string(),
            description: None,
            start: timestamp("2024-01-08T09:00:00Z"),
            end: timestamp("2024-01-08T10:00:00Z"),
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn at(mut self, start: &str, end: &str) -> Self {
        self.start = timestamp(start);
        self.end = timestamp(end);
        self
    }

    pub fn lasting(mut self, start: DateTime<FixedOffset>, minutes: i64) -> Self {
        self.start = start;
        self.end = start + Duration::minutes(minutes);
        self
    }

    pub fn build(self) -> RawEvent {
        RawEvent {
            summary: self.summary,
            description: self.description,
            start: self.start,
            end: self.end,
        }
    }
}

/// A calendar event resource as it appears in an export
pub fn export_item(summary: &str, description: Option<&str>, start: &str, end: &str) -> Value {
    let mut item = json!({
        "summary": summary,
        "start": { "dateTime": start },
        "end": { "dateTime": end },
    });
    if let Some(description) = description {
        item["description"] = json!(description);
    }
    item
}

/// Temporary calendar export and reports directory
pub struct Fixture {
    pub dir: TempDir,
    pub events: PathBuf,
    pub reports: PathBuf,
}

impl Fixture {
    pub fn new(items: Vec<Value>) -> Self {
        let dir = TempDir::new().unwrap();
        let events = dir.path().join("events.json");
        let reports = dir.path().join("reports");
        fs::create_dir(&reports).unwrap();
        fs::write(
            &events,
            serde_json::to_string_pretty(&json!({ "kind": "calendar#events", "items": items }))
                .unwrap(),
        )
        .unwrap();

        Self {
            dir,
            events,
            reports,
        }
    }

    /// The example week: fitness, work and an untagged appointment
    pub fn sample_week() -> Self {
        Self::new(vec![
            export_item("Gym", Some("#squat"), "2024-01-08T08:00:00Z", "2024-01-08T09:00:00Z"),
            export_item("Learning Block", None, "2024-01-08T14:00:00Z", "2024-01-08T16:30:00Z"),
            export_item("US Bank", None, "2024-01-09T09:00:00Z", "2024-01-09T12:00:00Z"),
            export_item("US Bank", Some("#work"), "2024-01-09T13:00:00Z", "2024-01-09T14:00:00Z"),
            export_item("Dentist", None, "2024-01-10T10:00:00Z", "2024-01-10T11:00:00Z"),
            export_item(
                "Research & Development",
                Some("#work #deep"),
                "2024-01-12T10:00:00Z",
                "2024-01-12T11:15:00Z",
            ),
        ])
    }
}
