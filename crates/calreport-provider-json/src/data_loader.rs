//! JSON calendar-export data loader
//!
//! Reads a single export file, or every `*.json` file directly inside a
//! directory. Each file holds either a Google Calendar `events.list`
//! response (`{"items": [...]}`) or a bare array of event resources.
//! Only timed events are reported; all-day and cancelled items are skipped.

use calreport_core::error::{CalreportError, Result};
use calreport_core::provider::{EventSource, EventStream};
use calreport_core::types::{DateRange, RawEvent};
use chrono::DateTime;
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

const SOURCE_NAME: &str = "json";

/// Data loader for JSON calendar exports.
pub struct DataLoader {
    path: PathBuf,
}

impl DataLoader {
    /// Create a loader for a file or a directory of export files
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(CalreportError::data_fetch(
                SOURCE_NAME,
                format!("Calendar export not found: {}", path.display()),
            ));
        }

        debug!("Reading calendar events from {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Export files to read, in a stable order
    fn export_files(&self) -> Vec<PathBuf> {
        if self.path.is_file() {
            return vec![self.path.clone()];
        }

        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(&self.path)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.path().to_path_buf())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();

        debug!("Found {} calendar export files", files.len());
        files
    }
}

impl EventSource for DataLoader {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn load_events<'a>(&'a self, range: &'a DateRange, tz: &'a Tz) -> EventStream<'a> {
        Box::pin(async_stream::try_stream! {
            let (first, last) = range.local_bounds(tz)?;

            for path in self.export_files() {
                let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
                    CalreportError::data_fetch(
                        SOURCE_NAME,
                        format!("Failed to read {}: {}", path.display(), e),
                    )
                })?;

                let document: CalendarDocument = serde_json::from_str(&content).map_err(|e| {
                    CalreportError::data_fetch(
                        SOURCE_NAME,
                        format!("Failed to parse {}: {}", path.display(), e),
                    )
                })?;

                let mut in_range = 0usize;
                for item in document.into_items() {
                    // Items outside the range are never validated
                    if item.starts_outside(&first, &last) {
                        continue;
                    }
                    let Some(event) = item.into_raw_event()? else {
                        continue;
                    };

                    in_range += 1;
                    yield event;
                }

                debug!("{} events in range from {}", in_range, path.display());
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Export schema
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum CalendarDocument {
    List { items: Vec<CalendarItem> },
    Bare(Vec<CalendarItem>),
}

impl CalendarDocument {
    fn into_items(self) -> Vec<CalendarItem> {
        match self {
            CalendarDocument::List { items } => items,
            CalendarDocument::Bare(items) => items,
        }
    }
}

#[derive(Deserialize)]
struct CalendarItem {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    start: Option<EventTime>,
    #[serde(default)]
    end: Option<EventTime>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventTime {
    #[serde(default)]
    date_time: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

impl EventTime {
    fn is_all_day(&self) -> bool {
        self.date_time.is_none() && self.date.is_some()
    }
}

impl CalendarItem {
    /// Whether the item has a readable start that falls outside `[first, last]`
    fn starts_outside(&self, first: &DateTime<Tz>, last: &DateTime<Tz>) -> bool {
        self.start
            .as_ref()
            .and_then(|t| t.date_time.as_deref())
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .is_some_and(|start| start < *first || start > *last)
    }

    /// Convert to a raw event; `Ok(None)` for items that are not timed events
    fn into_raw_event(self) -> Result<Option<RawEvent>> {
        let summary = self.summary.unwrap_or_else(|| "(untitled)".to_string());

        if self.status.as_deref() == Some("cancelled") {
            debug!("Skipping cancelled event '{}'", summary);
            return Ok(None);
        }

        if self.start.as_ref().is_some_and(EventTime::is_all_day) {
            debug!("Skipping all-day event '{}'", summary);
            return Ok(None);
        }

        let start = parse_event_time(&summary, "start", self.start.as_ref())?;
        let end = parse_event_time(&summary, "end", self.end.as_ref())?;

        Ok(Some(RawEvent {
            summary,
            description: self.description,
            start,
            end,
        }))
    }
}

fn parse_event_time(
    summary: &str,
    field: &str,
    time: Option<&EventTime>,
) -> Result<DateTime<chrono::FixedOffset>> {
    let raw = time
        .and_then(|t| t.date_time.as_deref())
        .ok_or_else(|| CalreportError::malformed(summary, format!("missing {field}.dateTime")))?;

    DateTime::parse_from_rfc3339(raw).map_err(|e| {
        CalreportError::malformed(summary, format!("invalid {field}.dateTime '{raw}': {e}"))
    })
}
