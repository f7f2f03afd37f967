//! Tests for reading calendar exports from disk

use calreport_core::error::CalreportError;
use calreport_core::provider::EventSource;
use calreport_core::types::DateRange;
use calreport_provider_json::DataLoader;
use chrono::NaiveDate;
use chrono_tz::Tz;
use futures::StreamExt;
use std::fs;
use tempfile::TempDir;

const WEEK_EXPORT: &str = r##"{
  "kind": "calendar#events",
  "items": [
    {
      "summary": "Learning Block",
      "start": {"dateTime": "2024-01-08T14:00:00Z"},
      "end": {"dateTime": "2024-01-08T16:30:00Z"}
    },
    {
      "summary": "Gym",
      "description": "#squat",
      "start": {"dateTime": "2024-01-09T08:00:00Z"},
      "end": {"dateTime": "2024-01-09T09:00:00Z"}
    },
    {
      "summary": "Next week",
      "description": "#work",
      "start": {"dateTime": "2024-01-15T08:00:00Z"},
      "end": {"dateTime": "2024-01-15T09:00:00Z"}
    },
    {
      "summary": "Birthday",
      "start": {"date": "2024-01-10"},
      "end": {"date": "2024-01-11"}
    }
  ]
}"##;

fn week() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 13).unwrap(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_loads_events_within_range() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.json");
    fs::write(&path, WEEK_EXPORT).unwrap();

    let loader = DataLoader::new(&path).unwrap();
    let range = week();
    let tz = Tz::UTC;

    let events: Vec<_> = loader.load_events(&range, &tz).collect().await;
    let events: Vec<_> = events.into_iter().map(|e| e.unwrap()).collect();

    let summaries: Vec<&str> = events.iter().map(|e| e.summary.as_str()).collect();
    assert_eq!(summaries, vec!["Learning Block", "Gym"]);
}

#[tokio::test]
async fn test_range_bounds_follow_timezone() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.json");
    // 02:00 UTC on the 14th is still the 13th in New York
    fs::write(
        &path,
        r##"[{
            "summary": "Late session",
            "description": "#work",
            "start": {"dateTime": "2024-01-14T02:00:00Z"},
            "end": {"dateTime": "2024-01-14T03:00:00Z"}
        }]"##,
    )
    .unwrap();

    let loader = DataLoader::new(&path).unwrap();
    let range = week();

    let utc: Tz = Tz::UTC;
    let in_utc: Vec<_> = loader.load_events(&range, &utc).collect().await;
    assert!(in_utc.is_empty());

    let new_york: Tz = "America/New_York".parse().unwrap();
    let in_new_york: Vec<_> = loader.load_events(&range, &new_york).collect().await;
    assert_eq!(in_new_york.len(), 1);
}

#[tokio::test]
async fn test_reads_every_json_file_in_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.json"), WEEK_EXPORT).unwrap();
    fs::write(
        dir.path().join("b.json"),
        r##"[{
            "summary": "US Bank",
            "start": {"dateTime": "2024-01-10T09:00:00Z"},
            "end": {"dateTime": "2024-01-10T12:00:00Z"}
        }]"##,
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "not an export").unwrap();

    let loader = DataLoader::new(dir.path()).unwrap();
    let range = week();
    let tz = Tz::UTC;

    let events: Vec<_> = loader.load_events(&range, &tz).collect().await;
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|e| e.is_ok()));
}

#[tokio::test]
async fn test_invalid_json_is_a_fetch_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    let loader = DataLoader::new(&path).unwrap();
    let range = week();
    let tz = Tz::UTC;

    let events: Vec<_> = loader.load_events(&range, &tz).collect().await;
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], Err(CalreportError::DataFetch { .. })));
}

#[tokio::test]
async fn test_malformed_event_stops_the_stream() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.json");
    fs::write(
        &path,
        r##"[{
            "summary": "Entrepreneurship Block",
            "start": {"dateTime": "2024-01-08T09:00:00Z"}
        }]"##,
    )
    .unwrap();

    let loader = DataLoader::new(&path).unwrap();
    let range = week();
    let tz = Tz::UTC;

    let events: Vec<_> = loader.load_events(&range, &tz).collect().await;
    match &events[..] {
        [Err(CalreportError::MalformedEvent { summary, .. })] => {
            assert_eq!(summary, "Entrepreneurship Block");
        }
        other => panic!("Expected one MalformedEvent, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_event_outside_range_is_ignored() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.json");
    fs::write(
        &path,
        r##"[
            {
                "summary": "Old import",
                "start": {"dateTime": "2023-12-01T09:00:00Z"}
            },
            {
                "summary": "US Bank",
                "start": {"dateTime": "2024-01-10T09:00:00Z"},
                "end": {"dateTime": "2024-01-10T12:00:00Z"}
            }
        ]"##,
    )
    .unwrap();

    let loader = DataLoader::new(&path).unwrap();
    let range = week();
    let tz = Tz::UTC;

    let events: Vec<_> = loader.load_events(&range, &tz).collect().await;
    let events: Vec<_> = events.into_iter().map(|e| e.unwrap()).collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].summary, "US Bank");
}

#[tokio::test]
async fn test_loads_day_whose_midnight_is_skipped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.json");
    fs::write(
        &path,
        r##"[{
            "summary": "Learning Block",
            "start": {"dateTime": "2024-09-08T10:00:00-03:00"},
            "end": {"dateTime": "2024-09-08T12:00:00-03:00"}
        }]"##,
    )
    .unwrap();

    let loader = DataLoader::new(&path).unwrap();
    let range = DateRange::single(NaiveDate::from_ymd_opt(2024, 9, 8).unwrap());
    let santiago: Tz = "America/Santiago".parse().unwrap();

    let events: Vec<_> = loader.load_events(&range, &santiago).collect().await;
    assert_eq!(events.len(), 1);
    assert!(events[0].is_ok());
}

#[test]
fn test_missing_path_is_rejected() {
    let dir = TempDir::new().unwrap();
    let result = DataLoader::new(dir.path().join("missing.json"));
    assert!(matches!(result, Err(CalreportError::DataFetch { .. })));
}
