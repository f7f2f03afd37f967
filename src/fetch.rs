//! Fetching and classifying events
//!
//! The one async step of the pipeline: drain an [`EventSource`] for a range
//! and keep the events that carry at least one tag.

use crate::classifier::TagClassifier;
use calreport_core::error::Result;
use calreport_core::provider::EventSource;
use calreport_core::types::{DateRange, TaggedEvent};
use chrono_tz::Tz;
use futures::StreamExt;
use tracing::{debug, info};

/// Fetch the events of `range` and classify them in `tz`
///
/// The first error from the source stops the fetch and is returned as-is.
/// Untagged events are dropped. The result is sorted by start time.
pub async fn get_events<S: EventSource + ?Sized>(
    source: &S,
    range: &DateRange,
    tz: &Tz,
    classifier: &TagClassifier,
) -> Result<Vec<TaggedEvent>> {
    debug!("Fetching events for {} from {}", range, source.name());

    let mut stream = source.load_events(range, tz);
    let mut fetched = 0usize;
    let mut events = Vec::new();

    while let Some(raw) = stream.next().await {
        let raw = raw?;
        fetched += 1;
        if let Some(event) = classifier.classify(&raw, tz) {
            events.push(event);
        }
    }

    events.sort_by_key(|e| e.start);
    info!(
        "Fetched {} events for {}, {} tagged",
        fetched,
        range,
        events.len()
    );
    Ok(events)
}
