//! Event source trait
//!
//! Calendar back ends implement [`EventSource`] so the report pipeline can
//! fetch raw events without knowing where they come from.

use crate::error::Result;
use crate::types::{DateRange, RawEvent};
use chrono_tz::Tz;
use futures::stream::Stream;
use std::pin::Pin;

/// Boxed stream of raw events, as returned by [`EventSource::load_events`]
pub type EventStream<'a> = Pin<Box<dyn Stream<Item = Result<RawEvent>> + Send + 'a>>;

/// Trait for calendar event sources.
///
/// Implementations yield every event whose start lies within
/// `[range.start 00:00:00, range.end 23:59:59]` in `tz`. Failures to reach or
/// read the calendar are reported as `CalreportError::DataFetch`.
pub trait EventSource: Send + Sync {
    /// Short name used in logs and error messages
    fn name(&self) -> &str;

    /// Stream the events starting inside `range`
    fn load_events<'a>(&'a self, range: &'a DateRange, tz: &'a Tz) -> EventStream<'a>;
}
