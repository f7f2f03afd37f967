//! Core types, traits, and utilities for calreport
//!
//! This crate provides the foundational types, error handling, timezone
//! configuration and the event-source trait used by all other calreport
//! crates.

pub mod error;
pub mod provider;
pub mod timezone;
pub mod types;

// Re-export commonly used types
pub use error::{CalreportError, Result};
pub use provider::{EventSource, EventStream};
pub use types::{DateRange, RawEvent, Tag, TagSet, TaggedEvent, TargetPolicy};
