//! Error types for calreport
//!
//! This module defines the error types used throughout the calreport crates.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! # Example
//!
//! ```
//! use calreport_core::error::{CalreportError, Result};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert io::Error to CalreportError
//!     let _file = std::fs::read_to_string("nonexistent.txt")?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Main error type for calreport operations
///
/// Configuration problems are raised before any events are fetched, fetch
/// failures are passed through from the event source untouched, and
/// malformed events name the offending event so the calendar entry can be
/// fixed at the source.
#[derive(Error, Debug)]
pub enum CalreportError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required setting is missing or invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The event source failed to deliver events
    #[error("Failed to fetch events from {source_name}: {message}")]
    DataFetch {
        /// Name of the event source that failed
        source_name: String,
        /// What went wrong
        message: String,
    },

    /// An event record is missing data the engine cannot do without
    #[error("Malformed event '{summary}': {reason}")]
    MalformedEvent {
        /// Summary of the offending event
        summary: String,
        /// Which field was missing or unusable
        reason: String,
    },

    /// Invalid date format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// Invalid timezone
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// A tag that does not match `#[a-z]+`
    #[error("Invalid tag: {0}")]
    InvalidTag(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CalreportError {
    /// Build a [`CalreportError::DataFetch`] for the named source
    pub fn data_fetch(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataFetch {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Build a [`CalreportError::MalformedEvent`] for the given event summary
    pub fn malformed(summary: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedEvent {
            summary: summary.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for Results in calreport
///
/// # Example
///
/// ```
/// use calreport_core::Result;
///
/// fn process_data() -> Result<String> {
///     Ok("Processed successfully".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, CalreportError>;
