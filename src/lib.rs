//! calreport - Weekly progress reports from tagged calendar events
//!
//! This library provides functionality to:
//! - Tag calendar events from `#tags` in their descriptions and a name override table
//! - Roll work hours up per category and day, and count fitness sessions
//! - Assemble a report as renderer-agnostic content blocks
//! - Write reports as Markdown with tables and chart directives
//!
//! # Examples
//!
//! ```no_run
//! use calreport::{
//!     classifier::TagClassifier,
//!     range::this_week,
//!     report::{ReportAssembler, generate_report},
//! };
//! use calreport_core::types::TargetPolicy;
//! use calreport_provider_json::DataLoader;
//! use chrono::Local;
//! use chrono_tz::Tz;
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> calreport::Result<()> {
//!     let source = DataLoader::new("calendar-export.json")?;
//!     let classifier = TagClassifier::with_default_overrides();
//!     let assembler = ReportAssembler::new(TargetPolicy::default());
//!
//!     let now = Local::now().naive_local();
//!     let range = this_week(now.date());
//!     let report = generate_report(&source, &classifier, &assembler, &range, &Tz::UTC, now).await?;
//!     report.write_to_dir(Path::new("reports"))?;
//!
//!     Ok(())
//! }
//! ```

pub mod aggregation;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod fetch;
pub mod markdown;
pub mod output;
pub mod range;
pub mod report;

pub use calreport_core::{error, provider, timezone, types};

// Re-export commonly used types
pub use calreport_core::error::{CalreportError, Result};
pub use calreport_core::types::{DateRange, RawEvent, Tag, TagSet, TaggedEvent, TargetPolicy};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
