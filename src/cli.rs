//! CLI interface for calreport
//!
//! This module defines the command-line interface using clap. Each command
//! selects one or more date ranges; running without a command generates
//! reports for both the current and the previous week.
//!
//! # Example
//!
//! ```bash
//! # This week and last week
//! calreport
//!
//! # A single day, in a specific timezone
//! calreport day 2024-01-08 --timezone America/Chicago
//!
//! # A custom range
//! calreport range --since 2024-01-01 --until 2024-01-31
//!
//! # Print this week's totals instead of writing a file
//! calreport summary --json
//! ```

use crate::range::{self, parse_date, parse_until};
use calreport_core::error::Result;
use calreport_core::types::DateRange;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Weekly progress reports from tagged calendar events
#[derive(Parser, Debug, Clone)]
#[command(name = "calreport")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to <config dir>/calreport/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Calendar export file or directory of *.json exports
    #[arg(long, global = true)]
    pub events: Option<PathBuf>,

    /// Directory to write reports to
    #[arg(long, global = true)]
    pub reports_dir: Option<PathBuf>,

    /// Timezone for day boundaries (e.g. "America/New_York", "UTC")
    /// If not specified, uses the configured or system timezone
    #[arg(long, short = 'z', global = true)]
    pub timezone: Option<String>,

    /// Use UTC for day boundaries (overrides --timezone)
    #[arg(long, global = true)]
    pub utc: bool,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    pub as_of: Option<String>,

    /// Show debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Only show warnings and errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Report from Sunday up to today
    ThisWeek,

    /// Report for the previous Sunday to Saturday week
    LastWeek,

    /// Report for a single day
    Day {
        /// Date as YYYY-MM-DD (defaults to today)
        date: Option<String>,
    },

    /// Report for an arbitrary range
    Range(RangeArgs),

    /// Print hour totals to the terminal instead of writing a report
    Summary(SummaryArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RangeArgs {
    /// First day (YYYY-MM-DD or YYYY-MM); defaults to the Sunday before --until
    #[arg(long)]
    pub since: Option<String>,

    /// Last day (YYYY-MM-DD or YYYY-MM); defaults to today
    #[arg(long)]
    pub until: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SummaryArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Summarize the previous week instead of the current one
    #[arg(long)]
    pub last_week: bool,
}

impl Cli {
    /// The date treated as today
    pub fn today(&self, fallback: NaiveDate) -> Result<NaiveDate> {
        match &self.as_of {
            Some(date) => parse_date(date),
            None => Ok(fallback),
        }
    }
}

/// Date ranges selected by a command, in the order they are generated
pub fn resolve_ranges(command: Option<&Command>, today: NaiveDate) -> Result<Vec<DateRange>> {
    let ranges = match command {
        None => vec![range::this_week(today), range::last_week(today)],
        Some(Command::ThisWeek) => vec![range::this_week(today)],
        Some(Command::LastWeek) => vec![range::last_week(today)],
        Some(Command::Day { date }) => {
            let date = match date {
                Some(d) => parse_date(d)?,
                None => today,
            };
            vec![DateRange::single(date)]
        }
        Some(Command::Range(args)) => {
            let since = args.since.as_deref().map(parse_date).transpose()?;
            let until = args.until.as_deref().map(parse_until).transpose()?;
            vec![range::from_bounds(since, until, today)?]
        }
        Some(Command::Summary(args)) => {
            if args.last_week {
                vec![range::last_week(today)]
            } else {
                vec![range::this_week(today)]
            }
        }
    };
    Ok(ranges)
}
