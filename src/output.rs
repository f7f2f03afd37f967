//! Terminal summaries
//!
//! The `summary` command prints hour totals instead of writing a report
//! file:
//! - Table format for human-readable terminal output
//! - JSON format for scripts
//!
//! # Examples
//!
//! ```
//! use calreport::output::{Summary, get_formatter};
//! use calreport_core::types::{DateRange, TargetPolicy};
//! use chrono::NaiveDate;
//!
//! let range = DateRange::single(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
//! let summary = Summary::build(&[], &range, &TargetPolicy::default());
//!
//! let json = get_formatter(true, false).format_summary(&summary);
//! assert!(json.contains("\"total_target\": 6.0"));
//! ```

use crate::aggregation::{Aggregator, FitnessRollup};
use crate::report::format_hours;
use calreport_core::types::{DateRange, TaggedEvent, TargetPolicy};
use chrono::NaiveDate;
use colored::*;
use prettytable::{Cell, Row, Table, format, row};
use serde::Serialize;

/// Target and actual work hours for one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub target: f64,
    pub worked: f64,
}

impl DaySummary {
    pub fn met_target(&self) -> bool {
        self.worked >= self.target
    }
}

/// Hours of one work category over the range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub hours: f64,
}

/// Totals for one range, as shown by the `summary` command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: Vec<DaySummary>,
    pub categories: Vec<CategorySummary>,
    pub fitness: FitnessRollup,
    pub total_worked: f64,
    pub total_target: f64,
}

impl Summary {
    pub fn build(events: &[TaggedEvent], range: &DateRange, targets: &TargetPolicy) -> Self {
        let aggregator = Aggregator::new(range);
        let work = aggregator.extract_work_rollup(events);

        let days = work
            .days()
            .iter()
            .map(|&date| DaySummary {
                date,
                target: targets.target_for(date),
                worked: work.daily_total(date),
            })
            .collect();

        let categories = work
            .category_totals()
            .into_iter()
            .map(|(category, hours)| CategorySummary {
                category: category.to_string(),
                hours,
            })
            .collect();

        Self {
            start: range.start(),
            end: range.end(),
            days,
            categories,
            fitness: Aggregator::extract_fitness_rollup(events),
            total_worked: work.grand_total(),
            total_target: targets.total_for(range),
        }
    }

    pub fn met_target(&self) -> bool {
        self.total_worked >= self.total_target
    }
}

/// Trait for summary formatters
pub trait OutputFormatter {
    fn format_summary(&self, summary: &Summary) -> String;
}

/// Human-readable tables
pub struct TableFormatter {
    /// Whether to color hours red/green against their target
    pub use_color: bool,
}

impl TableFormatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn hours_cell(&self, worked: f64, met: bool) -> Cell {
        let cell = Cell::new(&format_hours(worked));
        match (self.use_color, met) {
            (false, _) => cell.style_spec("r"),
            (true, true) => cell.style_spec("rFg"),
            (true, false) => cell.style_spec("rFr"),
        }
    }

    fn status_line(&self, summary: &Summary) -> String {
        let line = format!(
            "Worked {} of {} target hours",
            format_hours(summary.total_worked),
            format_hours(summary.total_target)
        );
        if !self.use_color {
            line
        } else if summary.met_target() {
            line.green().to_string()
        } else {
            line.red().to_string()
        }
    }
}

impl OutputFormatter for TableFormatter {
    fn format_summary(&self, summary: &Summary) -> String {
        let mut output = format!(
            "\n=== {} - {} ===\n",
            summary.start.format("%m/%d/%Y"),
            summary.end.format("%m/%d/%Y")
        );

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> "Date", b -> "Day", b -> "Target", b -> "Worked"]);

        for day in &summary.days {
            table.add_row(Row::new(vec![
                Cell::new(&day.date.format("%Y-%m-%d").to_string()),
                Cell::new(&day.date.format("%A").to_string()),
                Cell::new(&format_hours(day.target)).style_spec("r"),
                self.hours_cell(day.worked, day.met_target()),
            ]));
        }

        table.add_row(Row::new(vec![Cell::new(""); 4]));
        table.add_row(Row::new(vec![
            Cell::new("TOTAL").style_spec("b"),
            Cell::new(""),
            Cell::new(&format_hours(summary.total_target)).style_spec("br"),
            self.hours_cell(summary.total_worked, summary.met_target()),
        ]));
        output.push_str(&table.to_string());

        if !summary.categories.is_empty() {
            let mut categories = Table::new();
            categories.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
            categories.set_titles(row![b -> "Category", b -> "Hours"]);
            for category in &summary.categories {
                categories.add_row(row![category.category, r -> format_hours(category.hours)]);
            }
            output.push('\n');
            output.push_str(&categories.to_string());
        }

        let fitness: Vec<String> = summary
            .fitness
            .entries()
            .iter()
            .map(|(key, count)| format!("{key}: {count}"))
            .collect();
        output.push_str(&format!("\nFitness  {}\n", fitness.join("  ")));
        output.push_str(&self.status_line(summary));
        output.push('\n');
        output
    }
}

/// JSON output for scripts
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_summary(&self, summary: &Summary) -> String {
        serde_json::to_string_pretty(summary)
            .unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

/// Pick a formatter
///
/// Colors are only used for tables, and never when `NO_COLOR` is set.
pub fn get_formatter(json: bool, use_color: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        let use_color = use_color && std::env::var_os("NO_COLOR").is_none();
        Box::new(TableFormatter::new(use_color))
    }
}
