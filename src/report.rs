//! Report assembly
//!
//! [`ReportAssembler`] turns the tagged events of a date range into an
//! ordered list of [`ContentBlock`]s: front matter, a header, the fitness
//! summary, the work summary, and one section per day. Blocks carry no
//! formatting beyond text, so any [`DocumentSink`](crate::markdown::DocumentSink)
//! can render them.
//!
//! # Examples
//!
//! ```
//! use calreport::report::{ContentBlock, ReportAssembler};
//! use calreport_core::types::{DateRange, TargetPolicy};
//! use chrono::NaiveDate;
//!
//! let day = NaiveDate::from_ymd_opt(2024, 1, 14).unwrap();
//! let assembler = ReportAssembler::new(TargetPolicy::default());
//! let report = assembler.assemble(&[], &DateRange::single(day), day.and_hms_opt(18, 0, 0).unwrap());
//!
//! assert!(matches!(report.blocks[0], ContentBlock::FrontMatter { .. }));
//! assert_eq!(report.file_name(), "2024-01-14 Daily Report.md");
//! ```

use crate::aggregation::{Aggregator, DayBucket, FitnessRollup, WorkRollup};
use crate::classifier::TagClassifier;
use crate::fetch::get_events;
use crate::markdown::{MarkdownWriter, emit};
use calreport_core::error::Result;
use calreport_core::provider::EventSource;
use calreport_core::types::{DateRange, TaggedEvent, TargetPolicy};
use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Value of the `type` front-matter key
pub const REPORT_KIND: &str = "report";

/// Fixed navigation text placed under the front matter
const HEADER_TAGS: &str = "Tags: #progress-report";
const GOALS_LINK: &str = "[[____reports (goals)]]";

/// A renderer-agnostic unit of report output
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    /// Document preamble
    FrontMatter { kind: String, date: NaiveDate },
    /// Section heading
    Heading { level: u8, text: String },
    /// One line of free text; may be empty
    Text(String),
    /// Table with a header row
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// Instruction for a chart plugin to plot the preceding table
    Chart(ChartSpec),
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn blank() -> Self {
        Self::Text(String::new())
    }

    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::Heading {
            level,
            text: text.into(),
        }
    }

    pub fn table(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self::Table { headers, rows }
    }
}

/// A chart directive
///
/// Rendered as a fenced `chart` block whose `id` refers to the block anchor
/// of the table it plots.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    kind: String,
    id: String,
    options: Vec<(String, String)>,
}

impl ChartSpec {
    /// A bar chart plotting the table anchored at `id`
    pub fn bar(id: impl Into<String>) -> Self {
        Self {
            kind: "bar".to_string(),
            id: id.into(),
            options: Vec::new(),
        }
    }

    /// Add a `key: value` option line
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push((key.into(), value.into()));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn render(&self) -> String {
        let mut out = format!("\n```chart\ntype: {}\nid: {}\n", self.kind, self.id);
        for (key, value) in &self.options {
            out.push_str(&format!("{key}: {value}\n"));
        }
        out.push_str("```");
        out
    }
}

/// Horizontal bar chart used for single-row and per-day tables
fn row_chart(id: &str, width: &str, x_max: u32) -> ChartSpec {
    ChartSpec::bar(id)
        .option("layout", "rows")
        .option("width", width)
        .option("beginAtZero", "true")
        .option("indexAxis", "y")
        .option("xMax", x_max.to_string())
}

/// Horizontal bar chart for the work totals, coloured per label
fn totals_chart(id: &str) -> ChartSpec {
    row_chart(id, "90%", 50)
        .option("legend", "false")
        .option("labelColors", "true")
}

/// Format hours for display
pub fn format_hours(hours: f64) -> String {
    format!("{hours:.2}")
}

/// Labels and anchors for the days of a report
///
/// Weekday names are unique within a week; longer ranges fall back to
/// date-qualified labels.
#[derive(Debug, Clone, Copy)]
pub struct DayLabels {
    long_range: bool,
}

impl DayLabels {
    pub fn for_range(range: &DateRange) -> Self {
        Self {
            long_range: range.num_days() > 7,
        }
    }

    /// Column header for a day
    pub fn column(&self, date: NaiveDate) -> String {
        if self.long_range {
            date.format("%a %Y-%m-%d").to_string()
        } else {
            date.format("%A").to_string()
        }
    }

    /// Block anchor / chart id for a day
    pub fn anchor(&self, date: NaiveDate) -> String {
        if self.long_range {
            date.format("%Y-%m-%d").to_string()
        } else {
            date.format("%A").to_string()
        }
    }
}

/// Whether a report covers one day or several
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Daily,
    Weekly,
}

impl ReportKind {
    pub fn for_range(range: &DateRange) -> Self {
        if range.num_days() == 1 {
            ReportKind::Daily
        } else {
            ReportKind::Weekly
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportKind::Daily => "Daily Report",
            ReportKind::Weekly => "Weekly Report",
        }
    }
}

/// An assembled report, ready to be written
#[derive(Debug, Clone)]
pub struct Report {
    pub range: DateRange,
    pub kind: ReportKind,
    pub blocks: Vec<ContentBlock>,
}

impl Report {
    /// File name the report is saved under, e.g. `2024-01-07 Weekly Report.md`
    pub fn file_name(&self) -> String {
        format!(
            "{} {}.md",
            self.range.start().format("%Y-%m-%d"),
            self.kind.label()
        )
    }

    /// Write the report as Markdown into `dir`, returning the file path
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name());
        let mut writer = MarkdownWriter::create(&path)?;
        emit(&self.blocks, &mut writer)?;
        info!("Wrote {} blocks to {}", self.blocks.len(), path.display());
        Ok(path)
    }
}

/// Builds report blocks from tagged events
#[derive(Debug, Clone, Default)]
pub struct ReportAssembler {
    targets: TargetPolicy,
}

impl ReportAssembler {
    pub fn new(targets: TargetPolicy) -> Self {
        Self { targets }
    }

    pub fn targets(&self) -> &TargetPolicy {
        &self.targets
    }

    /// Assemble the full block sequence for `range`
    ///
    /// `generated_at` is the local wall-clock time printed in the header.
    pub fn assemble(
        &self,
        events: &[TaggedEvent],
        range: &DateRange,
        generated_at: NaiveDateTime,
    ) -> Report {
        let aggregator = Aggregator::new(range);
        let work = aggregator.extract_work_rollup(events);
        let fitness = Aggregator::extract_fitness_rollup(events);
        let buckets = aggregator.bucket_by_day(events);
        let labels = DayLabels::for_range(range);
        let kind = ReportKind::for_range(range);

        let mut blocks = Vec::new();
        self.push_header(&mut blocks, range, kind, generated_at);
        self.push_fitness(&mut blocks, &fitness);
        self.push_work(&mut blocks, &work, range, labels);
        for bucket in &buckets {
            self.push_day(&mut blocks, bucket, &work, labels);
        }

        debug!("Assembled {} blocks for {}", blocks.len(), range);
        Report {
            range: *range,
            kind,
            blocks,
        }
    }

    fn push_header(
        &self,
        blocks: &mut Vec<ContentBlock>,
        range: &DateRange,
        kind: ReportKind,
        generated_at: NaiveDateTime,
    ) {
        blocks.push(ContentBlock::FrontMatter {
            kind: REPORT_KIND.to_string(),
            date: range.start(),
        });
        blocks.push(ContentBlock::text(HEADER_TAGS));
        blocks.push(ContentBlock::blank());
        blocks.push(ContentBlock::text(GOALS_LINK));
        blocks.push(ContentBlock::blank());
        blocks.push(ContentBlock::text(format!(
            "**{}**",
            generated_at.format("%B %d at %I:%M%p")
        )));

        let title = match kind {
            ReportKind::Weekly => format!(
                "Week of {} - {}",
                range.start().format("%m/%d/%Y"),
                range.end().format("%m/%d/%Y")
            ),
            ReportKind::Daily => format!("Day of {}", range.start().format("%m/%d/%Y")),
        };
        blocks.push(ContentBlock::heading(1, title));
    }

    fn push_fitness(&self, blocks: &mut Vec<ContentBlock>, fitness: &FitnessRollup) {
        blocks.push(ContentBlock::heading(4, "Fitness"));

        let mut headers = vec![" ".to_string()];
        let mut row = vec!["Total".to_string()];
        for (key, count) in fitness.entries() {
            headers.push(key.to_string());
            row.push(count.to_string());
        }

        blocks.push(ContentBlock::table(headers, vec![row]));
        blocks.push(ContentBlock::text("^fitness-total"));
        blocks.push(ContentBlock::Chart(row_chart("fitness-total", "80%", 6)));
    }

    fn push_work(
        &self,
        blocks: &mut Vec<ContentBlock>,
        work: &WorkRollup,
        range: &DateRange,
        labels: DayLabels,
    ) {
        blocks.push(ContentBlock::heading(4, "Work"));

        // Total hours against the range target
        blocks.push(ContentBlock::table(
            vec![
                " ".to_string(),
                "Hours Worked".to_string(),
                "Hours Target".to_string(),
            ],
            vec![vec![
                "Total".to_string(),
                format_hours(work.grand_total()),
                format_hours(self.targets.total_for(range)),
            ]],
        ));
        blocks.push(ContentBlock::text("^work-total"));
        blocks.push(ContentBlock::Chart(totals_chart("work-total")));

        // Range total per category
        let totals = work.category_totals();
        let mut headers = vec![" ".to_string()];
        headers.extend(totals.iter().map(|(category, _)| category.to_string()));
        let rows = if totals.is_empty() {
            Vec::new()
        } else {
            let mut row = vec!["Total".to_string()];
            row.extend(totals.iter().map(|(_, hours)| format_hours(*hours)));
            vec![row]
        };
        blocks.push(ContentBlock::table(headers, rows));
        blocks.push(ContentBlock::text("^work-categories"));
        blocks.push(ContentBlock::Chart(totals_chart("work-categories")));

        // Hours per category per day
        blocks.push(ContentBlock::blank());
        let mut headers = vec![" ".to_string()];
        headers.extend(work.days().iter().map(|d| labels.column(*d)));
        let rows = work
            .rows()
            .map(|(category, hours)| {
                let mut row = vec![category.to_string()];
                row.extend(hours.iter().map(|h| format_hours(*h)));
                row
            })
            .collect();
        blocks.push(ContentBlock::table(headers, rows));
        blocks.push(ContentBlock::text("^work-daily"));
        blocks.push(ContentBlock::Chart(
            ChartSpec::bar("work-daily")
                .option("layout", "rows")
                .option("width", "80%")
                .option("beginAtZero", "true")
                .option("yMax", "12"),
        ));
    }

    fn push_day(
        &self,
        blocks: &mut Vec<ContentBlock>,
        bucket: &DayBucket<'_>,
        work: &WorkRollup,
        labels: DayLabels,
    ) {
        let date = bucket.date;
        blocks.push(ContentBlock::heading(2, date.format("%A - %m/%d/%Y").to_string()));
        blocks.push(ContentBlock::blank());

        let target = self.targets.target_for(date);
        let worked = work.daily_total(date);
        let color = if worked < target { "red" } else { "green" };

        blocks.push(ContentBlock::text(format!("**Target hours**: {target}")));
        blocks.push(ContentBlock::text(format!(
            "**Hours worked**: <span style=\"color: {color};\">{}</span>",
            format_hours(worked)
        )));
        blocks.push(ContentBlock::blank());

        let event_rows = bucket
            .events
            .iter()
            .map(|event| {
                vec![
                    event.summary.clone(),
                    format!(
                        "{} - {}",
                        event.start.format("%H:%M"),
                        event.end.format("%H:%M")
                    ),
                    format_hours(event.hours()),
                ]
            })
            .collect();
        blocks.push(ContentBlock::table(
            vec!["Event".to_string(), "Time".to_string(), "Hours".to_string()],
            event_rows,
        ));
        blocks.push(ContentBlock::blank());

        let category_rows = work
            .categories()
            .iter()
            .map(|category| {
                vec![
                    category.clone(),
                    format_hours(work.hours(category, date).unwrap_or(0.0)),
                ]
            })
            .collect();
        blocks.push(ContentBlock::table(
            vec![" ".to_string(), "Hours".to_string()],
            category_rows,
        ));

        let anchor = labels.anchor(date);
        blocks.push(ContentBlock::text(format!("^{anchor}")));
        blocks.push(ContentBlock::Chart(row_chart(&anchor, "80%", 10)));
    }
}

/// Fetch, classify and assemble the report for one range
pub async fn generate_report<S: EventSource + ?Sized>(
    source: &S,
    classifier: &TagClassifier,
    assembler: &ReportAssembler,
    range: &DateRange,
    tz: &Tz,
    generated_at: NaiveDateTime,
) -> Result<Report> {
    let events = get_events(source, range, tz, classifier).await?;
    Ok(assembler.assemble(&events, range, generated_at))
}
