//! Document sink and its Markdown implementation
//!
//! The report assembler produces renderer-agnostic [`ContentBlock`]s; a
//! [`DocumentSink`] turns them into an actual document. [`MarkdownWriter`]
//! writes Obsidian-flavoured Markdown: YAML front matter, `|`-delimited
//! tables, and fenced `chart` blocks.

use crate::report::ContentBlock;
use calreport_core::error::Result;
use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// A destination for report blocks
pub trait DocumentSink {
    /// Write one line of free text
    fn text(&mut self, text: &str) -> Result<()>;

    /// Write a heading of the given level (1-6)
    fn heading(&mut self, level: u8, text: &str) -> Result<()>;

    /// Write a table; every row should have as many cells as there are headers
    fn table(&mut self, headers: &[String], rows: &[Vec<String>]) -> Result<()>;

    /// Write the document preamble
    fn front_matter(&mut self, kind: &str, date: NaiveDate) -> Result<()>;

    /// Flush everything written so far
    fn close(&mut self) -> Result<()>;
}

/// Send every block to `sink`, in order, then close it
pub fn emit(blocks: &[ContentBlock], sink: &mut dyn DocumentSink) -> Result<()> {
    for block in blocks {
        match block {
            ContentBlock::FrontMatter { kind, date } => sink.front_matter(kind, *date)?,
            ContentBlock::Heading { level, text } => sink.heading(*level, text)?,
            ContentBlock::Text(text) => sink.text(text)?,
            ContentBlock::Table { headers, rows } => sink.table(headers, rows)?,
            ContentBlock::Chart(chart) => sink.text(&chart.render())?,
        }
    }
    sink.close()
}

/// Markdown serializer over any writer
pub struct MarkdownWriter<W: Write> {
    out: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Give back the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn row(&mut self, cells: &[String]) -> Result<()> {
        let cells: Vec<String> = cells.iter().map(|cell| escape_cell(cell)).collect();
        writeln!(self.out, "|{}|", cells.join("|"))?;
        Ok(())
    }
}

/// Keep a cell on one line and inside its column
fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace(['\r', '\n'], " ")
}

impl MarkdownWriter<BufWriter<File>> {
    /// Create (or truncate) a Markdown file
    ///
    /// The file is closed when the writer is dropped, whether or not
    /// [`DocumentSink::close`] was reached.
    pub fn create(path: &Path) -> Result<Self> {
        debug!("Opening {}", path.display());
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> DocumentSink for MarkdownWriter<W> {
    fn text(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}")?;
        Ok(())
    }

    fn heading(&mut self, level: u8, text: &str) -> Result<()> {
        let hashes = "#".repeat(level.clamp(1, 6) as usize);
        writeln!(self.out, "{hashes} {text}")?;
        Ok(())
    }

    fn table(&mut self, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
        self.row(headers)?;
        self.row(&vec!["---".to_string(); headers.len()])?;
        for row in rows {
            self.row(row)?;
        }
        Ok(())
    }

    fn front_matter(&mut self, kind: &str, date: NaiveDate) -> Result<()> {
        writeln!(self.out, "---")?;
        writeln!(self.out, "type: {kind}")?;
        writeln!(self.out, "date: {}", date.format("%Y-%m-%d"))?;
        writeln!(self.out, "---")?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
