//! Rendering of delete outcomes and listings.

use std::io::{self, IsTerminal, Write};

use chrono::{DateTime, SecondsFormat, Utc};
use console::{StyledObject, measure_text_width, style};

use crate::listing::SEPARATOR;
use crate::maintenance::{DeleteOutcome, PathEntry};

pub const NO_DATASETS_NOTICE: &str = "Could not find any datasets to delete.";
pub const DRY_RUN_NOTICE: &str = "The dry-run flag was set. NO FILES WERE DELETED.";

const MIN_CELL_WIDTH: usize = 15;
const CELL_PADDING: usize = 2;
const MAX_COLUMNS: usize = 5;

fn pluralize(word: &str, n: usize) -> String {
    if n > 1 {
        format!("{word}s")
    } else {
        word.to_string()
    }
}

fn format_timestamp(timestamp: &DateTime<Utc>, seconds: SecondsFormat) -> String {
    timestamp.to_rfc3339_opts(seconds, true)
}

/// Render the outcome of one delete call.
///
/// With `debug` every version and deleted file is listed before the summary
/// line, followed by file count and total size. With `dry_run` a notice that
/// nothing was deleted follows the summary line.
pub fn write_delete_outcome(
    out: &mut dyn Write,
    outcome: &DeleteOutcome,
    debug: bool,
    dry_run: bool,
) -> io::Result<()> {
    if debug {
        for version in &outcome.versions {
            writeln!(
                out,
                "Version: {}",
                format_timestamp(&version.timestamp, SecondsFormat::AutoSi)
            )?;
            for file in &version.deleted_files {
                writeln!(out, "\t{}", file.uri)?;
            }
        }
        writeln!(out)?;
        writeln!(out, "number of deleted files: {}", outcome.file_count())?;
        writeln!(out, "total size of deleted files: {}", outcome.total_size)?;
    }

    let versions = outcome.version_count();
    writeln!(
        out,
        "Dataset {} ({} {}) successfully deleted",
        outcome.dataset_path,
        versions,
        pluralize("version", versions)
    )?;

    if dry_run {
        writeln!(out, "{DRY_RUN_NOTICE}")?;
    }
    Ok(())
}

/// How a listing is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    /// One path per line, for pipes and redirects.
    Plain,
    /// Folders then datasets in columns.
    Tabular,
    /// One entry per row with metadata columns.
    Long,
}

impl ListFormat {
    /// Pick a layout from whether stdout is an interactive terminal.
    pub fn detect(long: bool) -> Self {
        Self::select(io::stdout().is_terminal(), long)
    }

    pub fn select(terminal: bool, long: bool) -> Self {
        match (terminal, long) {
            (false, _) => ListFormat::Plain,
            (true, false) => ListFormat::Tabular,
            (true, true) => ListFormat::Long,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ListFormat::Plain)
    }
}

pub fn write_listing(
    out: &mut dyn Write,
    listing: &[PathEntry],
    format: ListFormat,
    styled: bool,
) -> io::Result<()> {
    match format {
        ListFormat::Plain => write_plain(out, listing),
        ListFormat::Tabular => write_tabular(out, listing, styled),
        ListFormat::Long => write_long(out, listing, styled),
    }
}

fn write_plain(out: &mut dyn Write, listing: &[PathEntry]) -> io::Result<()> {
    for entry in listing {
        writeln!(out, "{}", entry.path)?;
    }
    Ok(())
}

/// A table cell: the visible text and how to style it.
struct Cell {
    text: String,
    folder: bool,
    bold: bool,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            folder: false,
            bold: false,
        }
    }

    fn name(entry: &PathEntry) -> Self {
        let folder = entry.is_folder();
        let text = if folder {
            entry.path.trim_end_matches(SEPARATOR).to_string()
        } else {
            entry.path.clone()
        };
        Self {
            text,
            folder,
            bold: false,
        }
    }

    fn header(text: &str) -> Self {
        Self {
            text: text.to_string(),
            folder: false,
            bold: true,
        }
    }

    fn width(&self) -> usize {
        measure_text_width(&self.text) + usize::from(self.folder)
    }

    fn render(&self, styled: bool) -> String {
        let body = if !styled {
            self.text.clone()
        } else if self.folder {
            force(style(self.text.as_str()).blue().bold()).to_string()
        } else if self.bold {
            force(style(self.text.as_str()).bold()).to_string()
        } else {
            self.text.clone()
        };
        if self.folder {
            format!("{body}{SEPARATOR}")
        } else {
            body
        }
    }

    fn render_padded(&self, width: usize, styled: bool) -> String {
        let pad = width.saturating_sub(self.width());
        format!("{}{}", self.render(styled), " ".repeat(pad))
    }
}

fn force<D>(styled: StyledObject<D>) -> StyledObject<D> {
    styled.force_styling(true)
}

fn cell_width(cells: impl Iterator<Item = usize>) -> usize {
    cells
        .map(|w| w + CELL_PADDING)
        .max()
        .unwrap_or(0)
        .max(MIN_CELL_WIDTH)
}

fn write_row(out: &mut dyn Write, row: &[Cell], widths: &[usize], styled: bool) -> io::Result<()> {
    let mut line = String::new();
    for (idx, cell) in row.iter().enumerate() {
        if idx + 1 == row.len() {
            line.push_str(&cell.render(styled));
        } else {
            line.push_str(&cell.render_padded(widths[idx], styled));
        }
    }
    writeln!(out, "{line}")
}

fn write_tabular(out: &mut dyn Write, listing: &[PathEntry], styled: bool) -> io::Result<()> {
    let cells: Vec<Cell> = listing
        .iter()
        .filter(|e| e.is_folder())
        .chain(listing.iter().filter(|e| e.is_dataset()))
        .map(Cell::name)
        .collect();
    if cells.is_empty() {
        return Ok(());
    }

    let width = cell_width(cells.iter().map(Cell::width));
    let widths = [width; MAX_COLUMNS];
    for row in cells.chunks(MAX_COLUMNS) {
        write_row(out, row, &widths, styled)?;
    }
    Ok(())
}

fn write_long(out: &mut dyn Write, listing: &[PathEntry], styled: bool) -> io::Result<()> {
    let mut rows = vec![
        ["Name", "Author", "Created", "Type", "Valuation", "State"].map(Cell::header),
    ];
    for entry in listing {
        let created = entry
            .created_at
            .as_ref()
            .map(|t| format_timestamp(t, SecondsFormat::Secs))
            .unwrap_or_default();
        rows.push([
            Cell::name(entry),
            Cell::plain(entry.created_by.as_str()),
            Cell::plain(created),
            Cell::plain(entry.dataset_type.as_str()),
            Cell::plain(entry.valuation.as_str()),
            Cell::plain(entry.state.as_str()),
        ]);
    }

    let widths: Vec<usize> = (0..6)
        .map(|col| cell_width(rows.iter().map(|row| row[col].width())))
        .collect();
    for row in &rows {
        write_row(out, row, &widths, styled)?;
    }
    Ok(())
}
