//! In-Memory Dataset Table
//!
//! Rows are kept as string cells exactly as read, so columns this tool does
//! not know about round-trip untouched. Row order and row count are fixed
//! once loaded; only cells in the tool-owned columns are ever rewritten.

use relabel_core::Label;

use crate::models::ColumnNames;
use crate::utils::error::{AppError, AppResult};

/// Text a missing original label reads as.
pub const NULL_LABEL: &str = "nan";

const TRUE_CELL: &str = "True";
const FALSE_CELL: &str = "False";
const PROCESSED_CELL: &str = "1";
const UNPROCESSED_CELL: &str = "0";

/// Resolved column positions, produced by `Dataset::ensure_schema`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    text: usize,
    label: usize,
    new_label: usize,
    changed: usize,
    processed: usize,
    attempts: Option<usize>,
}

/// Ordered table of string cells with a header row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Build a dataset; every row must have exactly one cell per header.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> AppResult<Self> {
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(AppError::dataset(format!(
                "row {} has {} cells, expected {}",
                idx,
                row.len(),
                headers.len()
            )));
        }
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell by row index and column name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| r[col].as_str())
    }

    /// Resolve tool columns, appending any that are missing.
    ///
    /// Appended columns get their defaults (empty new label, `False`, `0`,
    /// and `0` attempts when `track_attempts` is set). Existing cells are
    /// never rewritten. The text and label columns must already exist.
    pub fn ensure_schema(
        &mut self,
        names: &ColumnNames,
        track_attempts: bool,
    ) -> AppResult<Schema> {
        let text = self
            .column_index(&names.text)
            .ok_or_else(|| AppError::dataset(format!("missing column: {}", names.text)))?;
        let label = self
            .column_index(&names.label)
            .ok_or_else(|| AppError::dataset(format!("missing column: {}", names.label)))?;

        let new_label = self.ensure_column(&names.new_label, "");
        let changed = self.ensure_column(&names.changed, FALSE_CELL);
        let processed = self.ensure_column(&names.processed, UNPROCESSED_CELL);
        let attempts = track_attempts.then(|| self.ensure_column(&names.attempts, "0"));

        Ok(Schema {
            text,
            label,
            new_label,
            changed,
            processed,
            attempts,
        })
    }

    fn ensure_column(&mut self, name: &str, default: &str) -> usize {
        if let Some(idx) = self.column_index(name) {
            return idx;
        }
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(default.to_string());
        }
        self.headers.len() - 1
    }

    /// Read-only view of one record.
    pub fn record<'a>(&'a self, idx: usize, schema: &'a Schema) -> Record<'a> {
        Record {
            cells: &self.rows[idx],
            schema,
        }
    }

    pub fn records<'a>(&'a self, schema: &'a Schema) -> impl Iterator<Item = Record<'a>> + 'a {
        self.rows.iter().map(move |cells| Record { cells, schema })
    }

    /// Store a label on a record and mark it processed.
    ///
    /// Returns the computed changed flag: case-insensitive inequality with the
    /// record's original label.
    pub fn mark_classified(&mut self, idx: usize, schema: &Schema, label: &Label) -> bool {
        let changed = label.differs_from(&self.record(idx, schema).original_label());
        let row = &mut self.rows[idx];
        row[schema.new_label] = label.as_str().to_string();
        row[schema.changed] = if changed { TRUE_CELL } else { FALSE_CELL }.to_string();
        row[schema.processed] = PROCESSED_CELL.to_string();
        changed
    }

    /// Count an Unknown outcome for a record. Returns the new attempt count,
    /// or `None` when attempts are not tracked.
    pub fn record_failed_attempt(&mut self, idx: usize, schema: &Schema) -> Option<u32> {
        let col = schema.attempts?;
        let next = self.record(idx, schema).attempts().unwrap_or(0).saturating_add(1);
        self.rows[idx][col] = next.to_string();
        Some(next)
    }
}

/// Borrowed view of one row through a `Schema`.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    cells: &'a [String],
    schema: &'a Schema,
}

impl<'a> Record<'a> {
    pub fn text(&self) -> &'a str {
        &self.cells[self.schema.text]
    }

    /// Lower-cased prior label; an empty cell reads as `"nan"`.
    pub fn original_label(&self) -> String {
        let raw = &self.cells[self.schema.label];
        if raw.trim().is_empty() {
            NULL_LABEL.to_string()
        } else {
            raw.to_lowercase()
        }
    }

    /// Stored new label, if any.
    pub fn new_label(&self) -> Option<&'a str> {
        let cell = self.cells[self.schema.new_label].as_str();
        (!cell.trim().is_empty()).then_some(cell)
    }

    pub fn is_changed(&self) -> bool {
        parse_flag(&self.cells[self.schema.changed])
    }

    pub fn is_processed(&self) -> bool {
        parse_flag(&self.cells[self.schema.processed])
    }

    /// Failed-attempt count; `None` when attempts are not tracked.
    pub fn attempts(&self) -> Option<u32> {
        let col = self.schema.attempts?;
        Some(parse_count(&self.cells[col]))
    }
}

/// `1`, `1.0` and `true` (any case) are set; anything else is unset.
fn parse_flag(cell: &str) -> bool {
    matches!(cell.trim().to_lowercase().as_str(), "1" | "1.0" | "true")
}

/// Non-negative integer cell; float spellings like `2.0` are accepted and
/// anything unparseable counts as zero.
fn parse_count(cell: &str) -> u32 {
    let cell = cell.trim();
    cell.parse::<u32>()
        .ok()
        .or_else(|| {
            cell.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v as u32)
        })
        .unwrap_or(0)
}
