//! Paste-matrix import
//!
//! Clipboard text copied from a spreadsheet arrives as tab-separated lines.
//! When a paste looks like such a block it is intercepted and spread over
//! the grid starting at the focused cell instead of landing as literal text
//! in one input. Values are kept as trimmed strings; nothing is coerced
//! until submission.

use std::collections::HashSet;
use std::io::Cursor;

use crate::model::columns::{CellRef, ColumnLayout};
use crate::model::row::parse_number;

/// Column captions recognised in a header line (compared lower-case)
pub const DEFAULT_HEADER_LABELS: &[&str] = &[
    "pom", "pom name", "name", "description", "std", "spec", "tol", "tolerance", "s1", "s2", "s3",
    "s4", "s5", "s6", "sample 1", "sample 2", "sample 3", "sample 4", "sample 5", "sample 6",
];

/// Header captions that mark the first column as row labels
const NAME_LABELS: &[&str] = &["pom", "pom name", "name", "description"];

/// True when clipboard text should be spread across cells: more than one
/// non-blank line, or a first line with more than one tab-separated field
pub fn is_matrix_paste(text: &str) -> bool {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let Some(first) = lines.next() else {
        return false;
    };
    lines.next().is_some() || first.split('\t').count() > 1
}

/// Parsed clipboard block, header already removed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PasteMatrix {
    pub rows: Vec<Vec<String>>,
    pub header: Option<Vec<String>>,
}

impl PasteMatrix {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parses clipboard text into a [`PasteMatrix`]
#[derive(Debug, Clone)]
pub struct PasteImporter {
    labels: HashSet<String>,
}

impl Default for PasteImporter {
    fn default() -> Self {
        Self {
            labels: DEFAULT_HEADER_LABELS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl PasteImporter {
    /// Importer that also treats `extra` captions as header labels
    pub fn with_extra_labels<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut importer = Self::default();
        importer.labels.extend(
            extra
                .into_iter()
                .map(|s| normalize_label(s.as_ref()))
                .filter(|s| !s.is_empty()),
        );
        importer
    }

    /// Parse a matrix paste; `None` when the text is not one
    pub fn parse(&self, text: &str) -> Option<PasteMatrix> {
        if !is_matrix_paste(text) {
            return None;
        }

        let mut records = read_records(text);
        if records.is_empty() {
            return None;
        }

        let header = if self.is_header(&records[0]) {
            Some(records.remove(0))
        } else {
            None
        };

        // A blank corner caption also marks the first column as row labels
        let name_column = header
            .as_ref()
            .and_then(|h| h.first())
            .map(|first| {
                first.is_empty() || NAME_LABELS.contains(&normalize_label(first).as_str())
            })
            .unwrap_or(false);

        let rows = records
            .into_iter()
            .map(|mut fields| {
                if name_column {
                    fields.remove(0);
                } else if let Some(first) = fields.first_mut() {
                    *first = strip_glued_label(first);
                }
                fields
            })
            .collect();

        Some(PasteMatrix { rows, header })
    }

    /// A header names at least one known column and holds no numbers;
    /// unknown captions next to known ones are allowed
    fn is_header(&self, fields: &[String]) -> bool {
        let non_blank = || fields.iter().filter(|f| !f.is_empty());
        non_blank().any(|f| self.labels.contains(&normalize_label(f)))
            && non_blank().all(|f| parse_number(f).is_none())
    }
}

/// Split on newlines and tabs; fields trimmed, blank lines dropped
fn read_records(text: &str) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(Cursor::new(text.as_bytes()));

    let mut rows = Vec::new();
    for (line, result) in reader.records().enumerate() {
        match result {
            Ok(record) => {
                let fields: Vec<String> = record.iter().map(|f| f.trim().to_string()).collect();
                if fields.iter().any(|f| !f.is_empty()) {
                    rows.push(fields);
                }
            }
            Err(e) => {
                tracing::debug!(target: "paste", line = line + 1, "skipping unreadable line: {}", e);
            }
        }
    }
    rows
}

fn normalize_label(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// `"A 1.0"` → `"1.0"`: a row label glued to the first value is dropped
fn strip_glued_label(field: &str) -> String {
    let tokens: Vec<&str> = field.split_whitespace().collect();
    if let [first, .., last] = tokens.as_slice() {
        if parse_number(first).is_none() && parse_number(last).is_some() {
            return last.to_string();
        }
    }
    field.to_string()
}

/// The writes a paste will perform, clipped to the grid
#[derive(Debug, Clone, PartialEq)]
pub struct PastePlan {
    pub origin: CellRef,
    /// Data lines in the clipboard (after the header)
    pub data_rows: usize,
    /// Rows that receive at least one value
    pub rows_affected: usize,
    pub writes: Vec<(CellRef, String)>,
    pub header_skipped: bool,
}

impl PastePlan {
    /// Map the matrix onto the grid from `origin`; cells past the last
    /// column or row are dropped, rows are never created
    pub fn build(
        matrix: &PasteMatrix,
        layout: &ColumnLayout,
        row_count: usize,
        origin: CellRef,
    ) -> Self {
        let data_rows = matrix.row_count();
        let mut plan = Self {
            origin,
            data_rows,
            rows_affected: 0,
            writes: Vec::new(),
            header_skipped: matrix.header.is_some(),
        };

        let Some(start_col) = layout.index_of(origin.column) else {
            return plan;
        };

        plan.rows_affected = data_rows.min(row_count.saturating_sub(origin.row));
        for (offset, fields) in matrix.rows.iter().take(plan.rows_affected).enumerate() {
            let row = origin.row + offset;
            for (col, value) in fields.iter().enumerate() {
                let Some(key) = layout.key_at(start_col + col) else {
                    break;
                };
                plan.writes.push((CellRef::new(row, key), value.clone()));
            }
        }
        plan
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Confirmation text shown before the overwrite
    pub fn prompt(&self) -> String {
        let mut text = format!(
            "Paste {} row(s) starting at column {}, row {}? Existing values will be overwritten.",
            self.data_rows,
            self.origin.column.label(),
            self.origin.row + 1
        );
        if self.rows_affected < self.data_rows {
            text.push_str(&format!(
                " Only {} row(s) fit; the rest will be ignored.",
                self.rows_affected
            ));
        }
        text
    }
}
