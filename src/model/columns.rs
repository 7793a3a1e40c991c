//! Column layout for the measurement grid
//!
//! Editable grid columns form a fixed ordered key sequence
//! (`spec, s1, s2, ..., sN`). Selection rectangles, Enter navigation and
//! paste offsets are all computed against indices into that sequence.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Largest sample count any form variant uses
pub const MAX_SAMPLES: usize = 6;

/// Identifies one editable column of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ColumnKey {
    /// Target / standard value
    Spec,
    /// 1-based sample column (`s1` is `Sample(1)`)
    Sample(u8),
}

impl ColumnKey {
    /// Zero-based index into a row's sample list
    pub fn sample_index(self) -> Option<usize> {
        match self {
            ColumnKey::Spec => None,
            ColumnKey::Sample(n) => (n as usize).checked_sub(1),
        }
    }

    /// Upper-case label used in prompts and rendered headers
    pub fn label(self) -> String {
        self.to_string().to_uppercase()
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKey::Spec => write!(f, "spec"),
            ColumnKey::Sample(n) => write!(f, "s{}", n),
        }
    }
}

/// Error for column names that are not part of any grid layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnKeyError {
    pub input: String,
}

impl fmt::Display for ColumnKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown grid column '{}'", self.input)
    }
}

impl std::error::Error for ColumnKeyError {}

impl FromStr for ColumnKey {
    type Err = ColumnKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "spec" | "std" => return Ok(ColumnKey::Spec),
            _ => {}
        }

        normalized
            .strip_prefix('s')
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (1..=MAX_SAMPLES as u8).contains(n))
            .map(ColumnKey::Sample)
            .ok_or_else(|| ColumnKeyError {
                input: s.to_string(),
            })
    }
}

impl TryFrom<String> for ColumnKey {
    type Error = ColumnKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ColumnKey> for String {
    fn from(key: ColumnKey) -> Self {
        key.to_string()
    }
}

/// A single grid cell: row index plus column key
///
/// Written as `column:row` with a 1-based row (`s2:1` is the first row of
/// sample 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellRef {
    pub row: usize,
    pub column: ColumnKey,
}

impl CellRef {
    pub fn new(row: usize, column: ColumnKey) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.column, self.row + 1)
    }
}

/// Error for cell addresses that are not `column:row`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRefError {
    pub input: String,
    pub reason: String,
}

impl fmt::Display for CellRefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid cell '{}': {}", self.input, self.reason)
    }
}

impl std::error::Error for CellRefError {}

impl FromStr for CellRef {
    type Err = CellRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = |reason: String| CellRefError {
            input: s.to_string(),
            reason,
        };
        let (column, row) = s
            .split_once(':')
            .ok_or_else(|| error("expected column:row, e.g. s1:1".to_string()))?;
        let column: ColumnKey = column.parse().map_err(|e: ColumnKeyError| error(e.to_string()))?;
        let row: usize = row
            .trim()
            .parse()
            .map_err(|_| error(format!("row '{}' is not a number", row.trim())))?;
        if row == 0 {
            return Err(error("rows are numbered from 1".to_string()));
        }
        Ok(CellRef::new(row - 1, column))
    }
}

impl TryFrom<String> for CellRef {
    type Error = CellRefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CellRef> for String {
    fn from(cell: CellRef) -> Self {
        cell.to_string()
    }
}

/// Which host form the grid is embedded in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormVariant {
    /// Sample evaluation: three samples, spec typed by the inspector
    #[default]
    SampleEvaluation,
    /// Final inspection: five samples, spec taken from the template
    FinalInspection,
    /// Final inspection organised by garment size: six samples per size
    FinalInspectionBySize,
}

impl FormVariant {
    pub fn sample_count(self) -> usize {
        match self {
            FormVariant::SampleEvaluation => 3,
            FormVariant::FinalInspection => 5,
            FormVariant::FinalInspectionBySize => 6,
        }
    }

    pub fn spec_editable(self) -> bool {
        matches!(self, FormVariant::SampleEvaluation)
    }

    pub fn grouped_by_size(self) -> bool {
        matches!(self, FormVariant::FinalInspectionBySize)
    }

    /// Name of the spec field in the submission payload
    pub fn spec_field(self) -> &'static str {
        match self {
            FormVariant::SampleEvaluation => "std",
            FormVariant::FinalInspection | FormVariant::FinalInspectionBySize => "spec",
        }
    }

    pub fn layout(self) -> ColumnLayout {
        ColumnLayout::new(self.sample_count(), self.spec_editable())
    }
}

/// Fixed ordered sequence of editable column keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    keys: Vec<ColumnKey>,
}

impl ColumnLayout {
    /// Build a layout with `sample_count` sample columns (clamped to 1..=6),
    /// preceded by `spec` when it is editable
    pub fn new(sample_count: usize, spec_editable: bool) -> Self {
        let sample_count = sample_count.clamp(1, MAX_SAMPLES);
        let mut keys = Vec::with_capacity(sample_count + 1);
        if spec_editable {
            keys.push(ColumnKey::Spec);
        }
        keys.extend((1..=sample_count as u8).map(ColumnKey::Sample));
        Self { keys }
    }

    pub fn keys(&self) -> &[ColumnKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn index_of(&self, key: ColumnKey) -> Option<usize> {
        self.keys.iter().position(|k| *k == key)
    }

    pub fn key_at(&self, index: usize) -> Option<ColumnKey> {
        self.keys.get(index).copied()
    }

    pub fn contains(&self, key: ColumnKey) -> bool {
        self.index_of(key).is_some()
    }

    pub fn sample_count(&self) -> usize {
        self.keys
            .iter()
            .filter(|k| matches!(k, ColumnKey::Sample(_)))
            .count()
    }
}
