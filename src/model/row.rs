//! Measurement row types
//!
//! Sample values are kept as the text the inspector typed so partial input
//! ("1.", "-") survives editing. Each value memoizes its numeric parse,
//! recomputed only when the text changes.

use serde::{Deserialize, Serialize};

use super::columns::ColumnKey;

/// Stable reference from a measurement row to its parent size row
///
/// Assigned when the size row is created and never derived from the size's
/// display name, so renaming or reordering sizes cannot re-parent rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(pub u64);

/// Raw cell text plus its memoized numeric value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SampleValue {
    raw: String,
    number: Option<f64>,
}

impl SampleValue {
    pub fn new(text: impl Into<String>) -> Self {
        let raw = text.into();
        let number = parse_number(&raw);
        Self { raw, number }
    }

    pub fn blank() -> Self {
        Self::default()
    }

    pub fn from_number(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Self::new(v.to_string()),
            _ => Self::blank(),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Parsed value, `None` for blank or non-numeric text
    pub fn number(&self) -> Option<f64> {
        self.number
    }

    pub fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }

    /// Replace the text; returns true if it actually changed
    pub fn set(&mut self, text: &str) -> bool {
        if self.raw == text {
            return false;
        }
        self.raw = text.to_string();
        self.number = parse_number(text);
        true
    }
}

impl PartialEq for SampleValue {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl From<String> for SampleValue {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for SampleValue {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<SampleValue> for String {
    fn from(value: SampleValue) -> Self {
        value.raw
    }
}

/// Parse measurement text; blank, non-numeric and non-finite text yield `None`
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Pass/fail state of a whole row, judged on the mean of its samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowStatus {
    /// No numeric sample yet, or spec/tolerance unusable
    Pending,
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "FAIL")]
    Fail,
}

impl RowStatus {
    /// Status string stored with the measurement record
    pub fn as_record_str(self) -> &'static str {
        match self {
            RowStatus::Fail => "FAIL",
            RowStatus::Ok | RowStatus::Pending => "OK",
        }
    }
}

/// One point-of-measure entry in a chart
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRow {
    pub pom_name: String,
    pub tolerance: Option<f64>,
    pub spec: SampleValue,
    pub samples: Vec<SampleValue>,
    pub group_key: Option<GroupKey>,
}

impl MeasurementRow {
    pub fn new(
        pom_name: impl Into<String>,
        tolerance: Option<f64>,
        spec: Option<f64>,
        sample_count: usize,
    ) -> Self {
        Self {
            pom_name: pom_name.into(),
            tolerance,
            spec: SampleValue::from_number(spec),
            samples: vec![SampleValue::blank(); sample_count],
            group_key: None,
        }
    }

    pub fn cell(&self, column: ColumnKey) -> Option<&SampleValue> {
        match column.sample_index() {
            None => Some(&self.spec),
            Some(i) => self.samples.get(i),
        }
    }

    pub fn cell_mut(&mut self, column: ColumnKey) -> Option<&mut SampleValue> {
        match column.sample_index() {
            None => Some(&mut self.spec),
            Some(i) => self.samples.get_mut(i),
        }
    }

    /// Numeric samples in column order
    pub fn numeric_samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().filter_map(SampleValue::number)
    }

    pub fn has_entries(&self) -> bool {
        self.samples.iter().any(|s| !s.is_blank())
    }

    /// Grow or shrink the sample list to exactly `count` entries
    pub fn resize_samples(&mut self, count: usize) {
        self.samples.resize(count, SampleValue::blank());
    }
}
