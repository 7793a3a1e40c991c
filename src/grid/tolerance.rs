//! Tolerance evaluation
//!
//! Called for every visible cell on every render, so it stays a single
//! parse plus compare. Anything that cannot be judged (blank or
//! non-numeric value, missing spec or tolerance) is reported as in
//! tolerance: unknown never renders as a failure.

use crate::model::row::{parse_number, MeasurementRow, RowStatus, SampleValue};

/// Padding applied to the tolerance so values exactly on the boundary do
/// not flip between pass and fail through float representation noise
pub const DEFAULT_EPSILON: f64 = 1e-4;

/// Out-of-tolerance rule: `|value - spec| > tolerance + epsilon`
///
/// A deviation equal to the tolerance is a pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceRule {
    pub epsilon: f64,
}

impl Default for ToleranceRule {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl ToleranceRule {
    pub fn new(epsilon: f64) -> Self {
        let epsilon = if epsilon.is_finite() && epsilon >= 0.0 {
            epsilon
        } else {
            DEFAULT_EPSILON
        };
        Self { epsilon }
    }

    /// Judge an already-parsed value
    pub fn is_out(&self, value: Option<f64>, spec: Option<f64>, tolerance: Option<f64>) -> bool {
        let (Some(value), Some(spec), Some(tolerance)) = (value, spec, tolerance) else {
            return false;
        };
        if !spec.is_finite() || !tolerance.is_finite() || tolerance < 0.0 {
            return false;
        }
        (value - spec).abs() > tolerance + self.epsilon
    }

    /// Judge raw cell text
    pub fn is_out_text(&self, value: &str, spec: Option<f64>, tolerance: Option<f64>) -> bool {
        self.is_out(parse_number(value), spec, tolerance)
    }

    /// Judge a memoized sample value (no re-parse)
    pub fn is_out_sample(
        &self,
        value: &SampleValue,
        spec: Option<f64>,
        tolerance: Option<f64>,
    ) -> bool {
        self.is_out(value.number(), spec, tolerance)
    }

    /// Highlight flags for each sample of a row, in column order
    pub fn sample_flags(&self, row: &MeasurementRow) -> Vec<bool> {
        let spec = row.spec.number();
        row.samples
            .iter()
            .map(|s| self.is_out_sample(s, spec, row.tolerance))
            .collect()
    }

    /// Row status from the mean of its numeric samples
    pub fn row_status(&self, row: &MeasurementRow) -> RowStatus {
        let spec = row.spec.number();
        if spec.is_none() || row.tolerance.is_none() {
            return RowStatus::Pending;
        }

        let (sum, count) = row
            .numeric_samples()
            .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
        if count == 0 {
            return RowStatus::Pending;
        }

        let mean = sum / count as f64;
        if self.is_out(Some(mean), spec, row.tolerance) {
            RowStatus::Fail
        } else {
            RowStatus::Ok
        }
    }
}

/// Out-of-tolerance check with the default epsilon
pub fn is_out_of_tolerance(value: &str, spec: Option<f64>, tolerance: Option<f64>) -> bool {
    ToleranceRule::default().is_out_text(value, spec, tolerance)
}
