//! Submission payload for the measurements field
//!
//! One JSON object per row. Blank samples become `null`; numeric text is
//! sent as a number and anything else as the text typed.

use serde_json::{Map, Number, Value};

use crate::grid::ToleranceRule;
use crate::model::{Chart, FormVariant, MeasurementRow, SampleValue};

/// Build the `measurements` array for a chart
pub fn measurement_payload(chart: &Chart, rule: &ToleranceRule) -> Value {
    let variant = chart.variant();
    let rows = chart
        .rows()
        .iter()
        .map(|row| {
            let size_name = row
                .group_key
                .and_then(|key| chart.size_name(key))
                .map(str::to_string);
            Value::Object(row_payload(variant, row, size_name, rule))
        })
        .collect();
    Value::Array(rows)
}

fn row_payload(
    variant: FormVariant,
    row: &MeasurementRow,
    size_name: Option<String>,
    rule: &ToleranceRule,
) -> Map<String, Value> {
    let mut object = Map::new();
    object.insert("pom_name".to_string(), Value::String(row.pom_name.clone()));
    object.insert("tol".to_string(), number_or_null(row.tolerance));
    object.insert(variant.spec_field().to_string(), sample_value(&row.spec));

    if variant.grouped_by_size() {
        object.insert(
            "size_name".to_string(),
            size_name.map(Value::String).unwrap_or(Value::Null),
        );
    }

    for (i, sample) in row.samples.iter().enumerate() {
        object.insert(format!("s{}", i + 1), sample_value(sample));
    }

    if variant == FormVariant::SampleEvaluation {
        object.insert(
            "status".to_string(),
            Value::String(rule.row_status(row).as_record_str().to_string()),
        );
    }
    object
}

fn sample_value(value: &SampleValue) -> Value {
    if value.is_blank() {
        return Value::Null;
    }
    match value.number().and_then(Number::from_f64) {
        Some(n) => Value::Number(n),
        None => Value::String(value.raw().trim().to_string()),
    }
}

fn number_or_null(value: Option<f64>) -> Value {
    value
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
