//! Plain-text rendering of the grid for the command line
//!
//! Cells outside tolerance are marked with `!`, selected cells are wrapped
//! in brackets.

use std::fmt::Write as _;

use crate::model::{AppModel, CellRef, ColumnKey, RowStatus};

const NAME_WIDTH: usize = 18;
const CELL_WIDTH: usize = 9;

pub fn render_grid(model: &AppModel) -> String {
    let chart = &model.chart;
    let layout = chart.layout();
    let mut out = String::new();

    let _ = write!(out, "{:>3}  {:<width$} {:>6}", "#", "POM", "TOL", width = NAME_WIDTH);
    if !layout.contains(ColumnKey::Spec) {
        let _ = write!(out, " {:>width$}", "SPEC", width = CELL_WIDTH);
    }
    for key in layout.keys() {
        let _ = write!(out, " {:>width$}", key.label(), width = CELL_WIDTH);
    }
    let _ = writeln!(out, "  STATUS");

    let mut current_group = None;
    for (index, row) in chart.rows().iter().enumerate() {
        if row.group_key.is_some() && row.group_key != current_group {
            current_group = row.group_key;
            let name = row
                .group_key
                .and_then(|k| chart.size_name(k))
                .unwrap_or("?");
            let _ = writeln!(out, "-- size {} --", name);
        }

        let tol = row
            .tolerance
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = write!(
            out,
            "{:>3}  {:<width$} {:>6}",
            index + 1,
            truncate(&row.pom_name, NAME_WIDTH),
            tol,
            width = NAME_WIDTH
        );
        if !layout.contains(ColumnKey::Spec) {
            let _ = write!(out, " {:>width$}", row.spec.raw(), width = CELL_WIDTH);
        }
        for key in layout.keys() {
            let _ = write!(
                out,
                " {:>width$}",
                cell_text(model, CellRef::new(index, *key)),
                width = CELL_WIDTH
            );
        }
        let status = match model.tolerance.row_status(row) {
            RowStatus::Pending => "-",
            RowStatus::Ok => "OK",
            RowStatus::Fail => "FAIL",
        };
        let _ = writeln!(out, "  {}", status);
    }

    if chart.row_count() == 0 {
        let _ = writeln!(out, "(no rows: select a template)");
    }
    out
}

fn cell_text(model: &AppModel, cell: CellRef) -> String {
    let raw = model
        .chart
        .cell(cell)
        .map(|v| v.raw().trim().to_string())
        .unwrap_or_default();
    let mut text = truncate(&raw, CELL_WIDTH - 3);
    if model.is_cell_out(cell) {
        text.push('!');
    }
    if model.grid.selection.is_selected(cell.row, cell.column) {
        text = format!("[{}]", text);
    }
    text
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}

/// Out-of-tolerance cells and row statuses, one line each
pub fn tolerance_report(model: &AppModel) -> Vec<String> {
    let chart = &model.chart;
    let mut lines = Vec::new();
    for (index, row) in chart.rows().iter().enumerate() {
        let label = match row.group_key.and_then(|k| chart.size_name(k)) {
            Some(size) => format!("{} [{}]", row.pom_name, size),
            None => row.pom_name.clone(),
        };
        for key in chart.layout().keys() {
            let cell = CellRef::new(index, *key);
            if model.is_cell_out(cell) {
                let value = chart.cell(cell).map(|v| v.raw().trim()).unwrap_or("");
                lines.push(format!(
                    "{} {}: {} outside {} ± {}",
                    label,
                    key.label(),
                    value,
                    row.spec.raw().trim(),
                    row.tolerance.unwrap_or_default()
                ));
            }
        }
        if model.tolerance.row_status(row) == RowStatus::Fail {
            lines.push(format!("{}: FAIL (sample mean out of tolerance)", label));
        }
    }
    lines
}
