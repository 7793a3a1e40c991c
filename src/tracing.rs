//! Logging setup and debug-build state snapshots
//!
//! Configure the console via `RUST_LOG`:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=gesture=debug,paste=debug` - scoped filtering
//! - `RUST_LOG=qcgrid::update=debug` - module-level filtering
//!
//! A second layer writes debug-level logs to `~/.config/qcgrid/logs/qcgrid.log`
//! with daily rotation.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::model::{AppModel, CellRef};

/// Initialize tracing subscriber with console and file logging
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender =
                tracing_appender::rolling::daily(logs_dir, crate::config_paths::LOG_FILE_NAME);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    // A second init (tests, embedding hosts) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

/// Lightweight snapshot of interaction state for diffing
#[derive(Debug, Clone, PartialEq)]
pub struct GridSnapshot {
    pub row_count: usize,
    pub selected: usize,
    pub dragging: bool,
    pub focus: Option<CellRef>,
    pub long_press: Option<CellRef>,
    pub pending_prompt: bool,
    pub filled_cells: usize,
}

impl GridSnapshot {
    pub fn from_model(model: &AppModel) -> Self {
        Self {
            row_count: model.chart.row_count(),
            selected: model.grid.selection.len(),
            dragging: model.grid.selection.is_in_progress(),
            focus: model.grid.focus,
            long_press: model.grid.long_press.map(|p| p.cell),
            pending_prompt: model.grid.has_pending_prompt(),
            filled_cells: model
                .chart
                .rows()
                .iter()
                .map(|r| r.samples.iter().filter(|s| !s.is_blank()).count())
                .sum(),
        }
    }

    /// Describe what changed between two snapshots
    pub fn diff(&self, other: &GridSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.row_count != other.row_count {
            changes.push(format!("rows: {} → {}", self.row_count, other.row_count));
        }
        if self.selected != other.selected {
            changes.push(format!("selected: {} → {}", self.selected, other.selected));
        }
        if self.dragging != other.dragging {
            let status = if other.dragging { "started" } else { "ended" };
            changes.push(format!("drag {}", status));
        }
        if self.focus != other.focus {
            changes.push(format!("focus: {} → {}", fmt_cell(self.focus), fmt_cell(other.focus)));
        }
        if self.long_press != other.long_press {
            let status = if other.long_press.is_some() {
                "armed"
            } else {
                "released"
            };
            changes.push(format!("long-press {}", status));
        }
        if self.pending_prompt != other.pending_prompt {
            let status = if other.pending_prompt {
                "waiting"
            } else {
                "answered"
            };
            changes.push(format!("prompt {}", status));
        }
        if self.filled_cells != other.filled_cells {
            changes.push(format!(
                "filled samples: {} → {}",
                self.filled_cells, other.filled_cells
            ));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

fn fmt_cell(cell: Option<CellRef>) -> String {
    cell.map(|c| c.to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::model::{ColumnKey, FormVariant};

    #[test]
    fn test_diff_reports_selection_and_focus() {
        let mut model = AppModel::new(FormVariant::FinalInspection, GridConfig::default());
        let before = GridSnapshot::from_model(&model);

        model.grid.selection.toggle_cell(0, ColumnKey::Sample(1));
        model.grid.focus = Some(CellRef::new(0, ColumnKey::Sample(1)));
        let diff = before.diff(&GridSnapshot::from_model(&model)).unwrap();

        assert!(diff.contains("selected: 0 → 1"));
        assert!(diff.contains("focus: - → s1:1"));
    }

    #[test]
    fn test_no_diff_when_unchanged() {
        let model = AppModel::new(FormVariant::SampleEvaluation, GridConfig::default());
        let snap = GridSnapshot::from_model(&model);
        assert_eq!(snap.diff(&snap.clone()), None);
    }
}
