//! Gesture interpreter
//!
//! Turns pointer, touch, keyboard and clipboard events on grid cells into
//! selection changes and row mutations.

use std::time::Instant;

use crate::commands::Cmd;
use crate::grid::{is_matrix_paste, next_on_enter, PastePlan};
use crate::messages::{GridKey, GridMsg};
use crate::model::{AppModel, CellRef, LongPress};

/// Handle grid events
pub fn update_grid(model: &mut AppModel, msg: GridMsg) -> Option<Cmd> {
    match msg {
        GridMsg::Mount => {
            if model.grid.listeners_attached {
                tracing::debug!(target: "gesture", "mount: listeners already attached");
                return None;
            }
            model.grid.listeners_attached = true;
            Some(Cmd::AttachGlobalListeners)
        }

        GridMsg::Unmount => {
            model.grid.long_press = None;
            model.grid.selection.end_selection();
            if !model.grid.listeners_attached {
                return None;
            }
            model.grid.listeners_attached = false;
            Some(Cmd::DetachGlobalListeners)
        }

        GridMsg::Focus(cell) => {
            if model.contains_cell(cell) {
                model.grid.focus = Some(cell);
            }
            None
        }

        GridMsg::Input { cell, text } => {
            if model.chart.set_cell(cell, &text) {
                Some(Cmd::Redraw)
            } else {
                None
            }
        }

        GridMsg::PointerDown(cell) => {
            if !model.contains_cell(cell) {
                return None;
            }
            model.grid.long_press = None;
            model.grid.selection.begin_selection(cell.row, cell.column);
            tracing::debug!(target: "gesture", %cell, "drag started");
            Some(Cmd::Redraw)
        }

        GridMsg::PointerEnter { cell, buttons_held } => {
            if !buttons_held || !model.grid.selection.is_in_progress() {
                return None;
            }
            if !model.contains_cell(cell) {
                return None;
            }
            model.grid.selection.extend_selection(cell.row, cell.column);
            Some(Cmd::Redraw)
        }

        GridMsg::PointerUp => {
            if model.grid.selection.is_in_progress() {
                model.grid.selection.end_selection();
                tracing::debug!(
                    target: "gesture",
                    selected = model.grid.selection.len(),
                    "drag ended"
                );
            }
            None
        }

        GridMsg::TouchStart { cell, at } => {
            if !model.contains_cell(cell) {
                return None;
            }
            model.grid.long_press = Some(LongPress::new(cell, at, model.config.long_press()));
            None
        }

        GridMsg::TouchMove | GridMsg::TouchEnd => {
            if let Some(press) = model.grid.long_press.take() {
                tracing::debug!(target: "gesture", cell = %press.cell, "long-press cancelled");
            }
            None
        }

        GridMsg::KeyDown { cell, key } => match key {
            GridKey::Enter => Some(enter(model, cell)),
            GridKey::Backspace | GridKey::Delete => bulk_clear(model),
            GridKey::Other => None,
        },

        GridMsg::Paste { cell, text } => paste(model, cell, &text),

        GridMsg::PasteConfirmed(confirmed) => {
            let plan = model.grid.pending_paste.take()?;
            if !confirmed {
                tracing::debug!(target: "paste", origin = %plan.origin, "paste cancelled");
                return None;
            }
            Some(apply_paste(model, plan))
        }

        GridMsg::ClearConfirmed(confirmed) => {
            let cells = model.grid.pending_clear.take()?;
            if !confirmed {
                tracing::debug!(target: "selection", "bulk clear cancelled");
                return None;
            }
            Some(apply_clear(model, &cells))
        }

        GridMsg::ClearSelection => {
            if model.grid.selection.is_empty() {
                return None;
            }
            model.grid.selection.clear();
            Some(Cmd::Redraw)
        }
    }
}

/// Fire an armed long-press once its hold time has passed
pub fn tick_long_press(model: &mut AppModel, now: Instant) -> Option<Cmd> {
    let press = model.grid.long_press?;
    if !press.is_due(now) {
        return None;
    }
    model.grid.long_press = None;

    let cell = press.cell;
    model.grid.selection.toggle_cell(cell.row, cell.column);
    tracing::debug!(
        target: "gesture",
        %cell,
        selected = model.grid.selection.is_selected(cell.row, cell.column),
        "long-press toggled cell"
    );

    Some(Cmd::batch(vec![
        Cmd::Vibrate {
            duration_ms: model.config.haptic_pulse_ms,
        },
        Cmd::Redraw,
    ]))
}

fn enter(model: &mut AppModel, cell: CellRef) -> Cmd {
    let Some(next) = next_on_enter(model.chart.layout(), model.chart.row_count(), cell) else {
        return Cmd::PreventDefault;
    };
    model.grid.focus = Some(next);
    Cmd::batch(vec![
        Cmd::PreventDefault,
        Cmd::FocusCell {
            cell: next,
            select_text: true,
        },
    ])
}

fn bulk_clear(model: &mut AppModel) -> Option<Cmd> {
    if model.grid.selection.is_empty() {
        return None;
    }

    let row_count = model.chart.row_count();
    let cells: Vec<CellRef> = model
        .grid
        .selection
        .cells()
        .into_iter()
        .filter(|c| c.row < row_count)
        .collect();

    if model.config.confirm_bulk_clear {
        let prompt = format!("Clear {} selected cell(s)?", cells.len());
        model.grid.pending_clear = Some(cells);
        return Some(Cmd::batch(vec![
            Cmd::PreventDefault,
            Cmd::ConfirmClear { prompt },
        ]));
    }

    Some(Cmd::batch(vec![Cmd::PreventDefault, apply_clear(model, &cells)]))
}

fn apply_clear(model: &mut AppModel, cells: &[CellRef]) -> Cmd {
    for cell in cells {
        model.chart.set_cell(*cell, "");
    }
    tracing::info!(target: "selection", cleared = cells.len(), "bulk clear");
    Cmd::batch(vec![
        Cmd::Redraw,
        Cmd::info(format!("Cleared {} cell(s)", cells.len())),
    ])
}

fn paste(model: &mut AppModel, cell: CellRef, text: &str) -> Option<Cmd> {
    if text.trim().is_empty() || !is_matrix_paste(text) {
        return None;
    }
    if !model.contains_cell(cell) {
        return None;
    }
    let matrix = model.importer.parse(text)?;

    let plan = PastePlan::build(
        &matrix,
        model.chart.layout(),
        model.chart.row_count(),
        cell,
    );
    if plan.is_empty() {
        tracing::debug!(target: "paste", origin = %cell, "matrix paste has no data rows");
        return Some(Cmd::PreventDefault);
    }

    let prompt = plan.prompt();
    model.grid.pending_paste = Some(plan);
    Some(Cmd::batch(vec![
        Cmd::PreventDefault,
        Cmd::ConfirmPaste { prompt },
    ]))
}

fn apply_paste(model: &mut AppModel, plan: PastePlan) -> Cmd {
    for (cell, value) in &plan.writes {
        model.chart.set_cell(*cell, value);
    }
    tracing::info!(
        target: "paste",
        origin = %plan.origin,
        rows = plan.rows_affected,
        cells = plan.writes.len(),
        "paste applied"
    );
    Cmd::batch(vec![
        Cmd::Redraw,
        Cmd::info(format!("Pasted {} row(s)", plan.rows_affected)),
    ])
}
