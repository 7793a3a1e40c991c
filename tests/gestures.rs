//! Gesture interpreter tests: long-press, listeners and bulk clear

mod common;

use std::time::{Duration, Instant};

use common::{cell, grid, runtime_with, test_model, test_model_with_config, value};
use qcgrid::commands::Cmd;
use qcgrid::config::GridConfig;
use qcgrid::messages::{GridKey, GridMsg, Msg};
use qcgrid::model::{ColumnKey, FormVariant};
use qcgrid::update::update;

const HOLD: Duration = Duration::from_millis(500);

// ========================================================================
// Long-press
// ========================================================================

#[test]
fn test_long_press_toggles_after_hold() {
    let (mut rt, haptics) = runtime_with(test_model(FormVariant::FinalInspection, 3), true);
    let start = Instant::now();

    rt.dispatch(grid(GridMsg::TouchStart {
        cell: cell("s2:2"),
        at: start,
    }));
    rt.tick(start + Duration::from_millis(499));
    assert!(rt.model.grid.selection.is_empty());
    assert!(haptics.0.borrow().is_empty());

    let outcome = rt.tick(start + HOLD);
    assert!(outcome.redraw);
    assert!(rt.model.grid.selection.is_selected(1, ColumnKey::Sample(2)));
    assert_eq!(*haptics.0.borrow(), vec![50]);

    // Fires once per press
    rt.tick(start + HOLD * 3);
    assert_eq!(rt.model.grid.selection.len(), 1);
}

#[test]
fn test_second_long_press_removes_cell() {
    let (mut rt, _) = runtime_with(test_model(FormVariant::FinalInspection, 3), true);
    let start = Instant::now();

    for round in 0..2u32 {
        let at = start + Duration::from_secs(round as u64 * 2);
        rt.dispatch(grid(GridMsg::TouchStart {
            cell: cell("s1:1"),
            at,
        }));
        rt.tick(at + HOLD);
        rt.dispatch(grid(GridMsg::TouchEnd));
    }
    assert!(rt.model.grid.selection.is_empty());
}

#[test]
fn test_long_press_keeps_other_cells() {
    let (mut rt, _) = runtime_with(test_model(FormVariant::FinalInspection, 3), true);
    rt.dispatch(grid(GridMsg::PointerDown(cell("s1:1"))));
    rt.dispatch(grid(GridMsg::PointerEnter {
        cell: cell("s2:2"),
        buttons_held: true,
    }));
    rt.dispatch(grid(GridMsg::PointerUp));

    let start = Instant::now();
    rt.dispatch(grid(GridMsg::TouchStart {
        cell: cell("s5:3"),
        at: start,
    }));
    rt.tick(start + HOLD);
    assert_eq!(rt.model.grid.selection.len(), 5);
}

#[test]
fn test_tap_and_move_cancel_long_press() {
    let (mut rt, haptics) = runtime_with(test_model(FormVariant::FinalInspection, 3), true);
    let start = Instant::now();

    rt.dispatch(grid(GridMsg::TouchStart {
        cell: cell("s1:1"),
        at: start,
    }));
    rt.dispatch(grid(GridMsg::TouchEnd));
    rt.tick(start + HOLD);

    rt.dispatch(grid(GridMsg::TouchStart {
        cell: cell("s1:2"),
        at: start,
    }));
    rt.dispatch(grid(GridMsg::TouchMove));
    rt.tick(start + HOLD);

    assert!(rt.model.grid.selection.is_empty());
    assert!(haptics.0.borrow().is_empty());
}

#[test]
fn test_long_press_duration_is_configurable() {
    let config = GridConfig {
        long_press_ms: 800,
        ..GridConfig::default()
    };
    let (mut rt, _) = runtime_with(
        test_model_with_config(FormVariant::FinalInspection, 2, config),
        true,
    );
    let start = Instant::now();
    rt.dispatch(grid(GridMsg::TouchStart {
        cell: cell("s1:1"),
        at: start,
    }));
    rt.tick(start + HOLD);
    assert!(rt.model.grid.selection.is_empty());
    rt.tick(start + Duration::from_millis(800));
    assert_eq!(rt.model.grid.selection.len(), 1);
}

// ========================================================================
// Global listeners
// ========================================================================

#[test]
fn test_listeners_attach_and_detach_once() {
    let (mut rt, _) = runtime_with(test_model(FormVariant::FinalInspection, 1), true);

    rt.dispatch(grid(GridMsg::Mount));
    rt.dispatch(grid(GridMsg::Mount));
    assert_eq!(rt.listener_count(), 1);

    rt.dispatch(grid(GridMsg::Unmount));
    rt.dispatch(grid(GridMsg::Unmount));
    assert_eq!(rt.listener_count(), 0);
    assert!(!rt.model.grid.listeners_attached);
}

// ========================================================================
// Bulk clear
// ========================================================================

/// Filled 4-row model that clears without asking
fn filled_model() -> qcgrid::AppModel {
    let config = GridConfig {
        confirm_bulk_clear: false,
        ..GridConfig::default()
    };
    let mut model = test_model_with_config(FormVariant::SampleEvaluation, 4, config);
    for row in 1..=4 {
        for col in ["s1", "s2", "s3"] {
            let addr = format!("{}:{}", col, row);
            model.chart.set_cell(cell(&addr), "10.1");
        }
    }
    model
}

#[test]
fn test_bulk_clear_empties_exactly_the_selection() {
    let (mut rt, _) = runtime_with(filled_model(), true);
    rt.dispatch(grid(GridMsg::PointerDown(cell("s1:2"))));
    rt.dispatch(grid(GridMsg::PointerEnter {
        cell: cell("s2:3"),
        buttons_held: true,
    }));
    rt.dispatch(grid(GridMsg::PointerUp));

    let outcome = rt.dispatch(grid(GridMsg::KeyDown {
        cell: cell("s3:4"),
        key: GridKey::Backspace,
    }));
    assert!(outcome.prevent_default);

    let blank: usize = rt
        .model
        .chart
        .rows()
        .iter()
        .map(|r| r.samples.iter().filter(|s| s.is_blank()).count())
        .sum();
    assert_eq!(blank, 4);
    assert_eq!(value(&rt.model, "s1:2"), "");
    assert_eq!(value(&rt.model, "s2:3"), "");
    assert_eq!(value(&rt.model, "s3:2"), "10.1");
    assert_eq!(value(&rt.model, "s1:1"), "10.1");
    assert_eq!(rt.notices()[0].message, "Cleared 4 cell(s)");

    // Selection stays so the user can see what was cleared
    assert_eq!(rt.model.grid.selection.len(), 4);
}

#[test]
fn test_delete_with_empty_selection_keeps_native_behaviour() {
    let mut model = filled_model();
    let cmd = update(
        &mut model,
        Msg::Grid(GridMsg::KeyDown {
            cell: cell("s1:1"),
            key: GridKey::Delete,
        }),
    );
    assert_eq!(cmd, None);
    assert_eq!(value(&model, "s1:1"), "10.1");
}

#[test]
fn test_clear_clears_spec_when_editable() {
    let (mut rt, _) = runtime_with(filled_model(), true);
    rt.dispatch(grid(GridMsg::PointerDown(cell("spec:1"))));
    rt.dispatch(grid(GridMsg::PointerUp));
    rt.dispatch(grid(GridMsg::KeyDown {
        cell: cell("spec:1"),
        key: GridKey::Delete,
    }));
    assert_eq!(value(&rt.model, "spec:1"), "");
}

#[test]
fn test_bulk_clear_asks_by_default() {
    let mut model = test_model(FormVariant::FinalInspection, 2);
    model.chart.set_cell(cell("s1:1"), "9");
    model.grid.selection.toggle_cell(0, ColumnKey::Sample(1));

    let cmd = update(
        &mut model,
        Msg::Grid(GridMsg::KeyDown {
            cell: cell("s1:1"),
            key: GridKey::Backspace,
        }),
    )
    .unwrap();
    assert!(cmd.prevents_default());
    assert!(cmd
        .clone()
        .flatten()
        .iter()
        .any(|c| matches!(c, Cmd::ConfirmClear { prompt } if prompt == "Clear 1 selected cell(s)?")));
    assert_eq!(value(&model, "s1:1"), "9");

    update(&mut model, Msg::Grid(GridMsg::ClearConfirmed(false)));
    assert_eq!(value(&model, "s1:1"), "9");

    // A cancelled prompt cannot be answered again
    update(&mut model, Msg::Grid(GridMsg::ClearConfirmed(true)));
    assert_eq!(value(&model, "s1:1"), "9");
}

#[test]
fn test_confirm_bulk_clear_through_runtime() {
    let mut model = test_model(FormVariant::FinalInspection, 2);
    model.chart.set_cell(cell("s1:1"), "9");
    model.grid.selection.toggle_cell(0, ColumnKey::Sample(1));

    let (mut rt, _) = runtime_with(model, true);
    rt.dispatch(grid(GridMsg::KeyDown {
        cell: cell("s1:1"),
        key: GridKey::Backspace,
    }));
    assert_eq!(value(&rt.model, "s1:1"), "");
    assert_eq!(rt.notices()[0].message, "Cleared 1 cell(s)");
}

#[test]
fn test_declined_bulk_clear_through_runtime() {
    let mut model = test_model(FormVariant::FinalInspection, 2);
    model.chart.set_cell(cell("s1:1"), "9");
    model.grid.selection.toggle_cell(0, ColumnKey::Sample(1));

    let (mut rt, _) = runtime_with(model, false);
    let outcome = rt.dispatch(grid(GridMsg::KeyDown {
        cell: cell("s1:1"),
        key: GridKey::Backspace,
    }));
    assert!(outcome.prevent_default);
    assert_eq!(value(&rt.model, "s1:1"), "9");
    assert!(rt.notices().is_empty());
}

// ========================================================================
// Typing
// ========================================================================

#[test]
fn test_input_keeps_partial_text() {
    let mut model = test_model(FormVariant::FinalInspection, 1);
    update(
        &mut model,
        Msg::Grid(GridMsg::Input {
            cell: cell("s1:1"),
            text: "10.".to_string(),
        }),
    );
    assert_eq!(value(&model, "s1:1"), "10.");
    assert_eq!(model.chart.rows()[0].samples[0].number(), Some(10.0));
}

#[test]
fn test_input_into_read_only_spec_is_ignored() {
    let mut model = test_model(FormVariant::FinalInspection, 1);
    let cmd = update(
        &mut model,
        Msg::Grid(GridMsg::Input {
            cell: cell("spec:1"),
            text: "99".to_string(),
        }),
    );
    assert_eq!(cmd, None);
    assert_eq!(model.chart.rows()[0].spec.raw(), "10");
}
