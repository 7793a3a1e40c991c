//! Enter-key navigation through the gesture interpreter

mod common;

use common::{cell, grid, runtime_with, test_model};
use qcgrid::commands::Cmd;
use qcgrid::messages::{GridKey, GridMsg, Msg};
use qcgrid::model::FormVariant;
use qcgrid::update::update;

fn enter(at: &str) -> Msg {
    Msg::Grid(GridMsg::KeyDown {
        cell: cell(at),
        key: GridKey::Enter,
    })
}

#[test]
fn test_enter_moves_down_and_selects_text() {
    let mut model = test_model(FormVariant::FinalInspection, 3);
    let cmd = update(&mut model, enter("s1:1")).unwrap();

    assert!(cmd.prevents_default());
    assert!(cmd.flatten().contains(&Cmd::FocusCell {
        cell: cell("s1:2"),
        select_text: true,
    }));
    assert_eq!(model.grid.focus, Some(cell("s1:2")));
}

#[test]
fn test_enter_on_last_row_wraps_to_next_column() {
    let (mut rt, _) = runtime_with(test_model(FormVariant::FinalInspection, 3), true);
    let outcome = rt.dispatch(enter("s1:3"));

    assert!(outcome.prevent_default);
    assert_eq!(rt.focus_request(), Some((cell("s2:1"), true)));
}

#[test]
fn test_enter_on_last_cell_stays() {
    let mut model = test_model(FormVariant::FinalInspection, 3);
    update(&mut model, Msg::Grid(GridMsg::Focus(cell("s5:3"))));

    let cmd = update(&mut model, enter("s5:3")).unwrap();
    assert_eq!(cmd, Cmd::PreventDefault);
    assert_eq!(model.grid.focus, Some(cell("s5:3")));
}

#[test]
fn test_enter_walks_the_whole_grid() {
    let (mut rt, _) = runtime_with(test_model(FormVariant::SampleEvaluation, 2), true);
    let mut at = cell("spec:1");
    let mut visited = vec![at.to_string()];
    while let Some(Cmd::FocusCell { cell: next, .. }) = update(&mut rt.model, Msg::Grid(GridMsg::KeyDown {
        cell: at,
        key: GridKey::Enter,
    }))
    .and_then(|cmd| cmd.flatten().into_iter().find(|c| matches!(c, Cmd::FocusCell { .. })))
    {
        at = next;
        visited.push(at.to_string());
    }
    assert_eq!(
        visited,
        vec!["spec:1", "spec:2", "s1:1", "s1:2", "s2:1", "s2:2", "s3:1", "s3:2"]
    );
}

#[test]
fn test_other_keys_are_not_intercepted() {
    let (mut rt, _) = runtime_with(test_model(FormVariant::FinalInspection, 2), true);
    let outcome = rt.dispatch(grid(GridMsg::KeyDown {
        cell: cell("s1:1"),
        key: GridKey::Other,
    }));
    assert!(!outcome.prevent_default);
    assert_eq!(rt.focus_request(), None);
}
