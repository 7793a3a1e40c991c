//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod aql;
mod chart;
mod grid;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::model::AppModel;

#[cfg(debug_assertions)]
use crate::tracing::GridSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use aql::{tick_aql, update_aql};
pub use chart::update_chart;
pub use grid::{tick_long_press, update_grid};

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
#[inline]
pub fn update(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

fn update_inner(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Grid(m) => grid::update_grid(model, m),
        Msg::Chart(m) => chart::update_chart(model, m),
        Msg::Aql(m) => aql::update_aql(model, m),
        Msg::Tick(now) => {
            let cmds: Vec<Cmd> = [
                grid::tick_long_press(model, now),
                aql::tick_aql(model, now),
            ]
            .into_iter()
            .flatten()
            .collect();
            match cmds.len() {
                0 => None,
                1 => cmds.into_iter().next(),
                _ => Some(Cmd::batch(cmds)),
            }
        }
    }
}

/// Traced update wrapper (debug builds only)
///
/// Logs a before/after grid snapshot diff. Ticks are not logged.
#[cfg(debug_assertions)]
fn update_traced(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    let is_noisy = matches!(&msg, Msg::Tick(_));

    let msg_name = msg_type_name(&msg);
    let _span = if is_noisy {
        None
    } else {
        Some(span!(Level::DEBUG, "update", msg = %msg_name).entered())
    };

    let before = GridSnapshot::from_model(model);
    if !is_noisy {
        debug!(target: "message", msg = %msg_name, "processing");
    }

    let result = update_inner(model, msg);

    if let Some(diff) = before.diff(&GridSnapshot::from_model(model)) {
        debug!(target: "grid", %diff, "state changed");
    }
    model.assert_invariants_with_context(&msg_name);

    result
}

/// Display name for a message, e.g. `Grid::PointerDown(..)`
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Grid(m) => format!("Grid::{:?}", m),
        Msg::Chart(m) => format!("Chart::{}", chart_msg_name(m)),
        Msg::Aql(m) => format!("Aql::{:?}", m),
        Msg::Tick(_) => "Tick".to_string(),
    }
}

/// Chart messages carry whole row lists; log only the variant
#[cfg(debug_assertions)]
fn chart_msg_name(msg: &crate::messages::ChartMsg) -> &'static str {
    use crate::messages::ChartMsg;
    match msg {
        ChartMsg::TemplateSelected(_) => "TemplateSelected",
        ChartMsg::RecordLoaded { .. } => "RecordLoaded",
        ChartMsg::SizeAdded { .. } => "SizeAdded",
        ChartMsg::SizeRenamed { .. } => "SizeRenamed",
        ChartMsg::SizeQuantitiesChanged { .. } => "SizeQuantitiesChanged",
        ChartMsg::SizeRemoved(_) => "SizeRemoved",
        ChartMsg::RowsReplaced(_) => "RowsReplaced",
    }
}
