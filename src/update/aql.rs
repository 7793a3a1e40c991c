//! AQL update handlers
//!
//! Lot size and standard edits arm a debounce; the request goes out on the
//! first tick after the quiet period. Results come back tagged with the
//! request's sequence number.

use std::time::Instant;

use crate::commands::Cmd;
use crate::messages::AqlMsg;
use crate::model::AppModel;

pub fn update_aql(model: &mut AppModel, msg: AqlMsg) -> Option<Cmd> {
    match msg {
        AqlMsg::LotSizeChanged { lot_size, at } => {
            model.aql.lot_size = lot_size;
            model.aql.schedule(at, model.config.aql_debounce());
            None
        }

        AqlMsg::StandardChanged { standard, at } => {
            model.aql.standard = standard;
            model.aql.schedule(at, model.config.aql_debounce());
            None
        }

        AqlMsg::Completed { seq, result } => {
            if let Err(ref e) = result {
                tracing::warn!(target: "aql", seq, "AQL calculation failed: {}", e);
            }
            let failed = result.is_err();
            if model.aql.apply(seq, result) {
                tracing::debug!(target: "aql", seq, limits = ?model.aql.limits, "limits applied");
                Some(Cmd::Redraw)
            } else if failed {
                Some(Cmd::warning("Could not recalculate AQL; keeping previous limits"))
            } else {
                tracing::debug!(target: "aql", seq, "stale result discarded");
                None
            }
        }

        AqlMsg::AdjustDefect { severity, delta } => {
            model.aql.tally.adjust(severity, delta);
            Some(Cmd::Redraw)
        }
    }
}

/// Emit the debounced request once its deadline has passed
pub fn tick_aql(model: &mut AppModel, now: Instant) -> Option<Cmd> {
    let request = model.aql.take_due(now)?;
    tracing::debug!(
        target: "aql",
        seq = request.seq,
        lot_size = request.lot_size,
        "requesting AQL limits"
    );
    Some(Cmd::RequestAql(request))
}
