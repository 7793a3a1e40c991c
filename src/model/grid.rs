//! Grid interaction state - selection, focus, pending gestures and prompts

use std::time::{Duration, Instant};

use super::columns::{CellRef, ColumnLayout};
use crate::grid::{PastePlan, SelectionEngine};

/// Armed long-press on a touch device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongPress {
    pub cell: CellRef,
    pub deadline: Instant,
}

impl LongPress {
    pub fn new(cell: CellRef, started: Instant, hold: Duration) -> Self {
        Self {
            cell,
            deadline: started + hold,
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}

#[derive(Debug, Clone)]
pub struct GridState {
    pub selection: SelectionEngine,
    /// Cell whose input currently has keyboard focus
    pub focus: Option<CellRef>,
    pub long_press: Option<LongPress>,
    /// Paste waiting for the user to confirm the overwrite
    pub pending_paste: Option<PastePlan>,
    /// Bulk clear waiting for confirmation
    pub pending_clear: Option<Vec<CellRef>>,
    /// Whether the document-level pointer-up listener is installed
    pub listeners_attached: bool,
}

impl GridState {
    pub fn new(layout: ColumnLayout) -> Self {
        Self {
            selection: SelectionEngine::new(layout),
            focus: None,
            long_press: None,
            pending_paste: None,
            pending_clear: None,
            listeners_attached: false,
        }
    }

    /// Drop everything that refers to row indices; called when rows change
    pub fn reset_for_rows(&mut self, layout: ColumnLayout) {
        self.selection = SelectionEngine::new(layout);
        self.long_press = None;
        self.pending_paste = None;
        self.pending_clear = None;
        self.focus = None;
    }

    pub fn has_pending_prompt(&self) -> bool {
        self.pending_paste.is_some() || self.pending_clear.is_some()
    }
}
