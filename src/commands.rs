//! Command types for the Elm-style architecture
//!
//! Commands represent side effects the runtime performs after an update.

use crate::model::{AqlRequest, CellRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Re-render the grid
    Redraw,
    /// Suppress the host's default handling of the triggering event
    PreventDefault,
    /// Move keyboard focus; `select_text` selects the input's contents
    FocusCell { cell: CellRef, select_text: bool },
    /// Short haptic pulse (best effort)
    Vibrate { duration_ms: u64 },
    /// Ask before a paste overwrites cells; answer with `GridMsg::PasteConfirmed`
    ConfirmPaste { prompt: String },
    /// Ask before a bulk clear; answer with `GridMsg::ClearConfirmed`
    ConfirmClear { prompt: String },
    /// Toast-style notice for the user
    Notify { level: NoticeLevel, message: String },
    AttachGlobalListeners,
    DetachGlobalListeners,
    /// Run an AQL recalculation on the worker; replies with `AqlMsg::Completed`
    RequestAql(AqlRequest),
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Cmd::Notify {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Cmd::Notify {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    /// Whether the triggering host event must not get default handling
    pub fn prevents_default(&self) -> bool {
        match self {
            Cmd::PreventDefault => true,
            Cmd::Batch(cmds) => cmds.iter().any(Cmd::prevents_default),
            _ => false,
        }
    }

    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None | Cmd::PreventDefault | Cmd::Vibrate { .. } => false,
            Cmd::AttachGlobalListeners | Cmd::DetachGlobalListeners => false,
            // The prompt answer triggers the redraw
            Cmd::ConfirmPaste { .. } | Cmd::ConfirmClear { .. } => false,
            Cmd::RequestAql(_) => false,
            Cmd::Redraw | Cmd::FocusCell { .. } | Cmd::Notify { .. } => true,
            Cmd::Batch(cmds) => cmds.iter().any(Cmd::needs_redraw),
        }
    }

    /// Commands in execution order, batches flattened
    pub fn flatten(self) -> Vec<Cmd> {
        match self {
            Cmd::None => Vec::new(),
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::flatten).collect(),
            cmd => vec![cmd],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnKey;

    #[test]
    fn test_prevents_default_looks_into_batches() {
        let cmd = Cmd::batch(vec![
            Cmd::Redraw,
            Cmd::batch(vec![Cmd::PreventDefault]),
        ]);
        assert!(cmd.prevents_default());
        assert!(!Cmd::Redraw.prevents_default());
    }

    #[test]
    fn test_flatten_drops_none() {
        let focus = Cmd::FocusCell {
            cell: CellRef::new(1, ColumnKey::Sample(1)),
            select_text: true,
        };
        let cmd = Cmd::batch(vec![Cmd::None, Cmd::PreventDefault, focus.clone()]);
        assert_eq!(cmd.flatten(), vec![Cmd::PreventDefault, focus]);
    }

    #[test]
    fn test_needs_redraw() {
        assert!(!Cmd::PreventDefault.needs_redraw());
        assert!(Cmd::batch(vec![Cmd::PreventDefault, Cmd::info("ok")]).needs_redraw());
    }
}
