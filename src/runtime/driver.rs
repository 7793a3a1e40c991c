//! Message loop around `update`
//!
//! Feeds host messages through `update`, executes the resulting commands
//! against the platform collaborators and routes their answers back in as
//! messages. AQL requests run on worker threads and report through a
//! channel that the host drains.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::commands::{Cmd, NoticeLevel};
use crate::messages::{AqlMsg, GridMsg, Msg};
use crate::model::{AppModel, CellRef};
use crate::update::update;

use super::platform::{AqlService, Haptics, Prompt};

/// What the host should do with the event it just dispatched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// Suppress the browser/host default action
    pub prevent_default: bool,
    pub redraw: bool,
}

/// A notice raised by the grid, in order of appearance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

pub struct GridRuntime {
    pub model: AppModel,
    prompt: Box<dyn Prompt>,
    haptics: Box<dyn Haptics>,
    aql: Arc<dyn AqlService>,
    msg_tx: Sender<Msg>,
    msg_rx: Receiver<Msg>,
    in_flight: usize,
    notices: Vec<Notice>,
    /// Global listeners currently installed on the host document
    listeners: usize,
    /// Last focus request, with whether the text was selected
    focus_request: Option<(CellRef, bool)>,
}

impl GridRuntime {
    pub fn new(
        model: AppModel,
        prompt: Box<dyn Prompt>,
        haptics: Box<dyn Haptics>,
        aql: Arc<dyn AqlService>,
    ) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        Self {
            model,
            prompt,
            haptics,
            aql,
            msg_tx,
            msg_rx,
            in_flight: 0,
            notices: Vec::new(),
            listeners: 0,
            focus_request: None,
        }
    }

    /// Run one host message, plus every message its commands produce
    /// synchronously (prompt answers)
    pub fn dispatch(&mut self, msg: Msg) -> Dispatch {
        let mut outcome = Dispatch::default();
        let mut queue = VecDeque::from([msg]);

        while let Some(msg) = queue.pop_front() {
            let Some(cmd) = update(&mut self.model, msg) else {
                continue;
            };
            outcome.prevent_default |= cmd.prevents_default();
            outcome.redraw |= cmd.needs_redraw();
            self.process_cmd(cmd, &mut queue);
        }
        outcome
    }

    pub fn tick(&mut self, now: Instant) -> Dispatch {
        self.dispatch(Msg::Tick(now))
    }

    /// Execute one command; prompt answers are queued as follow-up messages
    fn process_cmd(&mut self, cmd: Cmd, queue: &mut VecDeque<Msg>) {
        match cmd {
            Cmd::None | Cmd::Redraw | Cmd::PreventDefault => {}
            Cmd::FocusCell { cell, select_text } => {
                self.focus_request = Some((cell, select_text));
            }
            Cmd::Vibrate { duration_ms } => {
                self.haptics.pulse(duration_ms);
            }
            Cmd::ConfirmPaste { prompt } => {
                let answer = self.prompt.confirm(&prompt);
                queue.push_back(Msg::Grid(GridMsg::PasteConfirmed(answer)));
            }
            Cmd::ConfirmClear { prompt } => {
                let answer = self.prompt.confirm(&prompt);
                queue.push_back(Msg::Grid(GridMsg::ClearConfirmed(answer)));
            }
            Cmd::Notify { level, message } => {
                match level {
                    NoticeLevel::Info => tracing::info!(target: "notice", "{}", message),
                    NoticeLevel::Warning => tracing::warn!(target: "notice", "{}", message),
                }
                self.notices.push(Notice { level, message });
            }
            Cmd::AttachGlobalListeners => {
                self.listeners += 1;
            }
            Cmd::DetachGlobalListeners => {
                self.listeners = self.listeners.saturating_sub(1);
            }
            Cmd::RequestAql(request) => {
                let tx = self.msg_tx.clone();
                let service = Arc::clone(&self.aql);
                self.in_flight += 1;
                std::thread::spawn(move || {
                    let result = service.calculate(&request).map_err(|e| format!("{:#}", e));
                    let _ = tx.send(Msg::Aql(AqlMsg::Completed {
                        seq: request.seq,
                        result,
                    }));
                });
            }
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd, queue);
                }
            }
        }
    }

    /// Apply worker results that have already arrived
    pub fn drain_completed(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.dispatch(msg);
            applied += 1;
        }
        applied
    }

    /// Block until every outstanding AQL request has reported back
    pub fn wait_for_workers(&mut self, timeout: Duration) -> usize {
        let deadline = Instant::now() + timeout;
        let mut applied = 0;
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.msg_rx.recv_timeout(remaining) {
                Ok(msg) => {
                    self.in_flight -= 1;
                    self.dispatch(msg);
                    applied += 1;
                }
                Err(RecvTimeoutError::Timeout) => {
                    tracing::warn!(
                        target: "aql",
                        in_flight = self.in_flight,
                        "timed out waiting for AQL workers"
                    );
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        applied
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
    }

    pub fn focus_request(&self) -> Option<(CellRef, bool)> {
        self.focus_request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::model::{AqlLimits, AqlRequest, FormVariant};
    use crate::runtime::platform::{AutoConfirm, NoHaptics};
    use anyhow::{anyhow, Result};

    fn offline(_: &AqlRequest) -> Result<AqlLimits> {
        Err(anyhow!("offline"))
    }

    fn runtime(answer: bool) -> GridRuntime {
        GridRuntime::new(
            AppModel::new(FormVariant::FinalInspection, GridConfig::default()),
            Box::new(AutoConfirm(answer)),
            Box::new(NoHaptics),
            Arc::new(offline),
        )
    }

    #[test]
    fn test_nested_batch_queues_prompt_answers_in_order() {
        let mut rt = runtime(true);
        let mut queue = VecDeque::new();
        let cmd = Cmd::batch(vec![
            Cmd::info("first"),
            Cmd::batch(vec![
                Cmd::ConfirmPaste {
                    prompt: "overwrite?".to_string(),
                },
                Cmd::AttachGlobalListeners,
            ]),
            Cmd::ConfirmClear {
                prompt: "clear?".to_string(),
            },
        ]);

        rt.process_cmd(cmd, &mut queue);

        assert_eq!(queue.len(), 2);
        assert!(matches!(queue[0], Msg::Grid(GridMsg::PasteConfirmed(true))));
        assert!(matches!(queue[1], Msg::Grid(GridMsg::ClearConfirmed(true))));
        assert_eq!(rt.notices()[0].message, "first");
        assert_eq!(rt.listener_count(), 1);
    }

    #[test]
    fn test_dispatch_without_pending_work_ignores_answers() {
        let mut rt = runtime(false);
        let outcome = rt.dispatch(Msg::Grid(GridMsg::ClearConfirmed(false)));
        assert_eq!(outcome, Dispatch::default());
        assert!(rt.notices().is_empty());
    }
}
