//! Host collaborators the runtime talks to
//!
//! Each is a small trait so the CLI, tests and embedding hosts can supply
//! their own. Platform features degrade silently: a missing clipboard or
//! vibration motor never fails an interaction.

use anyhow::{anyhow, Result};

use crate::model::{AqlLimits, AqlRequest};

/// Read access to the system clipboard
pub trait Clipboard {
    /// Current text, `None` when unavailable or not text
    fn read_text(&mut self) -> Option<String>;
}

/// Clipboard backed by `arboard`
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn read_text(&mut self) -> Option<String> {
        match arboard::Clipboard::new() {
            Ok(mut clipboard) => clipboard
                .get_text()
                .map_err(|e| tracing::debug!(target: "platform", "clipboard read failed: {}", e))
                .ok(),
            Err(e) => {
                tracing::debug!(target: "platform", "clipboard unavailable: {}", e);
                None
            }
        }
    }
}

/// Short vibration pulse, best effort
pub trait Haptics {
    fn pulse(&mut self, duration_ms: u64);
}

/// Haptics for hosts without a vibration motor: logs the pulse
#[derive(Debug, Default)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn pulse(&mut self, duration_ms: u64) {
        tracing::debug!(target: "platform", duration_ms, "haptic pulse (no device)");
    }
}

/// Yes/no confirmation shown before destructive grid operations
pub trait Prompt {
    fn confirm(&mut self, message: &str) -> bool;
}

/// Answers every prompt the same way
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Prompt for AutoConfirm {
    fn confirm(&mut self, message: &str) -> bool {
        tracing::debug!(target: "platform", answer = self.0, "auto-answered: {}", message);
        self.0
    }
}

/// Server-side AQL table lookup
pub trait AqlService: Send + Sync {
    fn calculate(&self, request: &AqlRequest) -> Result<AqlLimits>;
}

impl<F> AqlService for F
where
    F: Fn(&AqlRequest) -> Result<AqlLimits> + Send + Sync,
{
    fn calculate(&self, request: &AqlRequest) -> Result<AqlLimits> {
        self(request)
    }
}

/// Serves one fixed answer, or fails when there is none
#[derive(Debug, Clone, Default)]
pub struct FixedAqlService {
    pub limits: Option<AqlLimits>,
}

impl AqlService for FixedAqlService {
    fn calculate(&self, request: &AqlRequest) -> Result<AqlLimits> {
        self.limits
            .ok_or_else(|| anyhow!("no AQL table available for lot size {}", request.lot_size))
    }
}
