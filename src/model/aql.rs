//! AQL (acceptance quality limit) state
//!
//! Sample sizes and defect limits come from the server. This module holds
//! what the form needs around that: the debounce deadline, request
//! sequencing, the last applied limits and the live defect tally.

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Inspection level table requested from the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AqlStandard {
    Strict,
    #[default]
    Standard,
}

/// Body of one recalculation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AqlRequest {
    #[serde(skip)]
    pub seq: u64,
    #[serde(rename = "presented_qty")]
    pub lot_size: u32,
    #[serde(rename = "aql_standard")]
    pub standard: AqlStandard,
}

/// Sample size and allowed defect counts for a lot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AqlLimits {
    pub sample_size: u32,
    pub max_allowed_critical: u32,
    pub max_allowed_major: u32,
    pub max_allowed_minor: u32,
}

impl AqlLimits {
    pub fn allowed(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Critical => self.max_allowed_critical,
            Severity::Major => self.max_allowed_major,
            Severity::Minor => self.max_allowed_minor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Major,
    Minor,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Critical, Severity::Major, Severity::Minor];
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Critical => "critical",
            Severity::Major => "major",
            Severity::Minor => "minor",
        };
        f.write_str(name)
    }
}

/// Defects found so far, by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DefectTally {
    pub critical: u32,
    pub major: u32,
    pub minor: u32,
}

impl DefectTally {
    pub fn count(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Critical => self.critical,
            Severity::Major => self.major,
            Severity::Minor => self.minor,
        }
    }

    /// Add `delta` to one count; counts never go below zero
    pub fn adjust(&mut self, severity: Severity, delta: i32) {
        let slot = match severity {
            Severity::Critical => &mut self.critical,
            Severity::Major => &mut self.major,
            Severity::Minor => &mut self.minor,
        };
        *slot = if delta < 0 {
            slot.saturating_sub(delta.unsigned_abs())
        } else {
            slot.saturating_add(delta as u32)
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InspectionResult {
    Pass,
    Fail,
}

impl InspectionResult {
    /// Fail as soon as any severity exceeds its allowance
    pub fn evaluate(limits: &AqlLimits, tally: &DefectTally) -> Self {
        let exceeded = Severity::ALL
            .iter()
            .any(|s| tally.count(*s) > limits.allowed(*s));
        if exceeded {
            InspectionResult::Fail
        } else {
            InspectionResult::Pass
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AqlState {
    pub lot_size: u32,
    pub standard: AqlStandard,
    pub tally: DefectTally,
    pub limits: Option<AqlLimits>,
    pub last_error: Option<String>,
    deadline: Option<Instant>,
    next_seq: u64,
    applied_seq: u64,
}

impl AqlState {
    /// (Re)arm the debounce; each call pushes the deadline out again
    pub fn schedule(&mut self, now: Instant, debounce: Duration) {
        self.deadline = Some(now + debounce);
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Request to send once the quiet period has passed
    ///
    /// Consumes the deadline, so one burst of changes yields one request.
    /// A lot size of zero yields nothing.
    pub fn take_due(&mut self, now: Instant) -> Option<AqlRequest> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;
        if self.lot_size == 0 {
            return None;
        }
        self.next_seq += 1;
        Some(AqlRequest {
            seq: self.next_seq,
            lot_size: self.lot_size,
            standard: self.standard,
        })
    }

    /// Apply a completion; older than what is already shown → ignored
    pub fn apply(&mut self, seq: u64, result: Result<AqlLimits, String>) -> bool {
        if seq <= self.applied_seq {
            return false;
        }
        match result {
            Ok(limits) => {
                self.applied_seq = seq;
                self.limits = Some(limits);
                self.last_error = None;
                true
            }
            Err(e) => {
                self.last_error = Some(e);
                false
            }
        }
    }

    pub fn result(&self) -> Option<InspectionResult> {
        self.limits
            .as_ref()
            .map(|limits| InspectionResult::evaluate(limits, &self.tally))
    }
}
