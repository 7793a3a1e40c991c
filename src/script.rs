//! Chart files and event scripts for the command line
//!
//! A chart file describes the form being edited: variant, template, sizes
//! and optionally the saved rows of an existing record. An event script is
//! a YAML list of host events replayed against a [`GridRuntime`] on a
//! virtual clock, so long-press and debounce timing is deterministic.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;

use crate::config::GridConfig;
use crate::messages::{AqlMsg, ChartMsg, GridKey, GridMsg, Msg};
use crate::model::{
    AppModel, AqlLimits, AqlStandard, CellRef, FormVariant, GroupKey, MeasurementRow, Severity,
    SizeRow, Template,
};
use crate::runtime::GridRuntime;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SizeEntry {
    pub name: String,
    #[serde(default)]
    pub order_qty: u32,
    #[serde(default)]
    pub packed_qty: u32,
}

/// A saved measurement row as stored with an existing record
#[derive(Debug, Clone, Deserialize)]
pub struct RowEntry {
    pub pom_name: String,
    #[serde(default)]
    pub tol: Option<f64>,
    #[serde(default, alias = "std")]
    pub spec: Option<String>,
    #[serde(default)]
    pub size_name: Option<String>,
    #[serde(default)]
    pub samples: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartFile {
    #[serde(default)]
    pub variant: FormVariant,
    #[serde(default)]
    pub template: Option<Template>,
    #[serde(default)]
    pub sizes: Vec<SizeEntry>,
    /// Present when the file is a saved record rather than a new form
    #[serde(default)]
    pub rows: Option<Vec<RowEntry>>,
    /// Answer served to AQL requests when running offline
    #[serde(default)]
    pub aql_limits: Option<AqlLimits>,
}

impl ChartFile {
    /// Read a chart from `.json`, `.yaml` or `.yml`
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read chart file {}", path.display()))?;
        Self::parse(&content, path)
    }

    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let chart = if is_json {
            serde_json::from_str(content)
                .with_context(|| format!("Invalid chart JSON in {}", path.display()))?
        } else {
            serde_yaml::from_str(content)
                .with_context(|| format!("Invalid chart YAML in {}", path.display()))?
        };
        Ok(chart)
    }

    /// Build the application model this file describes
    pub fn into_model(self, config: GridConfig) -> Result<AppModel> {
        let mut model = AppModel::new(self.variant, config);

        match self.rows {
            None => {
                for size in self.sizes {
                    model.chart.add_size(size.name, size.order_qty, size.packed_qty);
                }
                model.chart.apply_template(self.template);
            }
            Some(entries) => {
                let sizes: Vec<SizeRow> = self
                    .sizes
                    .into_iter()
                    .enumerate()
                    .map(|(i, s)| SizeRow {
                        key: GroupKey(i as u64 + 1),
                        name: s.name,
                        order_qty: s.order_qty,
                        packed_qty: s.packed_qty,
                    })
                    .collect();
                let sample_count = model.chart.layout().sample_count();
                let rows = entries
                    .into_iter()
                    .map(|entry| saved_row(entry, &sizes, sample_count))
                    .collect::<Result<Vec<_>>>()?;
                model.chart.load_record(self.template, sizes, rows);
            }
        }

        model.grid.reset_for_rows(model.chart.layout().clone());
        Ok(model)
    }
}

fn saved_row(entry: RowEntry, sizes: &[SizeRow], sample_count: usize) -> Result<MeasurementRow> {
    let mut row = MeasurementRow::new(entry.pom_name, entry.tol, None, sample_count);
    if let Some(spec) = entry.spec {
        row.spec.set(&spec);
    }
    for (slot, text) in row.samples.iter_mut().zip(&entry.samples) {
        slot.set(text);
    }
    if let Some(name) = entry.size_name {
        let size = sizes
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| anyhow!("row '{}' refers to unknown size '{}'", row.pom_name, name))?;
        row.group_key = Some(size.key);
    }
    Ok(row)
}

fn default_buttons_held() -> bool {
    true
}

/// One step of an event script
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptEvent {
    Mount,
    Unmount,
    Focus {
        cell: CellRef,
    },
    Input {
        cell: CellRef,
        text: String,
    },
    PointerDown {
        cell: CellRef,
    },
    PointerEnter {
        cell: CellRef,
        #[serde(default = "default_buttons_held")]
        buttons_held: bool,
    },
    PointerUp,
    TouchStart {
        cell: CellRef,
    },
    TouchMove,
    TouchEnd,
    Key {
        cell: CellRef,
        key: GridKey,
    },
    Paste {
        cell: CellRef,
        text: String,
    },
    ClearSelection,
    /// Advance the virtual clock and deliver a tick
    Wait {
        ms: u64,
    },
    SelectTemplate {
        #[serde(default)]
        template: Option<Template>,
    },
    AddSize {
        name: String,
        #[serde(default)]
        order_qty: u32,
        #[serde(default)]
        packed_qty: u32,
    },
    RenameSize {
        name: String,
        to: String,
    },
    RemoveSize {
        name: String,
    },
    LotSize {
        qty: u32,
    },
    Standard {
        standard: AqlStandard,
    },
    Defect {
        severity: Severity,
        #[serde(default = "one")]
        delta: i32,
    },
    /// Block until outstanding AQL requests have answered
    AwaitAql,
}

fn one() -> i32 {
    1
}

/// Read an event script (YAML list)
pub fn load_script(path: &Path) -> Result<Vec<ScriptEvent>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    parse_script(&content).with_context(|| format!("Invalid script {}", path.display()))
}

pub fn parse_script(content: &str) -> Result<Vec<ScriptEvent>> {
    Ok(serde_yaml::from_str(content)?)
}

/// How long `await_aql` and the end of a replay wait for workers
pub const WORKER_TIMEOUT: Duration = Duration::from_secs(10);

/// Replays script events against a runtime on a virtual clock
pub struct ScriptRunner {
    now: Instant,
}

impl Default for ScriptRunner {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl ScriptRunner {
    pub fn new(start: Instant) -> Self {
        Self { now: start }
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn run(&mut self, runtime: &mut GridRuntime, events: &[ScriptEvent]) -> Result<()> {
        for (i, event) in events.iter().enumerate() {
            self.step(runtime, event)
                .with_context(|| format!("script event #{} ({:?})", i + 1, event))?;
        }
        runtime.wait_for_workers(WORKER_TIMEOUT);
        Ok(())
    }

    pub fn step(&mut self, runtime: &mut GridRuntime, event: &ScriptEvent) -> Result<()> {
        let msg = match event {
            ScriptEvent::Mount => Msg::Grid(GridMsg::Mount),
            ScriptEvent::Unmount => Msg::Grid(GridMsg::Unmount),
            ScriptEvent::Focus { cell } => Msg::Grid(GridMsg::Focus(*cell)),
            ScriptEvent::Input { cell, text } => Msg::Grid(GridMsg::Input {
                cell: *cell,
                text: text.clone(),
            }),
            ScriptEvent::PointerDown { cell } => Msg::Grid(GridMsg::PointerDown(*cell)),
            ScriptEvent::PointerEnter { cell, buttons_held } => Msg::Grid(GridMsg::PointerEnter {
                cell: *cell,
                buttons_held: *buttons_held,
            }),
            ScriptEvent::PointerUp => Msg::Grid(GridMsg::PointerUp),
            ScriptEvent::TouchStart { cell } => Msg::Grid(GridMsg::TouchStart {
                cell: *cell,
                at: self.now,
            }),
            ScriptEvent::TouchMove => Msg::Grid(GridMsg::TouchMove),
            ScriptEvent::TouchEnd => Msg::Grid(GridMsg::TouchEnd),
            ScriptEvent::Key { cell, key } => Msg::Grid(GridMsg::KeyDown {
                cell: *cell,
                key: *key,
            }),
            ScriptEvent::Paste { cell, text } => Msg::Grid(GridMsg::Paste {
                cell: *cell,
                text: text.clone(),
            }),
            ScriptEvent::ClearSelection => Msg::Grid(GridMsg::ClearSelection),
            ScriptEvent::Wait { ms } => {
                self.now += Duration::from_millis(*ms);
                Msg::Tick(self.now)
            }
            ScriptEvent::SelectTemplate { template } => {
                Msg::Chart(ChartMsg::TemplateSelected(template.clone()))
            }
            ScriptEvent::AddSize {
                name,
                order_qty,
                packed_qty,
            } => Msg::Chart(ChartMsg::SizeAdded {
                name: name.clone(),
                order_qty: *order_qty,
                packed_qty: *packed_qty,
            }),
            ScriptEvent::RenameSize { name, to } => Msg::Chart(ChartMsg::SizeRenamed {
                key: size_key(runtime, name)?,
                name: to.clone(),
            }),
            ScriptEvent::RemoveSize { name } => {
                Msg::Chart(ChartMsg::SizeRemoved(size_key(runtime, name)?))
            }
            ScriptEvent::LotSize { qty } => Msg::Aql(AqlMsg::LotSizeChanged {
                lot_size: *qty,
                at: self.now,
            }),
            ScriptEvent::Standard { standard } => Msg::Aql(AqlMsg::StandardChanged {
                standard: *standard,
                at: self.now,
            }),
            ScriptEvent::Defect { severity, delta } => Msg::Aql(AqlMsg::AdjustDefect {
                severity: *severity,
                delta: *delta,
            }),
            ScriptEvent::AwaitAql => {
                runtime.wait_for_workers(WORKER_TIMEOUT);
                return Ok(());
            }
        };

        runtime.dispatch(msg);
        runtime.drain_completed();
        Ok(())
    }
}

fn size_key(runtime: &GridRuntime, name: &str) -> Result<GroupKey> {
    match runtime.model.chart.size_key(name) {
        Some(key) => Ok(key),
        None => bail!("unknown size '{}'", name),
    }
}
