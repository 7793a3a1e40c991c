//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use qcgrid::config::GridConfig;
use qcgrid::messages::{GridMsg, Msg};
use qcgrid::model::{AppModel, AqlLimits, CellRef, FormVariant, Template, TemplatePom};
use qcgrid::runtime::{AutoConfirm, FixedAqlService, GridRuntime, Haptics};

/// Parse `column:row` (1-based row), e.g. `s1:1`
pub fn cell(addr: &str) -> CellRef {
    addr.parse().expect("valid cell address")
}

/// Template whose POMs all use the given tolerance and standard
pub fn template(names: &[&str], tol: f64, std: f64) -> Template {
    Template {
        id: "tpl".to_string(),
        name: "Test template".to_string(),
        poms: names
            .iter()
            .map(|name| TemplatePom {
                name: name.to_string(),
                default_tol: Some(tol),
                default_std: Some(std),
            })
            .collect(),
    }
}

/// Model with `rows` POMs named P1, P2, ... (tol 0.5, std 10)
pub fn test_model(variant: FormVariant, rows: usize) -> AppModel {
    test_model_with_config(variant, rows, GridConfig::default())
}

pub fn test_model_with_config(variant: FormVariant, rows: usize, config: GridConfig) -> AppModel {
    let names: Vec<String> = (1..=rows).map(|i| format!("P{}", i)).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut model = AppModel::new(variant, config);
    model.chart.apply_template(Some(template(&refs, 0.5, 10.0)));
    model
}

/// Raw text of one cell
pub fn value(model: &AppModel, addr: &str) -> String {
    model
        .chart
        .cell(cell(addr))
        .map(|v| v.raw().to_string())
        .unwrap_or_default()
}

pub fn grid(msg: GridMsg) -> Msg {
    Msg::Grid(msg)
}

/// Haptics that can still be inspected after being boxed into a runtime
#[derive(Debug, Clone, Default)]
pub struct SharedHaptics(pub Rc<RefCell<Vec<u64>>>);

impl Haptics for SharedHaptics {
    fn pulse(&mut self, duration_ms: u64) {
        self.0.borrow_mut().push(duration_ms);
    }
}

/// Runtime that confirms every prompt with `answer`
pub fn runtime_with(model: AppModel, answer: bool) -> (GridRuntime, SharedHaptics) {
    runtime_with_aql(model, answer, None)
}

pub fn runtime_with_aql(
    model: AppModel,
    answer: bool,
    limits: Option<AqlLimits>,
) -> (GridRuntime, SharedHaptics) {
    let haptics = SharedHaptics::default();
    let runtime = GridRuntime::new(
        model,
        Box::new(AutoConfirm(answer)),
        Box::new(haptics.clone()),
        Arc::new(FixedAqlService { limits }),
    );
    (runtime, haptics)
}
