//! Application model - the complete state of the grid
//!
//! Follows the Elm Architecture: everything the update functions touch
//! lives here, and only `update` mutates it.

pub mod aql;
pub mod chart;
pub mod columns;
pub mod grid;
pub mod row;

pub use aql::{
    AqlLimits, AqlRequest, AqlStandard, AqlState, DefectTally, InspectionResult, Severity,
};
pub use chart::{Chart, SizeRow, Template, TemplatePom};
pub use columns::{CellRef, ColumnKey, ColumnLayout, FormVariant};
pub use grid::{GridState, LongPress};
pub use row::{GroupKey, MeasurementRow, RowStatus, SampleValue};

use crate::config::GridConfig;
use crate::grid::{PasteImporter, ToleranceRule};

#[derive(Debug, Clone)]
pub struct AppModel {
    pub chart: Chart,
    pub grid: GridState,
    pub aql: AqlState,
    pub config: GridConfig,
    /// Built from `config` once; used on every render
    pub tolerance: ToleranceRule,
    pub importer: PasteImporter,
}

impl AppModel {
    pub fn new(variant: FormVariant, config: GridConfig) -> Self {
        let chart = Chart::new(variant);
        let grid = GridState::new(chart.layout().clone());
        Self {
            tolerance: config.tolerance_rule(),
            importer: config.paste_importer(),
            chart,
            grid,
            aql: AqlState::default(),
            config,
        }
    }

    /// True when `cell` names an existing row and a column of the layout
    pub fn contains_cell(&self, cell: CellRef) -> bool {
        cell.row < self.chart.row_count() && self.chart.layout().contains(cell.column)
    }

    /// Out-of-tolerance flag for one rendered cell
    pub fn is_cell_out(&self, cell: CellRef) -> bool {
        let Some(row) = self.chart.row(cell.row) else {
            return false;
        };
        match cell.column {
            ColumnKey::Spec => false,
            ColumnKey::Sample(_) => row.cell(cell.column).is_some_and(|value| {
                self.tolerance
                    .is_out_sample(value, row.spec.number(), row.tolerance)
            }),
        }
    }

    /// Checks run after every update in debug builds
    #[cfg(debug_assertions)]
    pub fn assert_invariants_with_context(&self, context: &str) {
        let rows = self.chart.row_count();
        for cell in self.grid.selection.cells() {
            debug_assert!(
                cell.row < rows,
                "[{}] selected cell {} is outside the {} row(s)",
                context,
                cell,
                rows
            );
        }
        if let Some(focus) = self.grid.focus {
            debug_assert!(
                self.contains_cell(focus),
                "[{}] focused cell {} is outside the grid",
                context,
                focus
            );
        }
    }
}
