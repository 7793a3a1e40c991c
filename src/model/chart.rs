//! Measurement chart: the row model behind the grid
//!
//! Rows are derived from the selected template and, for the by-size
//! variant, the sizing table. Every size owns one row per template POM
//! through its [`GroupKey`]; changing the template or the size list adds and
//! removes rows so that invariant holds while values typed into surviving
//! (size, POM) pairs are kept.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::columns::{CellRef, ColumnLayout, FormVariant};
use super::row::{GroupKey, MeasurementRow, SampleValue};

/// One point of measure as served by the templates endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplatePom {
    pub name: String,
    #[serde(default)]
    pub default_tol: Option<f64>,
    #[serde(default)]
    pub default_std: Option<f64>,
}

/// A reusable named set of POMs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub poms: Vec<TemplatePom>,
}

/// A line of the sizing table (quantity breakdown)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeRow {
    pub key: GroupKey,
    pub name: String,
    #[serde(default)]
    pub order_qty: u32,
    #[serde(default)]
    pub packed_qty: u32,
}

/// Packed quantity deviating from the order by more than this is flagged
pub const SIZE_DEVIATION_LIMIT_PERCENT: f64 = 5.0;

impl SizeRow {
    /// `(packed - order) / order` in percent; `None` without an order qty
    pub fn deviation_percent(&self) -> Option<f64> {
        if self.order_qty == 0 {
            return None;
        }
        let diff = self.packed_qty as f64 - self.order_qty as f64;
        Some(diff / self.order_qty as f64 * 100.0)
    }

    pub fn is_high_deviation(&self) -> bool {
        self.deviation_percent()
            .is_some_and(|d| d.abs() > SIZE_DEVIATION_LIMIT_PERCENT)
    }
}

#[derive(Debug, Clone)]
pub struct Chart {
    variant: FormVariant,
    layout: ColumnLayout,
    template: Option<Template>,
    sizes: Vec<SizeRow>,
    rows: Vec<MeasurementRow>,
    next_group_key: u64,
}

impl Chart {
    pub fn new(variant: FormVariant) -> Self {
        Self {
            variant,
            layout: variant.layout(),
            template: None,
            sizes: Vec::new(),
            rows: Vec::new(),
            next_group_key: 1,
        }
    }

    pub fn variant(&self) -> FormVariant {
        self.variant
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    pub fn template(&self) -> Option<&Template> {
        self.template.as_ref()
    }

    pub fn sizes(&self) -> &[SizeRow] {
        &self.sizes
    }

    pub fn rows(&self) -> &[MeasurementRow] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, index: usize) -> Option<&MeasurementRow> {
        self.rows.get(index)
    }

    pub fn size_name(&self, key: GroupKey) -> Option<&str> {
        self.sizes
            .iter()
            .find(|s| s.key == key)
            .map(|s| s.name.as_str())
    }

    pub fn size_key(&self, name: &str) -> Option<GroupKey> {
        self.sizes.iter().find(|s| s.name == name).map(|s| s.key)
    }

    pub fn cell(&self, cell: CellRef) -> Option<&SampleValue> {
        if !self.layout.contains(cell.column) {
            return None;
        }
        self.rows.get(cell.row)?.cell(cell.column)
    }

    /// Set one field of one row; returns true if the value changed.
    /// Cells outside the grid or in read-only columns are ignored.
    pub fn set_cell(&mut self, cell: CellRef, text: &str) -> bool {
        if !self.layout.contains(cell.column) {
            return false;
        }
        self.rows
            .get_mut(cell.row)
            .and_then(|row| row.cell_mut(cell.column))
            .is_some_and(|value| value.set(text))
    }

    /// Replace the whole row list, normalising each row to the layout
    pub fn replace_rows(&mut self, mut rows: Vec<MeasurementRow>) {
        let count = self.layout.sample_count();
        for row in &mut rows {
            row.resize_samples(count);
        }
        self.rows = rows;
    }

    /// Install a saved record as-is (editing an existing inspection)
    ///
    /// Rows are not reconciled against the template, so values stored on
    /// the server are shown exactly as saved.
    pub fn load_record(
        &mut self,
        template: Option<Template>,
        sizes: Vec<SizeRow>,
        rows: Vec<MeasurementRow>,
    ) {
        self.next_group_key = sizes
            .iter()
            .map(|s| s.key.0 + 1)
            .max()
            .unwrap_or(1)
            .max(self.next_group_key);
        self.template = template;
        self.sizes = sizes;
        self.replace_rows(rows);
    }

    /// Select a template (or none) and rebuild the rows for it
    pub fn apply_template(&mut self, template: Option<Template>) {
        self.template = template;
        self.reconcile();
    }

    /// Append a size and give it a fresh group key
    pub fn add_size(&mut self, name: impl Into<String>, order_qty: u32, packed_qty: u32) -> GroupKey {
        let key = GroupKey(self.next_group_key);
        self.next_group_key += 1;
        self.sizes.push(SizeRow {
            key,
            name: name.into(),
            order_qty,
            packed_qty,
        });
        self.reconcile();
        key
    }

    /// Rename a size; rows stay attached through the unchanged key
    pub fn rename_size(&mut self, key: GroupKey, name: impl Into<String>) -> bool {
        match self.sizes.iter_mut().find(|s| s.key == key) {
            Some(size) => {
                size.name = name.into();
                true
            }
            None => false,
        }
    }

    pub fn set_size_quantities(&mut self, key: GroupKey, order_qty: u32, packed_qty: u32) -> bool {
        match self.sizes.iter_mut().find(|s| s.key == key) {
            Some(size) => {
                size.order_qty = order_qty;
                size.packed_qty = packed_qty;
                true
            }
            None => false,
        }
    }

    pub fn remove_size(&mut self, key: GroupKey) -> bool {
        let before = self.sizes.len();
        self.sizes.retain(|s| s.key != key);
        if self.sizes.len() == before {
            return false;
        }
        self.reconcile();
        true
    }

    /// Rebuild rows as sizes × template POMs, carrying over entered values
    fn reconcile(&mut self) {
        let Some(template) = &self.template else {
            self.rows.clear();
            return;
        };

        let groups: Vec<Option<GroupKey>> = if self.variant.grouped_by_size() {
            self.sizes.iter().map(|s| Some(s.key)).collect()
        } else {
            vec![None]
        };

        // Keyed by (group, POM name, occurrence) so templates that repeat a
        // POM name still map each row to its own predecessor.
        let mut existing: HashMap<(Option<GroupKey>, String, usize), MeasurementRow> =
            HashMap::new();
        let mut seen: HashMap<(Option<GroupKey>, String), usize> = HashMap::new();
        for row in self.rows.drain(..) {
            let n = seen.entry((row.group_key, row.pom_name.clone())).or_insert(0);
            existing.insert((row.group_key, row.pom_name.clone(), *n), row);
            *n += 1;
        }

        let sample_count = self.layout.sample_count();
        let spec_editable = self.variant.spec_editable();
        let mut rows = Vec::with_capacity(groups.len() * template.poms.len());

        for group in groups {
            let mut occurrences: HashMap<&str, usize> = HashMap::new();
            for pom in &template.poms {
                let n = occurrences.entry(pom.name.as_str()).or_insert(0);
                let previous = existing.remove(&(group, pom.name.clone(), *n));
                *n += 1;

                let mut row =
                    MeasurementRow::new(&pom.name, pom.default_tol, pom.default_std, sample_count);
                row.group_key = group;
                if let Some(previous) = previous {
                    row.samples = previous.samples;
                    row.resize_samples(sample_count);
                    if spec_editable && !previous.spec.is_blank() {
                        row.spec = previous.spec;
                    }
                }
                rows.push(row);
            }
        }

        tracing::debug!(
            target: "chart",
            rows = rows.len(),
            dropped = existing.len(),
            "reconciled measurement rows"
        );
        self.rows = rows;
    }
}
