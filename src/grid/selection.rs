//! Rectangular and toggled cell selection
//!
//! A drag records an anchor and replaces the region with the rectangle
//! spanning anchor and pointer. Long-press toggles add or remove single
//! cells without touching the rest of the region, which gives touch users
//! discontinuous selection.

use std::collections::HashSet;

use crate::model::columns::{CellRef, ColumnKey, ColumnLayout};

#[derive(Debug, Clone)]
pub struct SelectionEngine {
    layout: ColumnLayout,
    cells: HashSet<CellRef>,
    /// (row, column index) where the current drag started
    anchor: Option<(usize, usize)>,
    in_progress: bool,
}

impl SelectionEngine {
    pub fn new(layout: ColumnLayout) -> Self {
        Self {
            layout,
            cells: HashSet::new(),
            anchor: None,
            in_progress: false,
        }
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Start a drag: the region becomes the single given cell
    pub fn begin_selection(&mut self, row: usize, column: ColumnKey) {
        let Some(col) = self.layout.index_of(column) else {
            tracing::debug!(target: "selection", %column, "begin ignored: column not in layout");
            return;
        };
        self.cells.clear();
        self.cells.insert(CellRef::new(row, column));
        self.anchor = Some((row, col));
        self.in_progress = true;
    }

    /// Grow the region to the rectangle between the anchor and this cell
    pub fn extend_selection(&mut self, row: usize, column: ColumnKey) {
        if !self.in_progress {
            return;
        }
        let (Some((anchor_row, anchor_col)), Some(col)) =
            (self.anchor, self.layout.index_of(column))
        else {
            return;
        };

        let (row_min, row_max) = (anchor_row.min(row), anchor_row.max(row));
        let (col_min, col_max) = (anchor_col.min(col), anchor_col.max(col));

        self.cells.clear();
        for r in row_min..=row_max {
            for key in &self.layout.keys()[col_min..=col_max] {
                self.cells.insert(CellRef::new(r, *key));
            }
        }
    }

    /// Finish the drag; the region stays so it can still be acted on
    pub fn end_selection(&mut self) {
        self.in_progress = false;
    }

    /// Add the cell if absent, remove it if present
    pub fn toggle_cell(&mut self, row: usize, column: ColumnKey) {
        if !self.layout.contains(column) {
            return;
        }
        let cell = CellRef::new(row, column);
        if !self.cells.remove(&cell) {
            self.cells.insert(cell);
        }
    }

    pub fn is_selected(&self, row: usize, column: ColumnKey) -> bool {
        self.cells.contains(&CellRef::new(row, column))
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress
    }

    pub fn anchor(&self) -> Option<CellRef> {
        let (row, col) = self.anchor?;
        Some(CellRef::new(row, self.layout.key_at(col)?))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Selected cells in row-major order
    pub fn cells(&self) -> Vec<CellRef> {
        let mut cells: Vec<CellRef> = self.cells.iter().copied().collect();
        cells.sort_by_key(|c| (c.row, self.layout.index_of(c.column)));
        cells
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.anchor = None;
        self.in_progress = false;
    }
}
