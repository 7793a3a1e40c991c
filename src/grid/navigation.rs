//! Enter-key navigation
//!
//! Enter fills down a column: it moves to the next row, and after the last
//! row wraps to the top of the next column. Past the last column it stays.

use crate::model::columns::{CellRef, ColumnLayout};

/// Destination of Enter from `from`, or `None` when there is nowhere to go
pub fn next_on_enter(layout: &ColumnLayout, row_count: usize, from: CellRef) -> Option<CellRef> {
    let col = layout.index_of(from.column)?;
    if row_count == 0 {
        return None;
    }

    if from.row + 1 < row_count {
        return Some(CellRef::new(from.row + 1, from.column));
    }

    let next_column = layout.key_at(col + 1)?;
    Some(CellRef::new(0, next_column))
}
