//! Grid interaction engines
//!
//! Pure building blocks used by the update functions: selection region,
//! Enter navigation, paste-matrix import and tolerance evaluation.

pub mod navigation;
pub mod paste;
pub mod selection;
pub mod tolerance;

pub use navigation::next_on_enter;
pub use paste::{is_matrix_paste, PasteImporter, PasteMatrix, PastePlan};
pub use selection::SelectionEngine;
pub use tolerance::{is_out_of_tolerance, ToleranceRule};
