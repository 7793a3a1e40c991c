//! Message types for the Elm-style architecture
//!
//! Host events (pointer, touch, keyboard, clipboard), form-level changes and
//! asynchronous results all arrive as a [`Msg`].

use std::time::Instant;

use serde::Deserialize;

use crate::model::{
    AqlLimits, AqlStandard, CellRef, GroupKey, MeasurementRow, Severity, SizeRow, Template,
};

/// Keys the grid reacts to; anything else keeps native behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridKey {
    Enter,
    Backspace,
    Delete,
    Other,
}

/// Events raised by the grid's cells and the document around it
#[derive(Debug, Clone)]
pub enum GridMsg {
    /// Grid shown; install global listeners
    Mount,
    /// Grid removed; release global listeners
    Unmount,
    /// A cell input received focus
    Focus(CellRef),
    /// Text typed into a cell
    Input { cell: CellRef, text: String },
    /// Mouse button pressed on a cell
    PointerDown(CellRef),
    /// Pointer entered a cell; `buttons_held` mirrors the event's button mask
    PointerEnter { cell: CellRef, buttons_held: bool },
    /// Mouse button released anywhere in the document
    PointerUp,
    TouchStart { cell: CellRef, at: Instant },
    TouchMove,
    TouchEnd,
    KeyDown { cell: CellRef, key: GridKey },
    /// Clipboard text pasted into a cell
    Paste { cell: CellRef, text: String },
    /// Answer to the overwrite prompt of a pending paste
    PasteConfirmed(bool),
    /// Answer to the bulk-clear prompt
    ClearConfirmed(bool),
    ClearSelection,
}

/// Form-level changes to the row model
#[derive(Debug, Clone)]
pub enum ChartMsg {
    /// User picked a template (or cleared it)
    TemplateSelected(Option<Template>),
    /// Existing record opened for editing; rows are shown as saved
    RecordLoaded {
        template: Option<Template>,
        sizes: Vec<SizeRow>,
        rows: Vec<MeasurementRow>,
    },
    SizeAdded {
        name: String,
        order_qty: u32,
        packed_qty: u32,
    },
    SizeRenamed { key: GroupKey, name: String },
    SizeQuantitiesChanged {
        key: GroupKey,
        order_qty: u32,
        packed_qty: u32,
    },
    SizeRemoved(GroupKey),
    /// Host replaced the whole row list
    RowsReplaced(Vec<MeasurementRow>),
}

/// AQL scheduling and results
#[derive(Debug, Clone)]
pub enum AqlMsg {
    LotSizeChanged { lot_size: u32, at: Instant },
    StandardChanged { standard: AqlStandard, at: Instant },
    /// Worker finished the request with this sequence number
    Completed {
        seq: u64,
        result: Result<AqlLimits, String>,
    },
    AdjustDefect { severity: Severity, delta: i32 },
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    Grid(GridMsg),
    Chart(ChartMsg),
    Aql(AqlMsg),
    /// Clock tick; drives the long-press timer and the AQL debounce
    Tick(Instant),
}
