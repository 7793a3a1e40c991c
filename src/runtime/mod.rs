//! Runtime - executes commands against host collaborators
//!
//! - `driver` - message loop, prompt answers and AQL workers
//! - `platform` - clipboard, haptics, prompt and AQL service traits

pub mod driver;
pub mod platform;

pub use driver::{Dispatch, GridRuntime, Notice};
pub use platform::{
    AqlService, AutoConfirm, Clipboard, FixedAqlService, Haptics, NoHaptics, Prompt,
    SystemClipboard,
};
