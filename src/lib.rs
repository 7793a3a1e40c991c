//! qcgrid - spreadsheet-like measurement grid for QC inspection forms
//!
//! The grid follows the Elm Architecture: host events become [`Msg`]s,
//! [`update::update`] mutates the [`AppModel`] and returns a [`Cmd`], and the
//! [`runtime`] executes commands against the host's collaborators.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod grid;
pub mod messages;
pub mod model;
pub mod payload;
pub mod render;
pub mod runtime;
pub mod script;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::GridConfig;
pub use messages::Msg;
pub use model::AppModel;
