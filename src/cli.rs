//! Command-line argument parsing
//!
//! Subcommands work on a chart file (JSON or YAML):
//! - `replay` - drive a scripted sequence of grid events
//! - `check` - report out-of-tolerance cells
//! - `paste` - import a tab-separated block
//! - `payload` - print the submission JSON

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::GridConfig;
use crate::model::CellRef;

/// Measurement grid engine for QC inspection forms
#[derive(Parser, Debug)]
#[command(name = "qcgrid", version, about = "Measurement grid engine for QC forms")]
pub struct CliArgs {
    /// Config file to use instead of ~/.config/qcgrid/config.yaml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Replay an event script against a chart and print the result
    Replay {
        chart: PathBuf,
        script: PathBuf,
        /// Print the submission payload after the grid
        #[arg(long)]
        payload: bool,
    },
    /// List out-of-tolerance cells and failing rows
    Check { chart: PathBuf },
    /// Paste a tab-separated block into the grid
    Paste {
        chart: PathBuf,
        /// Top-left cell, e.g. s1:1
        #[arg(long, value_name = "CELL")]
        at: CellRef,
        /// Read the block from a file instead of the clipboard
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
        /// Skip the overwrite confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Print the submission payload as JSON
    Payload { chart: PathBuf },
}

impl CliArgs {
    /// Load the config named on the command line, or the default one
    pub fn load_config(&self) -> GridConfig {
        match &self.config {
            Some(path) => GridConfig::load_from(path),
            None => GridConfig::load(),
        }
    }
}
