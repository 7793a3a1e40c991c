//! Grid configuration persistence
//!
//! Stored in `~/.config/qcgrid/config.yaml`. Every field has a default, so
//! a partial file only overrides what it names.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::grid::paste::PasteImporter;
use crate::grid::tolerance::{ToleranceRule, DEFAULT_EPSILON};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Hold time before a touch toggles a cell
    pub long_press_ms: u64,
    /// Quiet period before an AQL recalculation is sent
    pub aql_debounce_ms: u64,
    /// Slack added to every tolerance comparison
    pub tolerance_epsilon: f64,
    /// Ask before Backspace/Delete clears a multi-cell selection
    pub confirm_bulk_clear: bool,
    pub haptic_pulse_ms: u64,
    /// Additional header captions recognised by the paste importer
    pub extra_header_labels: Vec<String>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            long_press_ms: 500,
            aql_debounce_ms: 500,
            tolerance_epsilon: DEFAULT_EPSILON,
            confirm_bulk_clear: true,
            haptic_pulse_ms: 50,
            extra_header_labels: Vec::new(),
        }
    }
}

impl GridConfig {
    /// Load config from the default location, or return defaults
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`; a missing or broken file yields defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }

    pub fn aql_debounce(&self) -> Duration {
        Duration::from_millis(self.aql_debounce_ms)
    }

    pub fn tolerance_rule(&self) -> ToleranceRule {
        ToleranceRule::new(self.tolerance_epsilon)
    }

    pub fn paste_importer(&self) -> PasteImporter {
        PasteImporter::with_extra_labels(&self.extra_header_labels)
    }
}
