//! Runtime configuration for the battle worker and the demo binary.
//!
//! Loaded from a RON file; every field has a default so an empty `()` file is
//! a valid configuration.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Seed for battle setup shuffles and confusion slot picks. `None` draws from the OS.
    pub seed: Option<u64>,
    /// Capacity of the worker's command queue.
    pub command_buffer: usize,
    /// Move catalog to load instead of the built-in one.
    pub catalog_path: Option<PathBuf>,
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Upper bound on turns the demo loop will drive.
    pub max_turns: u32,
    /// Print the final roster records as JSON once the battle ends.
    pub print_outcome_json: bool,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            seed: None,
            command_buffer: 16,
            catalog_path: None,
            log_filter: "info".to_string(),
            max_turns: 200,
            print_outcome_json: false,
        }
    }
}

impl BattleConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&source)
    }
}
