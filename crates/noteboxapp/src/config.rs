//! # Configuration
//!
//! Notebox configuration is managed by [`clapfig`], which handles layered
//! loading from TOML files.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Data dir config**: `<data dir>/notebox.toml`, next to the tables.
//! 2. **User config**: `notebox.toml` in the OS config directory.
//! 3. **Compiled defaults**: built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `root_name` | `My Documents` | Name given to the root folder when a store is first seeded |
//! | `save_debounce_ms` | `500` | Quiet period before an edited file is written |
//! | `default_strategy` | `skip` | Merge strategy for `notebox import` when none is given |

use crate::model::{MergeStrategy, DEFAULT_ROOT_NAME};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for notebox, stored in `notebox.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct NoteboxConfig {
    /// Name of the root folder on first run. Renaming it later is done on the
    /// folder itself, not here.
    #[config(default = "My Documents")]
    pub root_name: String,

    /// Milliseconds of inactivity before an edited file is saved.
    #[config(default = 500)]
    pub save_debounce_ms: u64,

    /// One of "overwrite", "skip" or "duplicate" ("prompt" is read as "duplicate").
    #[config(default = "skip")]
    pub default_strategy: String,
}

impl Default for NoteboxConfig {
    fn default() -> Self {
        Self {
            root_name: DEFAULT_ROOT_NAME.to_string(),
            save_debounce_ms: 500,
            default_strategy: "skip".to_string(),
        }
    }
}

impl NoteboxConfig {
    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }

    /// The configured strategy, falling back to `skip` for an unknown label.
    pub fn default_strategy(&self) -> MergeStrategy {
        self.default_strategy.parse().unwrap_or_else(|e| {
            log::warn!("{}; using skip", e);
            MergeStrategy::Skip
        })
    }
}
