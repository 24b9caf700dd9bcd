//! # Data Directory and Startup
//!
//! Everything lives in a single data directory: the three table files and an
//! optional `notebox.toml`.
//!
//! ## Resolution
//!
//! [`resolve_data_dir`] picks the directory in this order:
//! 1. An explicit override (the CLI's `--data` flag).
//! 2. The `NOTEBOX_DATA` environment variable. Tests use it to isolate state.
//! 3. The OS data directory (via the `directories` crate).
//!
//! [`initialize`] then loads configuration, opens the [`FileStore`] and seeds
//! it with the configured root folder name if it is new.

use crate::api::NoteboxApi;
use crate::config::NoteboxConfig;
use crate::error::{NoteboxError, Result};
use crate::store::fs::FileStore;
use clapfig::{Clapfig, SearchMode, SearchPath};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub const DATA_ENV: &str = "NOTEBOX_DATA";
pub const CONFIG_FILE: &str = "notebox.toml";

pub struct NoteboxContext {
    pub api: NoteboxApi<FileStore>,
    pub config: NoteboxConfig,
    pub data_dir: PathBuf,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "notebox", "notebox")
}

pub fn resolve_data_dir(data_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = data_override {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os(DATA_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| NoteboxError::Store("Could not determine data directory".to_string()))
}

/// Load `notebox.toml` from the user config dir and the data dir, the latter
/// taking precedence. Missing or unreadable files fall back to defaults.
pub fn load_config(data_dir: &Path) -> NoteboxConfig {
    let mut search_paths = Vec::new();
    if let Some(dirs) = project_dirs() {
        search_paths.push(SearchPath::Path(dirs.config_dir().to_path_buf()));
    }
    search_paths.push(SearchPath::Path(data_dir.to_path_buf()));

    let config: NoteboxConfig = Clapfig::builder()
        .app_name("notebox")
        .file_name(CONFIG_FILE)
        .search_paths(search_paths)
        .search_mode(SearchMode::Merge)
        .load()
        .unwrap_or_default();
    config
}

pub fn initialize(data_override: Option<PathBuf>) -> Result<NoteboxContext> {
    let data_dir = resolve_data_dir(data_override)?;
    let config = load_config(&data_dir);
    log::debug!("Using data directory {}", data_dir.display());

    let store = FileStore::new_fs(data_dir.clone())?;
    let api = NoteboxApi::new(store, config.root_name.clone())?;

    Ok(NoteboxContext {
        api,
        config,
        data_dir,
    })
}
