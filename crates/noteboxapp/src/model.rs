//! # Data Model
//!
//! Three record kinds live in the store:
//!
//! - [`Folder`]: a node of the folder tree. `parent_id` is `None` only for the
//!   root folder, whose id is [`ROOT_FOLDER_ID`].
//! - [`File`]: a markdown note owned by exactly one folder.
//! - [`AppState`]: the singleton (id [`APP_STATE_ID`]) holding the current
//!   selection and opaque UI settings.
//!
//! Ids are strings rather than `Uuid`s: the root folder uses a fixed, readable id
//! and imported payloads may carry ids minted by other stores. Fresh ids are v4
//! UUIDs rendered as strings.
//!
//! Field names serialize in camelCase and timestamps as epoch milliseconds, which
//! is the shape of the JSON export file.

use crate::store::{Record, RecordKind};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const ROOT_FOLDER_ID: &str = "root";
pub const APP_STATE_ID: &str = "current";
pub const DEFAULT_ROOT_NAME: &str = "My Documents";
pub const EXPORT_VERSION: &str = "1.0";

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current time at the millisecond precision the records are persisted with.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    pub fn new(name: impl Into<String>, parent_id: impl Into<String>) -> Self {
        let now = now();
        Self {
            id: new_id(),
            name: name.into(),
            parent_id: Some(parent_id.into()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn root(name: impl Into<String>) -> Self {
        let now = now();
        Self {
            id: ROOT_FOLDER_ID.to_string(),
            name: name.into(),
            parent_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_root(&self) -> bool {
        self.id == ROOT_FOLDER_ID
    }

    pub fn touch(&mut self) {
        self.updated_at = now();
    }
}

impl Record for Folder {
    const KIND: RecordKind = RecordKind::Folder;

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub id: String,
    pub name: String,
    pub content: String,
    pub folder_id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl File {
    pub fn new(
        name: impl Into<String>,
        folder_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let now = now();
        Self {
            id: new_id(),
            name: name.into(),
            content: content.into(),
            folder_id: folder_id.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = now();
    }
}

impl Record for File {
    const KIND: RecordKind = RecordKind::File;

    fn id(&self) -> &str {
        &self.id
    }
}

/// View-layer settings. Persisted with the app state, never interpreted by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiSettings {
    pub sidebar_width: u32,
    pub preview_enabled: bool,
    pub dark_mode: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            sidebar_width: 250,
            preview_enabled: true,
            dark_mode: false,
        }
    }
}

/// Partial update for [`UiSettings`]; `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiSettingsPatch {
    pub sidebar_width: Option<u32>,
    pub preview_enabled: Option<bool>,
    pub dark_mode: Option<bool>,
}

impl UiSettings {
    pub fn apply(&mut self, patch: &UiSettingsPatch) {
        if let Some(width) = patch.sidebar_width {
            self.sidebar_width = width;
        }
        if let Some(preview) = patch.preview_enabled {
            self.preview_enabled = preview;
        }
        if let Some(dark) = patch.dark_mode {
            self.dark_mode = dark;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub id: String,
    pub active_file_id: Option<String>,
    pub active_folder_id: Option<String>,
    #[serde(default)]
    pub ui_settings: UiSettings,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            id: APP_STATE_ID.to_string(),
            active_file_id: None,
            active_folder_id: Some(ROOT_FOLDER_ID.to_string()),
            ui_settings: UiSettings::default(),
        }
    }
}

impl Record for AppState {
    const KIND: RecordKind = RecordKind::AppState;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Every folder and file as currently persisted. Parent/child assembly is left
/// to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeListing {
    pub folders: Vec<Folder>,
    pub files: Vec<File>,
}

/// The portable export document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub version: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub exported_at: DateTime<Utc>,
    pub folders: Vec<Folder>,
    pub files: Vec<File>,
}

/// How an import resolves a `(name, parent)` collision with an existing entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// Update the matched entity in place.
    Overwrite,
    /// Leave the matched entity alone and reuse it.
    Skip,
    /// Create a sibling named `"<name> (imported)"`. Older payload tooling
    /// called this `prompt`.
    #[serde(alias = "prompt")]
    Duplicate,
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MergeStrategy::Overwrite => "overwrite",
            MergeStrategy::Skip => "skip",
            MergeStrategy::Duplicate => "duplicate",
        };
        f.write_str(label)
    }
}

impl FromStr for MergeStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(MergeStrategy::Overwrite),
            "skip" => Ok(MergeStrategy::Skip),
            "duplicate" | "prompt" => Ok(MergeStrategy::Duplicate),
            other => Err(format!(
                "Unknown merge strategy '{}' (expected overwrite, skip or duplicate)",
                other
            )),
        }
    }
}

/// Outcome of an import. Counters measure entities processed, including
/// `skip` matches, not entities newly created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub success: bool,
    pub folders_imported: usize,
    pub files_imported: usize,
    pub errors: Vec<String>,
}

impl ImportResult {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            folders_imported: 0,
            files_imported: 0,
            errors: vec![error.into()],
        }
    }
}
