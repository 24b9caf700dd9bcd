//! # Storage Layer
//!
//! A small key-value store with secondary indexes, holding three record kinds:
//! folders, files and the singleton app state. The [`DataStore`] trait is the
//! contract the command layer programs against.
//!
//! ## Split Architecture
//!
//! Storage is split in two, the same way for every backend:
//!
//! 1. [`backend::StorageBackend`]: raw table I/O. One table per [`RecordKind`],
//!    each a JSON object keyed by record id. Knows nothing about indexes.
//! 2. [`record_store::RecordStore`]: the engine. Holds every table in memory,
//!    maintains the secondary indexes incrementally and writes each mutation
//!    through to the backend before acknowledging it.
//!
//! ## Operations
//!
//! | Operation | Notes |
//! |-----------|-------|
//! | `get(id)` | `Ok(None)` for a missing key, never an error |
//! | `get_all()` | full scan of one kind |
//! | `get_all_by_index(index, value)` | [`IndexName::ByParent`] for folders, [`IndexName::ByFolder`] for files |
//! | `put(record)` | insert-or-replace keyed by `id` |
//! | `delete(id)` | removing a missing key is a no-op |
//!
//! Each `put`/`delete` is atomic on its own. Nothing spans records: a cascading
//! delete or an import is a sequence of independent writes, and a failure part
//! way through leaves whatever was already written. `commands::doctor` is the
//! recovery path for that.
//!
//! ## Seeding
//!
//! [`DataStore::init`] inserts the root folder and the default app state when
//! they are missing. Running it on an already seeded store changes nothing.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: `RecordStore<FsBackend>`, one JSON file per kind.
//! - [`memory::InMemoryStore`]: `RecordStore<MemBackend>`, for tests.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── folders.json        # {"<id>": Folder, ...}
//! ├── files.json          # {"<id>": File, ...}
//! ├── app_state.json      # {"current": AppState}
//! └── notebox.toml        # Configuration
//! ```

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub mod backend;
pub mod fs;
pub mod fs_backend;
pub mod mem_backend;
pub mod memory;
pub mod record_store;

/// One table: record id to the record's JSON form.
pub type Table = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    Folder,
    File,
    AppState,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [RecordKind::Folder, RecordKind::File, RecordKind::AppState];

    /// Name of the table backing this kind.
    pub fn table_name(&self) -> &'static str {
        match self {
            RecordKind::Folder => "folders",
            RecordKind::File => "files",
            RecordKind::AppState => "app_state",
        }
    }

    pub fn indexes(&self) -> &'static [IndexName] {
        match self {
            RecordKind::Folder => &[IndexName::ByParent],
            RecordKind::File => &[IndexName::ByFolder],
            RecordKind::AppState => &[],
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecordKind::Folder => "Folder",
            RecordKind::File => "File",
            RecordKind::AppState => "App state",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndexName {
    /// Folders by `parent_id`.
    ByParent,
    /// Files by `folder_id`.
    ByFolder,
}

impl IndexName {
    pub fn kind(&self) -> RecordKind {
        match self {
            IndexName::ByParent => RecordKind::Folder,
            IndexName::ByFolder => RecordKind::File,
        }
    }

    /// The serialized field an index keys on. Records whose field is missing or
    /// null (the root folder's `parentId`) are left out of the index.
    pub fn field(&self) -> &'static str {
        match self {
            IndexName::ByParent => "parentId",
            IndexName::ByFolder => "folderId",
        }
    }
}

impl fmt::Display for IndexName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexName::ByParent => f.write_str("by-parent"),
            IndexName::ByFolder => f.write_str("by-folder"),
        }
    }
}

/// A value that can live in the store.
pub trait Record: Serialize + DeserializeOwned {
    const KIND: RecordKind;

    fn id(&self) -> &str;
}

/// Abstract interface for record storage.
///
/// Implementations must keep secondary indexes consistent with the records
/// after every `put` and `delete`.
pub trait DataStore {
    /// Seed the root folder and the default app state if they are missing.
    fn init(&mut self, root_name: &str) -> Result<()>;

    /// Point lookup. A missing key is `Ok(None)`.
    fn get<R: Record>(&self, id: &str) -> Result<Option<R>>;

    /// Every record of one kind.
    fn get_all<R: Record>(&self) -> Result<Vec<R>>;

    /// Every record of one kind filed under `value` in `index`.
    fn get_all_by_index<R: Record>(&self, index: IndexName, value: &str) -> Result<Vec<R>>;

    /// Insert or replace, keyed by the record's id.
    fn put<R: Record>(&mut self, record: &R) -> Result<()>;

    /// Remove a record. Removing a missing key succeeds.
    fn delete<R: Record>(&mut self, id: &str) -> Result<()>;
}
