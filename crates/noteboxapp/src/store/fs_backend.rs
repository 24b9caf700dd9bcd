use super::backend::StorageBackend;
use super::{RecordKind, Table};
use crate::error::{NoteboxError, Result};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn table_path(&self, kind: RecordKind) -> PathBuf {
        self.root.join(format!("{}.json", kind.table_name()))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(NoteboxError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn load_table(&self, kind: RecordKind) -> Result<Table> {
        let path = self.table_path(kind);
        if !path.exists() {
            return Ok(Table::new());
        }
        let content = fs::read_to_string(&path).map_err(NoteboxError::Io)?;
        if content.trim().is_empty() {
            return Ok(Table::new());
        }
        let table: Table = serde_json::from_str(&content).map_err(NoteboxError::Serialization)?;
        Ok(table)
    }

    fn save_table(&self, kind: RecordKind, table: &Table) -> Result<()> {
        self.ensure_dir()?;

        let target = self.table_path(kind);
        let content = serde_json::to_string_pretty(table).map_err(NoteboxError::Serialization)?;

        // Atomic write
        let tmp = self
            .root
            .join(format!(".{}-{}.tmp", kind.table_name(), Uuid::new_v4()));
        fs::write(&tmp, content).map_err(NoteboxError::Io)?;
        fs::rename(&tmp, &target).map_err(NoteboxError::Io)?;

        Ok(())
    }
}
