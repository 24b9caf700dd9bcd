use super::backend::StorageBackend;
use super::{DataStore, IndexName, Record, RecordKind, Table};
use crate::error::{NoteboxError, Result};
use crate::model::{AppState, Folder, APP_STATE_ID, ROOT_FOLDER_ID};
use std::collections::{BTreeSet, HashMap};

/// Secondary index: index value -> ids of the records filed under it.
/// The reverse map lets a re-put drop the record's old entry without
/// rescanning the table.
#[derive(Debug, Default)]
struct SecondaryIndex {
    by_value: HashMap<String, BTreeSet<String>>,
    by_record: HashMap<String, String>,
}

impl SecondaryIndex {
    fn insert(&mut self, record_id: &str, value: &str) {
        self.remove(record_id);
        self.by_value
            .entry(value.to_string())
            .or_default()
            .insert(record_id.to_string());
        self.by_record
            .insert(record_id.to_string(), value.to_string());
    }

    fn remove(&mut self, record_id: &str) {
        if let Some(old) = self.by_record.remove(record_id) {
            if let Some(ids) = self.by_value.get_mut(&old) {
                ids.remove(record_id);
                if ids.is_empty() {
                    self.by_value.remove(&old);
                }
            }
        }
    }

    fn lookup(&self, value: &str) -> Vec<String> {
        self.by_value
            .get(value)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default()
    }
}

/// The key-value engine: every table held in memory, indexes maintained on
/// each write, each write persisted through the backend before it is visible.
pub struct RecordStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
    tables: HashMap<RecordKind, Table>,
    indexes: HashMap<IndexName, SecondaryIndex>,
}

impl<B: StorageBackend> RecordStore<B> {
    /// Wrap a backend without reading it. Use for backends known to be empty.
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            tables: HashMap::new(),
            indexes: HashMap::new(),
        }
    }

    /// Wrap a backend and load every table from it, rebuilding the indexes.
    pub fn open(backend: B) -> Result<Self> {
        let mut store = Self::with_backend(backend);
        store.reload()?;
        Ok(store)
    }

    /// Discard the in-memory tables and read them again from the backend.
    pub fn reload(&mut self) -> Result<()> {
        let mut tables = HashMap::new();
        for kind in RecordKind::ALL {
            tables.insert(kind, self.backend.load_table(kind)?);
        }
        self.tables = tables;

        self.indexes.clear();
        for kind in RecordKind::ALL {
            let Some(table) = self.tables.get(&kind) else {
                continue;
            };
            for (id, value) in table {
                index_record(&mut self.indexes, kind, id, Some(value));
            }
        }
        log::debug!(
            "Loaded store: {} folders, {} files",
            self.len(RecordKind::Folder),
            self.len(RecordKind::File)
        );
        Ok(())
    }

    pub fn len(&self, kind: RecordKind) -> usize {
        self.tables.get(&kind).map(Table::len).unwrap_or(0)
    }
}

/// Refresh every index of `kind` for one record. `None` drops the record.
fn index_record(
    indexes: &mut HashMap<IndexName, SecondaryIndex>,
    kind: RecordKind,
    id: &str,
    value: Option<&serde_json::Value>,
) {
    for index in kind.indexes() {
        let entry = indexes.entry(*index).or_default();
        match value
            .and_then(|v| v.get(index.field()))
            .and_then(|v| v.as_str())
        {
            Some(key) => entry.insert(id, key),
            None => entry.remove(id),
        }
    }
}

fn decode<R: Record>(value: &serde_json::Value) -> Result<R> {
    serde_json::from_value(value.clone()).map_err(NoteboxError::Serialization)
}

impl<B: StorageBackend> DataStore for RecordStore<B> {
    fn init(&mut self, root_name: &str) -> Result<()> {
        if self.get::<Folder>(ROOT_FOLDER_ID)?.is_none() {
            log::info!("Seeding root folder '{}'", root_name);
            self.put(&Folder::root(root_name))?;
        }
        if self.get::<AppState>(APP_STATE_ID)?.is_none() {
            self.put(&AppState::default())?;
        }
        Ok(())
    }

    fn get<R: Record>(&self, id: &str) -> Result<Option<R>> {
        self.tables
            .get(&R::KIND)
            .and_then(|table| table.get(id))
            .map(decode)
            .transpose()
    }

    fn get_all<R: Record>(&self) -> Result<Vec<R>> {
        match self.tables.get(&R::KIND) {
            Some(table) => table.values().map(decode).collect(),
            None => Ok(Vec::new()),
        }
    }

    fn get_all_by_index<R: Record>(&self, index: IndexName, value: &str) -> Result<Vec<R>> {
        if index.kind() != R::KIND {
            return Err(NoteboxError::Store(format!(
                "Index {} is not defined on {}",
                index,
                R::KIND.table_name()
            )));
        }
        let ids = self
            .indexes
            .get(&index)
            .map(|idx| idx.lookup(value))
            .unwrap_or_default();

        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = self.get::<R>(&id)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    fn put<R: Record>(&mut self, record: &R) -> Result<()> {
        let kind = R::KIND;
        let id = record.id().to_string();
        let value = serde_json::to_value(record).map_err(NoteboxError::Serialization)?;

        let table = self.tables.entry(kind).or_default();
        let previous = table.insert(id.clone(), value.clone());

        if let Err(e) = self.backend.save_table(kind, table) {
            match previous {
                Some(old) => table.insert(id, old),
                None => table.remove(&id),
            };
            return Err(e);
        }

        index_record(&mut self.indexes, kind, &id, Some(&value));
        log::debug!("put {} {}", kind.table_name(), id);
        Ok(())
    }

    fn delete<R: Record>(&mut self, id: &str) -> Result<()> {
        let kind = R::KIND;
        let Some(table) = self.tables.get_mut(&kind) else {
            return Ok(());
        };
        let Some(previous) = table.remove(id) else {
            return Ok(());
        };

        if let Err(e) = self.backend.save_table(kind, table) {
            table.insert(id.to_string(), previous);
            return Err(e);
        }

        index_record(&mut self.indexes, kind, id, None);
        log::debug!("delete {} {}", kind.table_name(), id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::File;
    use crate::store::memory::InMemoryStore;

    fn seeded() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        store.init("Root").unwrap();
        store
    }

    #[test]
    fn get_missing_is_none_not_error() {
        let store = seeded();
        assert!(store.get::<Folder>("nope").unwrap().is_none());
        assert!(store.get::<File>("nope").unwrap().is_none());
    }

    #[test]
    fn init_seeds_once() {
        let mut store = seeded();
        let mut root: Folder = store.get(ROOT_FOLDER_ID).unwrap().unwrap();
        root.name = "Renamed".into();
        store.put(&root).unwrap();

        let writes = store.backend.write_count();
        store.init("Root").unwrap();

        assert_eq!(store.backend.write_count(), writes);
        let root: Folder = store.get(ROOT_FOLDER_ID).unwrap().unwrap();
        assert_eq!(root.name, "Renamed");
        assert_eq!(store.get_all::<AppState>().unwrap().len(), 1);
    }

    #[test]
    fn by_parent_index_excludes_root() {
        let mut store = seeded();
        let child = Folder::new("Child", ROOT_FOLDER_ID);
        store.put(&child).unwrap();

        let under_root: Vec<Folder> = store
            .get_all_by_index(IndexName::ByParent, ROOT_FOLDER_ID)
            .unwrap();
        assert_eq!(under_root.len(), 1);
        assert_eq!(under_root[0].id, child.id);
    }

    #[test]
    fn reput_moves_index_entry() {
        let mut store = seeded();
        let a = Folder::new("A", ROOT_FOLDER_ID);
        let b = Folder::new("B", ROOT_FOLDER_ID);
        store.put(&a).unwrap();
        store.put(&b).unwrap();

        let mut file = File::new("note.md", &a.id, "x");
        store.put(&file).unwrap();
        file.folder_id = b.id.clone();
        store.put(&file).unwrap();

        let in_a: Vec<File> = store.get_all_by_index(IndexName::ByFolder, &a.id).unwrap();
        let in_b: Vec<File> = store.get_all_by_index(IndexName::ByFolder, &b.id).unwrap();
        assert!(in_a.is_empty());
        assert_eq!(in_b.len(), 1);
    }

    #[test]
    fn delete_is_idempotent_and_unindexes() {
        let mut store = seeded();
        let file = File::new("note.md", ROOT_FOLDER_ID, "");
        store.put(&file).unwrap();

        store.delete::<File>(&file.id).unwrap();
        store.delete::<File>(&file.id).unwrap();

        let in_root: Vec<File> = store
            .get_all_by_index(IndexName::ByFolder, ROOT_FOLDER_ID)
            .unwrap();
        assert!(in_root.is_empty());
        assert!(store.get::<File>(&file.id).unwrap().is_none());
    }

    #[test]
    fn index_must_belong_to_kind() {
        let store = seeded();
        let res = store.get_all_by_index::<Folder>(IndexName::ByFolder, ROOT_FOLDER_ID);
        assert!(matches!(res, Err(NoteboxError::Store(_))));
    }

    #[test]
    fn failed_write_leaves_store_unchanged() {
        let mut store = seeded();
        let folder = Folder::new("A", ROOT_FOLDER_ID);
        store.backend.set_simulate_write_error(true);

        assert!(store.put(&folder).is_err());
        assert!(store.get::<Folder>(&folder.id).unwrap().is_none());
        let children: Vec<Folder> = store
            .get_all_by_index(IndexName::ByParent, ROOT_FOLDER_ID)
            .unwrap();
        assert!(children.is_empty());

        assert!(store.delete::<Folder>(ROOT_FOLDER_ID).is_err());
        assert!(store.get::<Folder>(ROOT_FOLDER_ID).unwrap().is_some());
    }

    #[test]
    fn reload_rebuilds_indexes_from_backend() {
        let mut store = seeded();
        let folder = Folder::new("A", ROOT_FOLDER_ID);
        store.put(&folder).unwrap();
        store.put(&File::new("n.md", &folder.id, "")).unwrap();

        store.reload().unwrap();

        let files: Vec<File> = store
            .get_all_by_index(IndexName::ByFolder, &folder.id)
            .unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(store.len(RecordKind::Folder), 2);
    }
}
