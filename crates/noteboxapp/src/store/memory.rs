use super::mem_backend::MemBackend;
use super::record_store::RecordStore;

pub type InMemoryStore = RecordStore<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        RecordStore::with_backend(MemBackend::new())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{File, Folder, DEFAULT_ROOT_NAME, ROOT_FOLDER_ID};
    use crate::store::DataStore;
    use std::collections::HashMap;

    /// Builds a seeded store with named folders and files.
    ///
    /// Paths are slash separated from the root: `with_folder("a/b")` creates
    /// `a` under the root and `b` under `a`. Ids are looked up by path with
    /// [`TreeFixture::folder_id`] and [`TreeFixture::file_id`].
    pub struct TreeFixture {
        pub store: InMemoryStore,
        folders: HashMap<String, String>,
        files: HashMap<String, String>,
    }

    impl Default for TreeFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TreeFixture {
        pub fn new() -> Self {
            let mut store = InMemoryStore::new();
            store
                .init(DEFAULT_ROOT_NAME)
                .expect("seeding an in-memory store");
            Self {
                store,
                folders: HashMap::new(),
                files: HashMap::new(),
            }
        }

        pub fn with_folder(mut self, path: &str) -> Self {
            self.ensure_folder(path);
            self
        }

        pub fn with_file(mut self, path: &str, content: &str) -> Self {
            let (dir, name) = split_path(path);
            let folder_id = self.ensure_folder(dir);
            let file = File::new(name, folder_id, content);
            self.store.put(&file).expect("fixture file");
            self.files.insert(path.to_string(), file.id);
            self
        }

        pub fn folder_id(&self, path: &str) -> String {
            if path.is_empty() {
                return ROOT_FOLDER_ID.to_string();
            }
            self.folders
                .get(path)
                .cloned()
                .unwrap_or_else(|| panic!("no fixture folder at {}", path))
        }

        pub fn file_id(&self, path: &str) -> String {
            self.files
                .get(path)
                .cloned()
                .unwrap_or_else(|| panic!("no fixture file at {}", path))
        }

        fn ensure_folder(&mut self, path: &str) -> String {
            if path.is_empty() {
                return ROOT_FOLDER_ID.to_string();
            }
            if let Some(id) = self.folders.get(path) {
                return id.clone();
            }
            let (dir, name) = split_path(path);
            let parent_id = self.ensure_folder(dir);
            let folder = Folder::new(name, parent_id);
            self.store.put(&folder).expect("fixture folder");
            self.folders.insert(path.to_string(), folder.id.clone());
            folder.id
        }
    }

    fn split_path(path: &str) -> (&str, &str) {
        match path.rsplit_once('/') {
            Some((dir, name)) => (dir, name),
            None => ("", path),
        }
    }
}
