use super::fs_backend::FsBackend;
use super::record_store::RecordStore;
use crate::error::Result;
use std::path::PathBuf;

pub type FileStore = RecordStore<FsBackend>;

impl FileStore {
    /// Open (or lazily create) the store rooted at `root`.
    pub fn new_fs(root: PathBuf) -> Result<Self> {
        RecordStore::open(FsBackend::new(root))
    }
}
