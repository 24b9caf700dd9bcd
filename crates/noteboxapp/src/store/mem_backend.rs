use super::backend::StorageBackend;
use super::{RecordKind, Table};
use crate::error::{NoteboxError, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability so the `StorageBackend` trait can
/// take `&self` everywhere. The backend is `Send` but not `Sync`; share it
/// behind a mutex.
#[derive(Default)]
pub struct MemBackend {
    tables: RefCell<HashMap<RecordKind, Table>>,
    simulate_write_error: Cell<bool>,
    writes: Cell<usize>,
    fail_after: Cell<Option<usize>>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Let `n` more writes succeed, then fail every write after them.
    pub fn fail_after_writes(&self, n: usize) {
        self.fail_after.set(Some(self.writes.get() + n));
    }

    /// Number of successful table writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    fn should_fail(&self) -> bool {
        if self.simulate_write_error.get() {
            return true;
        }
        matches!(self.fail_after.get(), Some(limit) if self.writes.get() >= limit)
    }
}

impl StorageBackend for MemBackend {
    fn load_table(&self, kind: RecordKind) -> Result<Table> {
        let tables = self.tables.borrow();
        Ok(tables.get(&kind).cloned().unwrap_or_default())
    }

    fn save_table(&self, kind: RecordKind, table: &Table) -> Result<()> {
        if self.should_fail() {
            return Err(NoteboxError::Store("Simulated write error".to_string()));
        }
        self.tables.borrow_mut().insert(kind, table.clone());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
