use super::{RecordKind, Table};
use crate::error::Result;

/// Abstract interface for raw storage I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while RecordStore handles the "what" (indexes, seeding, write-through).
pub trait StorageBackend {
    /// Load a whole table. A table that was never written is empty.
    fn load_table(&self, kind: RecordKind) -> Result<Table>;

    /// Replace a whole table.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn save_table(&self, kind: RecordKind, table: &Table) -> Result<()>;
}
