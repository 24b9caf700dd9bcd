use crate::error::{NoteboxError, Result};
use crate::model::{now, ExportData, EXPORT_VERSION};
use crate::store::DataStore;

use super::tree;

/// Snapshot of the whole tree with original ids.
pub fn run<S: DataStore>(store: &S) -> Result<ExportData> {
    let listing = tree::list(store)?;
    log::info!(
        "Exporting {} folder(s) and {} file(s)",
        listing.folders.len(),
        listing.files.len()
    );
    Ok(ExportData {
        version: EXPORT_VERSION.to_string(),
        exported_at: now(),
        folders: listing.folders,
        files: listing.files,
    })
}

/// [`run`] rendered as pretty JSON, the export file format.
pub fn to_json<S: DataStore>(store: &S) -> Result<String> {
    let data = run(store)?;
    serde_json::to_string_pretty(&data).map_err(NoteboxError::Serialization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ROOT_FOLDER_ID;
    use crate::store::memory::fixtures::TreeFixture;

    #[test]
    fn export_contains_every_record_with_ids() {
        let fx = TreeFixture::new().with_file("a/n.md", "# hi");
        let data = run(&fx.store).unwrap();

        assert_eq!(data.version, "1.0");
        assert_eq!(data.folders.len(), 2);
        assert_eq!(data.files.len(), 1);
        assert_eq!(data.files[0].id, fx.file_id("a/n.md"));
        assert_eq!(data.files[0].content, "# hi");
    }

    #[test]
    fn json_has_wire_field_names() {
        let fx = TreeFixture::new().with_file("n.md", "");
        let json = to_json(&fx.store).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value["exportedAt"].is_i64());
        assert_eq!(value["folders"][0]["id"], ROOT_FOLDER_ID);
        assert!(value["folders"][0]["parentId"].is_null());
        assert_eq!(value["files"][0]["folderId"], ROOT_FOLDER_ID);
    }
}
