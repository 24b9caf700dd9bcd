use crate::error::{NoteboxError, Result};
use crate::model::Folder;
use crate::store::{DataStore, IndexName};

use super::helpers::{is_within, require_folder};

/// Create a folder under `parent_id` and return its fresh id.
pub fn create<S: DataStore>(store: &mut S, name: &str, parent_id: &str) -> Result<String> {
    require_folder(store, parent_id)?;

    let folder = Folder::new(name, parent_id);
    store.put(&folder)?;
    log::debug!("Created folder '{}' ({}) in {}", name, folder.id, parent_id);
    Ok(folder.id)
}

pub fn get<S: DataStore>(store: &S, id: &str) -> Result<Folder> {
    require_folder(store, id)
}

/// Direct subfolders of `parent_id`. Never includes the root.
pub fn children<S: DataStore>(store: &S, parent_id: &str) -> Result<Vec<Folder>> {
    store.get_all_by_index(IndexName::ByParent, parent_id)
}

/// The subfolder of `parent_id` called `name`, if any.
pub fn find_child<S: DataStore>(store: &S, parent_id: &str, name: &str) -> Result<Option<Folder>> {
    Ok(children(store, parent_id)?
        .into_iter()
        .find(|f| f.name == name))
}

pub fn rename<S: DataStore>(store: &mut S, id: &str, name: &str) -> Result<Folder> {
    let mut folder = require_folder(store, id)?;
    folder.name = name.to_string();
    folder.touch();
    store.put(&folder)?;
    Ok(folder)
}

/// Re-parent a folder, keeping the parent relation acyclic.
pub fn move_to<S: DataStore>(store: &mut S, id: &str, new_parent_id: &str) -> Result<Folder> {
    let mut folder = require_folder(store, id)?;
    if folder.is_root() {
        return Err(NoteboxError::InvalidOperation(
            "Cannot move the root folder".to_string(),
        ));
    }
    require_folder(store, new_parent_id)?;

    if is_within(store, new_parent_id, id)? {
        return Err(NoteboxError::InvalidOperation(format!(
            "Cannot move folder '{}' into its own subtree",
            folder.name
        )));
    }

    if folder.parent_id.as_deref() == Some(new_parent_id) {
        return Ok(folder);
    }

    folder.parent_id = Some(new_parent_id.to_string());
    folder.touch();
    store.put(&folder)?;
    Ok(folder)
}
