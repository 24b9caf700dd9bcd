use crate::error::{NoteboxError, Result};
use crate::model::{AppState, File, Folder, APP_STATE_ID};
use crate::store::{DataStore, RecordKind};
use std::collections::HashSet;

pub fn require_folder<S: DataStore>(store: &S, id: &str) -> Result<Folder> {
    store
        .get::<Folder>(id)?
        .ok_or_else(|| NoteboxError::not_found(RecordKind::Folder, id))
}

pub fn require_file<S: DataStore>(store: &S, id: &str) -> Result<File> {
    store
        .get::<File>(id)?
        .ok_or_else(|| NoteboxError::not_found(RecordKind::File, id))
}

pub fn app_state<S: DataStore>(store: &S) -> Result<AppState> {
    store
        .get::<AppState>(APP_STATE_ID)?
        .ok_or_else(|| NoteboxError::not_found(RecordKind::AppState, APP_STATE_ID))
}

/// True if `candidate_id` is `ancestor_id` or lies somewhere below it.
///
/// Walks parent pointers upward, so the cost is the depth of `candidate_id`.
/// A corrupt parent chain (dangling or cyclic) ends the walk with `false`.
pub fn is_within<S: DataStore>(store: &S, candidate_id: &str, ancestor_id: &str) -> Result<bool> {
    let mut seen = HashSet::new();
    let mut current = Some(candidate_id.to_string());

    while let Some(id) = current {
        if id == ancestor_id {
            return Ok(true);
        }
        if !seen.insert(id.clone()) {
            return Ok(false);
        }
        current = store.get::<Folder>(&id)?.and_then(|f| f.parent_id);
    }
    Ok(false)
}
