//! Consistency sweep.
//!
//! Cascading deletes and imports are sequences of independent writes. If one
//! is interrupted the store can hold files whose folder is gone or folders
//! whose parent is gone. `run` repairs that and anything else that breaks the
//! tree invariants:
//!
//! - re-seeds a missing root folder or app state;
//! - removes folders whose parent does not exist, repeatedly, so a whole
//!   orphaned subtree goes;
//! - removes folders caught in a parent cycle;
//! - removes files whose folder does not exist;
//! - clears selections pointing at missing entities.

use crate::error::Result;
use crate::model::{AppState, File, Folder, APP_STATE_ID, ROOT_FOLDER_ID};
use crate::store::DataStore;
use std::collections::{HashMap, HashSet};

use super::helpers::app_state;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorReport {
    pub reseeded_root: bool,
    pub reseeded_app_state: bool,
    pub removed_folders: usize,
    pub removed_files: usize,
    pub cleared_selection: bool,
}

impl DoctorReport {
    pub fn is_clean(&self) -> bool {
        *self == DoctorReport::default()
    }
}

pub fn run<S: DataStore>(store: &mut S, root_name: &str) -> Result<DoctorReport> {
    let mut report = DoctorReport {
        reseeded_root: store.get::<Folder>(ROOT_FOLDER_ID)?.is_none(),
        reseeded_app_state: store.get::<AppState>(APP_STATE_ID)?.is_none(),
        ..Default::default()
    };
    store.init(root_name)?;

    let folders: Vec<Folder> = store.get_all()?;
    let by_id: HashMap<&str, &Folder> = folders.iter().map(|f| (f.id.as_str(), f)).collect();

    let mut doomed = Vec::new();
    for folder in &folders {
        if !reaches_root(folder, &by_id) {
            doomed.push(folder.id.clone());
        }
    }
    for id in &doomed {
        store.delete::<Folder>(id)?;
    }
    report.removed_folders = doomed.len();

    let surviving: HashSet<String> = folders
        .iter()
        .map(|f| f.id.clone())
        .filter(|id| !doomed.contains(id))
        .collect();

    let files: Vec<File> = store.get_all()?;
    for file in files {
        if !surviving.contains(&file.folder_id) {
            store.delete::<File>(&file.id)?;
            report.removed_files += 1;
        }
    }

    let mut state = app_state(store)?;
    if let Some(id) = state.active_folder_id.as_deref() {
        if !surviving.contains(id) {
            state.active_folder_id = None;
            report.cleared_selection = true;
        }
    }
    if let Some(id) = state.active_file_id.as_deref() {
        if store.get::<File>(id)?.is_none() {
            state.active_file_id = None;
            report.cleared_selection = true;
        }
    }
    if report.cleared_selection {
        store.put(&state)?;
    }

    if report.is_clean() {
        log::debug!("Doctor: no inconsistencies found");
    } else {
        log::info!("Doctor: {:?}", report);
    }
    Ok(report)
}

/// Follow parent pointers up to the root. A dangling parent or a cycle fails.
fn reaches_root(folder: &Folder, by_id: &HashMap<&str, &Folder>) -> bool {
    let mut seen = HashSet::new();
    let mut current = folder;
    loop {
        if current.id == ROOT_FOLDER_ID {
            return current.parent_id.is_none();
        }
        if !seen.insert(current.id.as_str()) {
            return false;
        }
        match current
            .parent_id
            .as_deref()
            .and_then(|p| by_id.get(p).copied())
        {
            Some(parent) => current = parent,
            None => return false,
        }
    }
}
