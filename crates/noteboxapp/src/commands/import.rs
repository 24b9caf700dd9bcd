//! Reconciling import of an export document.
//!
//! The payload is validated as a whole before anything is written; a
//! malformed payload produces a failed [`ImportResult`] and no records. After
//! that every entity is merged on its own: a failure is recorded in
//! `errors` and the import moves on.
//!
//! Foreign ids are never written. Each imported folder is given (or matched
//! to) a local id, recorded in a remap table, and children resolve their
//! parent through that table. Folders are processed in passes until no more
//! of them can be placed, so a payload may list children before parents.
//!
//! Collisions are detected on `(name, resolved parent)` against the store as
//! it is at that moment, including entities created earlier in the same run.
//!
//! All writes go through [`folders`] and [`files`].

use crate::error::{NoteboxError, Result};
use crate::model::{ExportData, ImportResult, MergeStrategy, ROOT_FOLDER_ID};
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::{files, folders};
use crate::store::DataStore;

const IMPORTED_SUFFIX: &str = " (imported)";

/// A folder entry of a validated payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadFolder {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
}

/// A file entry of a validated payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadFile {
    pub id: String,
    pub name: String,
    pub folder_id: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportPayload {
    pub folders: Vec<PayloadFolder>,
    pub files: Vec<PayloadFile>,
}

impl From<&ExportData> for ImportPayload {
    fn from(data: &ExportData) -> Self {
        Self {
            folders: data
                .folders
                .iter()
                .map(|f| PayloadFolder {
                    id: f.id.clone(),
                    name: f.name.clone(),
                    parent_id: f.parent_id.clone(),
                })
                .collect(),
            files: data
                .files
                .iter()
                .map(|f| PayloadFile {
                    id: f.id.clone(),
                    name: f.name.clone(),
                    folder_id: f.folder_id.clone(),
                    content: f.content.clone(),
                })
                .collect(),
        }
    }
}

fn invalid(message: impl Into<String>) -> NoteboxError {
    NoteboxError::Validation(message.into())
}

/// Check the shape of a parsed export document.
pub fn validate(payload: &Value) -> Result<ImportPayload> {
    let obj = payload
        .as_object()
        .ok_or_else(|| invalid("payload must be an object"))?;

    if !matches!(obj.get("version"), Some(Value::String(_))) {
        return Err(invalid("'version' must be a string"));
    }
    if !obj.get("exportedAt").is_some_and(Value::is_number) {
        return Err(invalid("'exportedAt' must be a number"));
    }

    let folders = array(obj, "folders")?
        .iter()
        .enumerate()
        .map(|(i, v)| folder_entry(i, v))
        .collect::<Result<Vec<_>>>()?;
    let files = array(obj, "files")?
        .iter()
        .enumerate()
        .map(|(i, v)| file_entry(i, v))
        .collect::<Result<Vec<_>>>()?;

    Ok(ImportPayload { folders, files })
}

fn array<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a Vec<Value>> {
    obj.get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| invalid(format!("'{}' must be an array", key)))
}

fn entry<'a>(list: &str, index: usize, value: &'a Value) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| invalid(format!("{}[{}] must be an object", list, index)))
}

fn non_empty_str(obj: &Map<String, Value>, list: &str, index: usize, key: &str) -> Result<String> {
    match obj.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(invalid(format!(
            "{}[{}].{} must be a non-empty string",
            list, index, key
        ))),
    }
}

fn folder_entry(index: usize, value: &Value) -> Result<PayloadFolder> {
    let obj = entry("folders", index, value)?;
    let parent_id = match obj.get("parentId") {
        Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        _ => {
            return Err(invalid(format!(
                "folders[{}].parentId must be null or a string",
                index
            )))
        }
    };
    Ok(PayloadFolder {
        id: non_empty_str(obj, "folders", index, "id")?,
        name: non_empty_str(obj, "folders", index, "name")?,
        parent_id,
    })
}

fn file_entry(index: usize, value: &Value) -> Result<PayloadFile> {
    let obj = entry("files", index, value)?;
    let content = match obj.get("content") {
        Some(Value::String(s)) => s.clone(),
        _ => return Err(invalid(format!("files[{}].content must be a string", index))),
    };
    Ok(PayloadFile {
        id: non_empty_str(obj, "files", index, "id")?,
        name: non_empty_str(obj, "files", index, "name")?,
        folder_id: non_empty_str(obj, "files", index, "folderId")?,
        content,
    })
}

/// Validate `payload` and merge it into the store.
pub fn run<S: DataStore>(store: &mut S, payload: &Value, strategy: MergeStrategy) -> ImportResult {
    match validate(payload) {
        Ok(payload) => apply(store, &payload, strategy),
        Err(e) => {
            log::warn!("Rejected import: {}", e);
            ImportResult::failed(e.to_string())
        }
    }
}

/// Parse an export file and import it. Unparsable text fails like a
/// malformed payload.
pub fn from_json<S: DataStore>(store: &mut S, json: &str, strategy: MergeStrategy) -> ImportResult {
    match serde_json::from_str::<Value>(json) {
        Ok(value) => run(store, &value, strategy),
        Err(e) => ImportResult::failed(invalid(e.to_string()).to_string()),
    }
}

/// Import an already typed export document.
pub fn import_data<S: DataStore>(
    store: &mut S,
    data: &ExportData,
    strategy: MergeStrategy,
) -> ImportResult {
    apply(store, &ImportPayload::from(data), strategy)
}

/// Merge a validated payload.
pub fn apply<S: DataStore>(
    store: &mut S,
    payload: &ImportPayload,
    strategy: MergeStrategy,
) -> ImportResult {
    let mut result = ImportResult::default();
    let mut remap: HashMap<String, String> = HashMap::new();

    let (top_level, mut pending): (Vec<_>, Vec<_>) = payload
        .folders
        .iter()
        .partition(|f| f.parent_id.is_none());

    for folder in top_level {
        let outcome = if folder.id == ROOT_FOLDER_ID {
            merge_root(store, folder, strategy, &mut remap)
        } else {
            merge_folder(store, folder, ROOT_FOLDER_ID, strategy, &mut remap)
        };
        record_folder(&mut result, folder, outcome);
    }

    while !pending.is_empty() {
        let before = pending.len();
        let mut unresolved = Vec::new();

        for folder in pending {
            let parent = folder
                .parent_id
                .as_ref()
                .and_then(|p| remap.get(p))
                .cloned();
            match parent {
                Some(local_parent) => {
                    let outcome = merge_folder(store, folder, &local_parent, strategy, &mut remap);
                    record_folder(&mut result, folder, outcome);
                }
                None => unresolved.push(folder),
            }
        }

        pending = unresolved;
        if pending.len() == before {
            break;
        }
    }

    for folder in pending {
        result.errors.push(format!(
            "Failed to import folder {}: parent folder not found",
            folder.name
        ));
    }

    for file in &payload.files {
        let Some(local_folder) = remap.get(&file.folder_id).cloned() else {
            result.errors.push(format!(
                "Failed to import file {}: Parent folder not found",
                file.name
            ));
            continue;
        };
        match merge_file(store, file, &local_folder, strategy) {
            Ok(()) => result.files_imported += 1,
            Err(e) => result
                .errors
                .push(format!("Failed to import file {}: {}", file.name, e)),
        }
    }

    result.success = result.errors.is_empty();
    for error in &result.errors {
        log::warn!("{}", error);
    }
    log::info!(
        "Imported {} folder(s) and {} file(s) with strategy {} ({} error(s))",
        result.folders_imported,
        result.files_imported,
        strategy,
        result.errors.len()
    );
    result
}

fn record_folder(result: &mut ImportResult, folder: &PayloadFolder, outcome: Result<()>) {
    match outcome {
        Ok(()) => result.folders_imported += 1,
        Err(e) => result
            .errors
            .push(format!("Failed to import folder {}: {}", folder.name, e)),
    }
}

/// The foreign root always lands on the local root. Only `overwrite` touches it.
fn merge_root<S: DataStore>(
    store: &mut S,
    folder: &PayloadFolder,
    strategy: MergeStrategy,
    remap: &mut HashMap<String, String>,
) -> Result<()> {
    let root = folders::get(store, ROOT_FOLDER_ID)?;
    if strategy == MergeStrategy::Overwrite {
        folders::rename(store, &root.id, &folder.name)?;
    }
    remap.insert(folder.id.clone(), root.id);
    Ok(())
}

fn merge_folder<S: DataStore>(
    store: &mut S,
    folder: &PayloadFolder,
    local_parent: &str,
    strategy: MergeStrategy,
    remap: &mut HashMap<String, String>,
) -> Result<()> {
    let local_id = match folders::find_child(store, local_parent, &folder.name)? {
        None => folders::create(store, &folder.name, local_parent)?,
        Some(existing) => match strategy {
            MergeStrategy::Skip => existing.id,
            MergeStrategy::Overwrite => folders::rename(store, &existing.id, &folder.name)?.id,
            MergeStrategy::Duplicate => folders::create(
                store,
                &format!("{}{}", folder.name, IMPORTED_SUFFIX),
                local_parent,
            )?,
        },
    };
    remap.insert(folder.id.clone(), local_id);
    Ok(())
}

fn merge_file<S: DataStore>(
    store: &mut S,
    file: &PayloadFile,
    local_folder: &str,
    strategy: MergeStrategy,
) -> Result<()> {
    match files::find_in_folder(store, local_folder, &file.name)? {
        None => {
            files::create(store, &file.name, local_folder, &file.content)?;
        }
        Some(existing) => match strategy {
            MergeStrategy::Skip => {}
            MergeStrategy::Overwrite => {
                files::update_content(store, &existing.id, &file.content)?;
            }
            MergeStrategy::Duplicate => {
                files::create(
                    store,
                    &format!("{}{}", file.name, IMPORTED_SUFFIX),
                    local_folder,
                    &file.content,
                )?;
            }
        },
    }
    Ok(())
}
