//! File deletion and guarded/cascading folder deletion.
//!
//! A cascade is planned first (read-only walk of the subtree) and executed
//! second. The plan is post-order: every folder appears after all of its
//! descendants and its own files are deleted right before it. A failure part
//! way through therefore leaves surviving folders intact with their remaining
//! children, never a child whose parent is already gone.

use crate::error::{NoteboxError, Result};
use crate::model::{File, Folder, ROOT_FOLDER_ID};
use crate::store::{DataStore, IndexName};
use std::collections::HashSet;

use super::helpers::app_state;

/// What a folder delete removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteSummary {
    pub folders_deleted: usize,
    pub files_deleted: usize,
}

/// Remove a file. Deleting a missing file succeeds. Clears the active file if
/// it pointed here.
pub fn delete_file<S: DataStore>(store: &mut S, id: &str) -> Result<()> {
    store.delete::<File>(id)?;

    let mut state = app_state(store)?;
    if state.active_file_id.as_deref() == Some(id) {
        state.active_file_id = None;
        store.put(&state)?;
    }
    Ok(())
}

/// Delete a folder.
///
/// The root is never deleted. Without `recursive`, a folder with any child
/// folder or file is refused. Deleting a folder that is already gone succeeds
/// and removes nothing, so a cascade cut short can simply be run again.
pub fn delete_folder<S: DataStore>(
    store: &mut S,
    id: &str,
    recursive: bool,
) -> Result<DeleteSummary> {
    if id == ROOT_FOLDER_ID {
        return Err(NoteboxError::InvalidOperation(
            "Cannot delete root folder".to_string(),
        ));
    }
    let Some(folder) = store.get::<Folder>(id)? else {
        return Ok(DeleteSummary::default());
    };

    if !recursive {
        let has_children = !store
            .get_all_by_index::<Folder>(IndexName::ByParent, id)?
            .is_empty();
        let has_files = !store
            .get_all_by_index::<File>(IndexName::ByFolder, id)?
            .is_empty();
        if has_children || has_files {
            return Err(NoteboxError::InvalidOperation(
                "Cannot delete non-empty folder. Use recursive delete instead.".to_string(),
            ));
        }
    }

    let plan = plan_cascade(store, id)?;
    clear_selection(store, &plan)?;

    let mut summary = DeleteSummary::default();
    for step in &plan {
        for file_id in &step.file_ids {
            store.delete::<File>(file_id)?;
            summary.files_deleted += 1;
        }
        store.delete::<Folder>(&step.folder_id)?;
        summary.folders_deleted += 1;
    }

    if recursive {
        log::info!(
            "Deleted folder '{}' with {} subfolder(s) and {} file(s)",
            folder.name,
            summary.folders_deleted - 1,
            summary.files_deleted
        );
    }
    Ok(summary)
}

struct CascadeStep {
    folder_id: String,
    file_ids: Vec<String>,
}

/// Post-order walk of the subtree rooted at `id`, with an explicit stack.
fn plan_cascade<S: DataStore>(store: &S, id: &str) -> Result<Vec<CascadeStep>> {
    let mut plan = Vec::new();
    let mut seen = HashSet::new();
    let mut stack = vec![(id.to_string(), false)];

    while let Some((folder_id, expanded)) = stack.pop() {
        if expanded {
            let file_ids = store
                .get_all_by_index::<File>(IndexName::ByFolder, &folder_id)?
                .into_iter()
                .map(|f| f.id)
                .collect();
            plan.push(CascadeStep {
                folder_id,
                file_ids,
            });
            continue;
        }
        if !seen.insert(folder_id.clone()) {
            continue;
        }
        let children: Vec<Folder> = store.get_all_by_index(IndexName::ByParent, &folder_id)?;
        stack.push((folder_id, true));
        for child in children {
            stack.push((child.id, false));
        }
    }
    Ok(plan)
}

fn clear_selection<S: DataStore>(store: &mut S, plan: &[CascadeStep]) -> Result<()> {
    let mut state = app_state(store)?;
    let mut changed = false;

    if let Some(active) = state.active_folder_id.as_deref() {
        if plan.iter().any(|step| step.folder_id == active) {
            state.active_folder_id = None;
            changed = true;
        }
    }
    if let Some(active) = state.active_file_id.as_deref() {
        if plan
            .iter()
            .any(|step| step.file_ids.iter().any(|f| f == active))
        {
            state.active_file_id = None;
            changed = true;
        }
    }

    if changed {
        store.put(&state)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{folders, helpers::is_within, selection};
    use crate::model::DEFAULT_ROOT_NAME;
    use crate::store::memory::fixtures::TreeFixture;
    use crate::store::memory::InMemoryStore;
    use proptest::prelude::*;

    #[test]
    fn root_is_protected() {
        let mut fx = TreeFixture::new();
        for recursive in [false, true] {
            let err = delete_folder(&mut fx.store, ROOT_FOLDER_ID, recursive).unwrap_err();
            assert!(matches!(err, NoteboxError::InvalidOperation(_)));
        }
        assert!(fx.store.get::<Folder>(ROOT_FOLDER_ID).unwrap().is_some());
    }

    #[test]
    fn non_recursive_refuses_non_empty_folder() {
        let mut fx = TreeFixture::new()
            .with_folder("with-child/sub")
            .with_file("with-file/n.md", "");

        for path in ["with-child", "with-file"] {
            let id = fx.folder_id(path);
            let err = delete_folder(&mut fx.store, &id, false).unwrap_err();
            assert!(
                matches!(err, NoteboxError::InvalidOperation(ref m) if m.contains("non-empty"))
            );
        }
        assert!(fx
            .store
            .get::<Folder>(&fx.folder_id("with-child/sub"))
            .unwrap()
            .is_some());
    }

    #[test]
    fn non_recursive_deletes_empty_folder() {
        let mut fx = TreeFixture::new().with_folder("empty");
        let empty = fx.folder_id("empty");
        let summary = delete_folder(&mut fx.store, &empty, false).unwrap();
        assert_eq!(summary.folders_deleted, 1);
        assert!(folders::children(&fx.store, ROOT_FOLDER_ID)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn deleting_missing_folder_is_a_no_op() {
        let mut fx = TreeFixture::new().with_file("a/n.md", "").with_folder("keep");
        let a = fx.folder_id("a");
        delete_folder(&mut fx.store, &a, true).unwrap();

        let writes = fx.store.backend.write_count();
        for recursive in [true, false] {
            let again = delete_folder(&mut fx.store, &a, recursive).unwrap();
            assert_eq!(again, DeleteSummary::default());
        }
        assert_eq!(
            delete_folder(&mut fx.store, "ghost", false).unwrap(),
            DeleteSummary::default()
        );

        assert_eq!(fx.store.backend.write_count(), writes);
        let folders: Vec<Folder> = fx.store.get_all().unwrap();
        assert_eq!(folders.len(), 2);
        assert!(fx.store.get::<Folder>(&fx.folder_id("keep")).unwrap().is_some());
    }

    #[test]
    fn recursive_removes_whole_subtree_only() {
        let mut fx = TreeFixture::new()
            .with_file("a/one.md", "")
            .with_file("a/b/two.md", "")
            .with_file("a/b/c/three.md", "")
            .with_file("keep/four.md", "");

        let a = fx.folder_id("a");
        let summary = delete_folder(&mut fx.store, &a, true).unwrap();

        assert_eq!(
            summary,
            DeleteSummary {
                folders_deleted: 3,
                files_deleted: 3
            }
        );
        let folders: Vec<Folder> = fx.store.get_all().unwrap();
        let files: Vec<File> = fx.store.get_all().unwrap();
        assert_eq!(folders.len(), 2);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].id, fx.file_id("keep/four.md"));
    }

    #[test]
    fn deleting_active_file_clears_selection() {
        let mut fx = TreeFixture::new().with_file("n.md", "");
        let id = fx.file_id("n.md");
        selection::set_active_file(&mut fx.store, Some(&id)).unwrap();

        delete_file(&mut fx.store, &id).unwrap();
        delete_file(&mut fx.store, &id).unwrap();

        assert!(selection::current(&fx.store)
            .unwrap()
            .active_file_id
            .is_none());
    }

    #[test]
    fn deleting_other_file_keeps_selection() {
        let mut fx = TreeFixture::new()
            .with_file("keep.md", "")
            .with_file("drop.md", "");
        let keep = fx.file_id("keep.md");
        selection::set_active_file(&mut fx.store, Some(&keep)).unwrap();

        let other = fx.file_id("drop.md");
        delete_file(&mut fx.store, &other).unwrap();

        assert_eq!(
            selection::current(&fx.store).unwrap().active_file_id,
            Some(keep)
        );
    }

    #[test]
    fn cascade_clears_selection_inside_subtree() {
        let mut fx = TreeFixture::new().with_file("a/b/n.md", "");
        let (a, b) = (fx.folder_id("a"), fx.folder_id("a/b"));
        let note = fx.file_id("a/b/n.md");
        selection::set_active_folder(&mut fx.store, Some(&b)).unwrap();
        selection::set_active_file(&mut fx.store, Some(&note)).unwrap();

        delete_folder(&mut fx.store, &a, true).unwrap();

        let state = selection::current(&fx.store).unwrap();
        assert!(state.active_folder_id.is_none());
        assert!(state.active_file_id.is_none());
    }

    #[test]
    fn interrupted_cascade_leaves_no_dangling_children() {
        let mut fx = TreeFixture::new()
            .with_file("a/b/c/deep.md", "")
            .with_file("a/b/mid.md", "")
            .with_file("a/top.md", "");
        let a = fx.folder_id("a");
        fx.store.backend.fail_after_writes(2);

        assert!(delete_folder(&mut fx.store, &a, true).is_err());

        let folders: Vec<Folder> = fx.store.get_all().unwrap();
        for folder in &folders {
            if let Some(parent) = &folder.parent_id {
                assert!(fx.store.get::<Folder>(parent).unwrap().is_some());
            }
        }
        let files: Vec<File> = fx.store.get_all().unwrap();
        for file in &files {
            assert!(fx.store.get::<Folder>(&file.folder_id).unwrap().is_some());
        }
    }

    /// Builds a random forest under the root: folder `i` hangs off the root
    /// or a folder with a smaller index, files hang off any folder.
    fn build_tree(parents: &[Option<usize>], files: &[usize]) -> (InMemoryStore, Vec<String>) {
        let mut store = InMemoryStore::new();
        store.init(DEFAULT_ROOT_NAME).unwrap();
        let mut ids: Vec<String> = Vec::new();
        for (i, parent) in parents.iter().enumerate() {
            let parent_id = match (i, parent) {
                (0, _) | (_, None) => ROOT_FOLDER_ID.to_string(),
                (i, Some(p)) => ids[*p % i].clone(),
            };
            ids.push(folders::create(&mut store, &format!("f{}", i), &parent_id).unwrap());
        }
        for (i, owner) in files.iter().enumerate() {
            let folder_id = ids[*owner % ids.len()].clone();
            store
                .put(&File::new(format!("n{}.md", i), folder_id, ""))
                .unwrap();
        }
        (store, ids)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_cascade_leaves_no_descendant(
            parents in prop::collection::vec(prop::option::of(0usize..32), 1..24),
            files in prop::collection::vec(0usize..32, 0..32),
            target in 0usize..32,
        ) {
            let (mut store, ids) = build_tree(&parents, &files);
            let target_id = ids[target % ids.len()].clone();

            let folders_before: Vec<Folder> = store.get_all().unwrap();
            let files_before: Vec<File> = store.get_all().unwrap();
            let doomed: HashSet<String> = folders_before
                .iter()
                .filter(|f| is_within(&store, &f.id, &target_id).unwrap())
                .map(|f| f.id.clone())
                .collect();

            delete_folder(&mut store, &target_id, true).unwrap();

            let folders_after: Vec<Folder> = store.get_all().unwrap();
            let files_after: Vec<File> = store.get_all().unwrap();

            for folder in &folders_before {
                let survives = folders_after.iter().any(|f| f == folder);
                prop_assert_eq!(survives, !doomed.contains(&folder.id));
            }
            for file in &files_before {
                let survives = files_after.iter().any(|f| f == file);
                prop_assert_eq!(survives, !doomed.contains(&file.folder_id));
            }
        }
    }
}
