use crate::error::Result;
use crate::model::File;
use crate::store::{DataStore, IndexName};

use super::helpers::{require_file, require_folder};

/// Create a file in `folder_id` and return its fresh id.
pub fn create<S: DataStore>(
    store: &mut S,
    name: &str,
    folder_id: &str,
    content: &str,
) -> Result<String> {
    require_folder(store, folder_id)?;

    let file = File::new(name, folder_id, content);
    store.put(&file)?;
    log::debug!("Created file '{}' ({}) in {}", name, file.id, folder_id);
    Ok(file.id)
}

pub fn get<S: DataStore>(store: &S, id: &str) -> Result<File> {
    require_file(store, id)
}

/// Files owned directly by `folder_id`.
pub fn in_folder<S: DataStore>(store: &S, folder_id: &str) -> Result<Vec<File>> {
    store.get_all_by_index(IndexName::ByFolder, folder_id)
}

/// The file in `folder_id` called `name`, if any.
pub fn find_in_folder<S: DataStore>(
    store: &S,
    folder_id: &str,
    name: &str,
) -> Result<Option<File>> {
    Ok(in_folder(store, folder_id)?
        .into_iter()
        .find(|f| f.name == name))
}

pub fn rename<S: DataStore>(store: &mut S, id: &str, name: &str) -> Result<File> {
    let mut file = require_file(store, id)?;
    file.name = name.to_string();
    file.touch();
    store.put(&file)?;
    Ok(file)
}

/// Replace a file's content. This is the live-editing path: it writes one
/// record and reads nothing else.
pub fn update_content<S: DataStore>(store: &mut S, id: &str, content: &str) -> Result<File> {
    let mut file = require_file(store, id)?;
    file.content = content.to_string();
    file.touch();
    store.put(&file)?;
    Ok(file)
}

pub fn move_to<S: DataStore>(store: &mut S, id: &str, folder_id: &str) -> Result<File> {
    let mut file = require_file(store, id)?;
    require_folder(store, folder_id)?;

    if file.folder_id == folder_id {
        return Ok(file);
    }

    file.folder_id = folder_id.to_string();
    file.touch();
    store.put(&file)?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NoteboxError;
    use crate::model::ROOT_FOLDER_ID;
    use crate::store::memory::fixtures::TreeFixture;

    #[test]
    fn creates_file_with_default_empty_content() {
        let mut fx = TreeFixture::new();
        let id = create(&mut fx.store, "todo.md", ROOT_FOLDER_ID, "").unwrap();

        let file = get(&fx.store, &id).unwrap();
        assert_eq!(file.name, "todo.md");
        assert_eq!(file.content, "");
        assert_eq!(file.folder_id, ROOT_FOLDER_ID);
    }

    #[test]
    fn create_in_missing_folder_is_not_found() {
        let mut fx = TreeFixture::new();
        assert!(matches!(
            create(&mut fx.store, "x.md", "ghost", "body"),
            Err(NoteboxError::NotFound { .. })
        ));
    }

    #[test]
    fn update_content_replaces_body() {
        let mut fx = TreeFixture::new().with_file("notes/a.md", "old");
        let id = fx.file_id("notes/a.md");

        let updated = update_content(&mut fx.store, &id, "# new").unwrap();

        assert_eq!(updated.content, "# new");
        assert_eq!(get(&fx.store, &id).unwrap().content, "# new");
    }

    #[test]
    fn update_content_of_missing_file_is_not_found() {
        let mut fx = TreeFixture::new();
        assert!(matches!(
            update_content(&mut fx.store, "ghost", "x"),
            Err(NoteboxError::NotFound { .. })
        ));
    }

    #[test]
    fn rename_keeps_content() {
        let mut fx = TreeFixture::new().with_file("a.md", "body");
        let id = fx.file_id("a.md");
        let renamed = rename(&mut fx.store, &id, "b.md").unwrap();
        assert_eq!(renamed.name, "b.md");
        assert_eq!(renamed.content, "body");
    }

    #[test]
    fn move_changes_owning_folder() {
        let mut fx = TreeFixture::new()
            .with_file("a/n.md", "")
            .with_folder("b");
        let id = fx.file_id("a/n.md");
        let b = fx.folder_id("b");

        move_to(&mut fx.store, &id, &b).unwrap();

        assert!(in_folder(&fx.store, &fx.folder_id("a")).unwrap().is_empty());
        assert_eq!(in_folder(&fx.store, &b).unwrap()[0].id, id);
        assert!(matches!(
            move_to(&mut fx.store, &id, "ghost"),
            Err(NoteboxError::NotFound { .. })
        ));
    }
}
