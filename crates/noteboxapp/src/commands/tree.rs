use crate::error::Result;
use crate::model::{File, Folder, TreeListing};
use crate::store::DataStore;

/// Every folder and every file. Folders are ordered root first, then by name;
/// files by name. Hierarchy assembly is left to the caller.
pub fn list<S: DataStore>(store: &S) -> Result<TreeListing> {
    let mut folders: Vec<Folder> = store.get_all()?;
    let mut files: Vec<File> = store.get_all()?;

    folders.sort_by(|a, b| {
        b.is_root()
            .cmp(&a.is_root())
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });
    files.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

    Ok(TreeListing { folders, files })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ROOT_FOLDER_ID;
    use crate::store::memory::fixtures::TreeFixture;

    #[test]
    fn lists_everything_root_first() {
        let fx = TreeFixture::new()
            .with_file("b/two.md", "")
            .with_file("a/one.md", "");

        let listing = list(&fx.store).unwrap();

        assert_eq!(listing.folders.len(), 3);
        assert_eq!(listing.folders[0].id, ROOT_FOLDER_ID);
        assert_eq!(listing.folders[1].name, "a");
        let names: Vec<_> = listing.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["one.md", "two.md"]);
    }
}
