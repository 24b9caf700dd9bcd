//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for every notebox operation, whichever UI is driving it.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Carries context** the commands need but UIs should not repeat, such as
//!   the configured root folder name used when re-seeding
//! - **Returns structured types**: ids, records, summaries, [`ImportResult`]
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that belongs in `commands/*.rs`
//! - **I/O operations**: no stdout, stderr, file pickers or downloads
//! - **Presentation concerns**: returns data structures, not strings
//!
//! ## Generic Over DataStore
//!
//! `NoteboxApi<S: DataStore>` is generic over the storage backend:
//! - Production: `NoteboxApi<FileStore>`
//! - Testing: `NoteboxApi<InMemoryStore>`
//!
//! ## Testing Strategy
//!
//! API tests check dispatch and return types. Command logic is tested in the
//! command modules and storage behavior in the store modules.

use crate::commands::{
    self, delete::DeleteSummary, doctor::DoctorReport, selection::SelectionChange,
};
use crate::error::Result;
use crate::model::{
    AppState, ExportData, File, Folder, ImportResult, MergeStrategy, TreeListing, UiSettings,
    UiSettingsPatch,
};
use crate::store::DataStore;

/// The main API facade for notebox operations.
pub struct NoteboxApi<S: DataStore> {
    store: S,
    root_name: String,
}

impl<S: DataStore> NoteboxApi<S> {
    /// Wrap a store, seeding it if it is empty.
    pub fn new(mut store: S, root_name: impl Into<String>) -> Result<Self> {
        let root_name = root_name.into();
        store.init(&root_name)?;
        Ok(Self { store, root_name })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    // --- Folders ---

    pub fn create_folder(&mut self, name: &str, parent_id: &str) -> Result<String> {
        commands::folders::create(&mut self.store, name, parent_id)
    }

    pub fn get_folder(&self, id: &str) -> Result<Folder> {
        commands::folders::get(&self.store, id)
    }

    pub fn child_folders(&self, parent_id: &str) -> Result<Vec<Folder>> {
        commands::folders::children(&self.store, parent_id)
    }

    pub fn rename_folder(&mut self, id: &str, name: &str) -> Result<Folder> {
        commands::folders::rename(&mut self.store, id, name)
    }

    pub fn move_folder(&mut self, id: &str, new_parent_id: &str) -> Result<Folder> {
        commands::folders::move_to(&mut self.store, id, new_parent_id)
    }

    pub fn delete_folder(&mut self, id: &str, recursive: bool) -> Result<DeleteSummary> {
        commands::delete::delete_folder(&mut self.store, id, recursive)
    }

    // --- Files ---

    pub fn create_file(&mut self, name: &str, folder_id: &str, content: &str) -> Result<String> {
        commands::files::create(&mut self.store, name, folder_id, content)
    }

    pub fn get_file(&self, id: &str) -> Result<File> {
        commands::files::get(&self.store, id)
    }

    pub fn files_in_folder(&self, folder_id: &str) -> Result<Vec<File>> {
        commands::files::in_folder(&self.store, folder_id)
    }

    pub fn rename_file(&mut self, id: &str, name: &str) -> Result<File> {
        commands::files::rename(&mut self.store, id, name)
    }

    pub fn update_file_content(&mut self, id: &str, content: &str) -> Result<File> {
        commands::files::update_content(&mut self.store, id, content)
    }

    pub fn move_file(&mut self, id: &str, folder_id: &str) -> Result<File> {
        commands::files::move_to(&mut self.store, id, folder_id)
    }

    pub fn delete_file(&mut self, id: &str) -> Result<()> {
        commands::delete::delete_file(&mut self.store, id)
    }

    // --- Selection ---

    pub fn app_state(&self) -> Result<AppState> {
        commands::selection::current(&self.store)
    }

    pub fn set_active_file(&mut self, id: Option<&str>) -> Result<SelectionChange> {
        commands::selection::set_active_file(&mut self.store, id)
    }

    pub fn set_active_folder(&mut self, id: Option<&str>) -> Result<SelectionChange> {
        commands::selection::set_active_folder(&mut self.store, id)
    }

    pub fn ui_settings(&self) -> Result<UiSettings> {
        commands::selection::ui_settings(&self.store)
    }

    pub fn update_ui_settings(&mut self, patch: &UiSettingsPatch) -> Result<UiSettings> {
        commands::selection::update_ui_settings(&mut self.store, patch)
    }

    // --- Tree, export, import ---

    pub fn tree(&self) -> Result<TreeListing> {
        commands::tree::list(&self.store)
    }

    pub fn export(&self) -> Result<ExportData> {
        commands::export::run(&self.store)
    }

    pub fn export_json(&self) -> Result<String> {
        commands::export::to_json(&self.store)
    }

    /// Import a parsed export document. Failures are reported in the result.
    pub fn import(&mut self, payload: &serde_json::Value, strategy: MergeStrategy) -> ImportResult {
        commands::import::run(&mut self.store, payload, strategy)
    }

    pub fn import_json(&mut self, json: &str, strategy: MergeStrategy) -> ImportResult {
        commands::import::from_json(&mut self.store, json, strategy)
    }

    pub fn import_data(&mut self, data: &ExportData, strategy: MergeStrategy) -> ImportResult {
        commands::import::import_data(&mut self.store, data, strategy)
    }

    // --- Maintenance ---

    pub fn doctor(&mut self) -> Result<DoctorReport> {
        commands::doctor::run(&mut self.store, &self.root_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NoteboxError;
    use crate::model::{DEFAULT_ROOT_NAME, ROOT_FOLDER_ID};
    use crate::store::memory::InMemoryStore;

    fn api() -> NoteboxApi<InMemoryStore> {
        NoteboxApi::new(InMemoryStore::new(), DEFAULT_ROOT_NAME).unwrap()
    }

    #[test]
    fn new_seeds_root_and_state() {
        let api = api();
        assert_eq!(api.get_folder(ROOT_FOLDER_ID).unwrap().name, DEFAULT_ROOT_NAME);
        assert_eq!(
            api.app_state().unwrap().active_folder_id.as_deref(),
            Some(ROOT_FOLDER_ID)
        );
    }

    #[test]
    fn crud_dispatch() {
        let mut api = api();
        let folder = api.create_folder("Notes", ROOT_FOLDER_ID).unwrap();
        let file = api.create_file("a.md", &folder, "").unwrap();

        api.update_file_content(&file, "body").unwrap();
        api.rename_file(&file, "b.md").unwrap();

        let files = api.files_in_folder(&folder).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "b.md");
        assert_eq!(files[0].content, "body");
        assert_eq!(api.child_folders(ROOT_FOLDER_ID).unwrap().len(), 1);
    }

    #[test]
    fn delete_dispatch_guards_root() {
        let mut api = api();
        assert!(matches!(
            api.delete_folder(ROOT_FOLDER_ID, true),
            Err(NoteboxError::InvalidOperation(_))
        ));
    }

    #[test]
    fn export_import_through_api() {
        let mut api = api();
        api.create_file("a.md", ROOT_FOLDER_ID, "x").unwrap();
        let json = api.export_json().unwrap();

        let result = api.import_json(&json, MergeStrategy::Duplicate);

        assert!(result.success);
        assert_eq!(api.tree().unwrap().files.len(), 2);
    }

    #[test]
    fn doctor_uses_configured_root_name() {
        let mut api = NoteboxApi::new(InMemoryStore::new(), "Home").unwrap();
        api.store_mut().delete::<Folder>(ROOT_FOLDER_ID).unwrap();

        let report = api.doctor().unwrap();

        assert!(report.reseeded_root);
        assert_eq!(api.get_folder(ROOT_FOLDER_ID).unwrap().name, "Home");
    }
}
