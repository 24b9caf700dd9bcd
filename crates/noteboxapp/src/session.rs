//! # Session
//!
//! The view-side half of notebox: an in-memory projection of the tree that a
//! UI renders from, kept in step with the store.
//!
//! ## Refresh
//!
//! [`Session::refresh`] reloads every folder, every file and the selection
//! from the store. Only one refresh runs at a time. A refresh requested while
//! another is in flight is dropped, not queued, and reports
//! [`RefreshOutcome::Skipped`]; the view is eventually consistent with the
//! store, not guaranteed to reflect the very latest write.
//!
//! Structural operations (create, rename, move, delete, import) write through
//! the API and then refresh.
//!
//! ## Content edits
//!
//! [`Session::edit_content`] never refreshes. It patches the one file in the
//! view and arms a trailing-edge timer for that file id; every further edit
//! of the same file resets the timer, so a burst of keystrokes becomes a
//! single write of the latest text once the file has been quiet for the
//! configured delay. Between writes the view is authoritative: a refresh
//! keeps unsaved text over what it loaded.
//!
//! A debounced write that fails is logged and the edit stays unsaved.
//! [`Session::flush`] writes every unsaved edit immediately and returns the
//! first failure. An edit whose file has been deleted is discarded, along
//! with its pending timer.
//!
//! ## Blocking
//!
//! The API sits behind a `std::sync::Mutex` and every store call does file
//! I/O, so async methods never take that lock on a runtime worker. They hand
//! the call to `spawn_blocking` instead. [`Session::with_api`] is the
//! synchronous escape hatch and blocks the calling thread.

use crate::api::NoteboxApi;
use crate::commands::delete::DeleteSummary;
use crate::error::{NoteboxError, Result};
use crate::init::NoteboxContext;
use crate::model::{File, Folder, ImportResult, MergeStrategy};
use crate::store::fs::FileStore;
use crate::store::{DataStore, RecordKind};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed,
    /// Another refresh was running; this one did nothing.
    Skipped,
}

/// What a UI renders: the tree and the selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeView {
    pub folders: Vec<Folder>,
    pub files: Vec<File>,
    pub active_file_id: Option<String>,
    pub active_folder_id: Option<String>,
}

impl TreeView {
    pub fn file(&self, id: &str) -> Option<&File> {
        self.files.iter().find(|f| f.id == id)
    }

    pub fn folder(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }
}

#[derive(Default)]
struct ViewState {
    view: TreeView,
    /// Unsaved edits: file id to the edit generation last applied.
    unsaved: HashMap<String, u64>,
    generation: u64,
}

pub struct Session<S: DataStore + Send + 'static> {
    api: Arc<Mutex<NoteboxApi<S>>>,
    state: Arc<RwLock<ViewState>>,
    refresh_gate: tokio::sync::Mutex<()>,
    timers: tokio::sync::Mutex<HashMap<String, JoinHandle<()>>>,
    debounce: Duration,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| NoteboxError::Store("session lock poisoned".to_string()))
}

fn poisoned<E>(_: E) -> NoteboxError {
    NoteboxError::Store("session view poisoned".to_string())
}

fn join_failed(e: tokio::task::JoinError) -> NoteboxError {
    NoteboxError::Store(format!("store task failed: {}", e))
}

impl<S: DataStore + Send + 'static> Session<S> {
    /// Wrap an API. The view starts empty; call [`Session::refresh`] or use
    /// [`Session::load`].
    pub fn new(api: NoteboxApi<S>, debounce: Duration) -> Self {
        Self {
            api: Arc::new(Mutex::new(api)),
            state: Arc::new(RwLock::new(ViewState::default())),
            refresh_gate: tokio::sync::Mutex::new(()),
            timers: tokio::sync::Mutex::new(HashMap::new()),
            debounce,
        }
    }

    pub async fn load(api: NoteboxApi<S>, debounce: Duration) -> Result<Self> {
        let session = Self::new(api, debounce);
        session.refresh().await?;
        Ok(session)
    }

    /// Run `f` against the API on the calling thread. Does not touch the view.
    pub fn with_api<T>(&self, f: impl FnOnce(&mut NoteboxApi<S>) -> Result<T>) -> Result<T> {
        let mut api = lock(&*self.api)?;
        f(&mut *api)
    }

    /// Run `f` against the API on the blocking pool.
    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut NoteboxApi<S>) -> Result<T> + Send + 'static,
    {
        let shared = Arc::clone(&self.api);
        tokio::task::spawn_blocking(move || {
            let mut api = lock(&*shared)?;
            f(&mut *api)
        })
        .await
        .map_err(join_failed)?
    }

    /// Snapshot of the current view.
    pub fn view(&self) -> Result<TreeView> {
        Ok(self.state.read().map_err(poisoned)?.view.clone())
    }

    /// The active file, if one is selected and present in the view.
    pub fn active_file(&self) -> Result<Option<File>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .view
            .active_file_id
            .as_deref()
            .and_then(|id| state.view.file(id))
            .cloned())
    }

    pub fn has_unsaved_edits(&self) -> Result<bool> {
        Ok(!self.state.read().map_err(poisoned)?.unsaved.is_empty())
    }

    // --- Refresh ---

    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        let Ok(_guard) = self.refresh_gate.try_lock() else {
            log::debug!("Refresh already in flight, dropping request");
            return Ok(RefreshOutcome::Skipped);
        };

        let (listing, app_state) = self
            .blocking(|api| Ok((api.tree()?, api.app_state()?)))
            .await?;

        let mut state = self.state.write().map_err(poisoned)?;
        let mut files = listing.files;
        for file in &mut files {
            if state.unsaved.contains_key(&file.id) {
                if let Some(local) = state.view.file(&file.id) {
                    file.content = local.content.clone();
                }
            }
        }
        state.view = TreeView {
            folders: listing.folders,
            files,
            active_file_id: app_state.active_file_id,
            active_folder_id: app_state.active_folder_id,
        };
        Ok(RefreshOutcome::Refreshed)
    }

    async fn after_write(&self) {
        if let Err(e) = self.refresh().await {
            log::error!("Refresh after write failed: {}", e);
        }
    }

    // --- Structural operations ---

    pub async fn create_folder(&self, name: &str, parent_id: &str) -> Result<String> {
        let (name, parent_id) = (name.to_string(), parent_id.to_string());
        let id = self
            .blocking(move |api| api.create_folder(&name, &parent_id))
            .await?;
        self.after_write().await;
        Ok(id)
    }

    pub async fn create_file(&self, name: &str, folder_id: &str, content: &str) -> Result<String> {
        let (name, folder_id, content) =
            (name.to_string(), folder_id.to_string(), content.to_string());
        let id = self
            .blocking(move |api| api.create_file(&name, &folder_id, &content))
            .await?;
        self.after_write().await;
        Ok(id)
    }

    pub async fn rename_folder(&self, id: &str, name: &str) -> Result<()> {
        let (id, name) = (id.to_string(), name.to_string());
        self.blocking(move |api| api.rename_folder(&id, &name))
            .await?;
        self.after_write().await;
        Ok(())
    }

    pub async fn rename_file(&self, id: &str, name: &str) -> Result<()> {
        let (id, name) = (id.to_string(), name.to_string());
        self.blocking(move |api| api.rename_file(&id, &name)).await?;
        self.after_write().await;
        Ok(())
    }

    pub async fn move_folder(&self, id: &str, new_parent_id: &str) -> Result<()> {
        let (id, new_parent_id) = (id.to_string(), new_parent_id.to_string());
        self.blocking(move |api| api.move_folder(&id, &new_parent_id))
            .await?;
        self.after_write().await;
        Ok(())
    }

    pub async fn move_file(&self, id: &str, folder_id: &str) -> Result<()> {
        let (id, folder_id) = (id.to_string(), folder_id.to_string());
        self.blocking(move |api| api.move_file(&id, &folder_id))
            .await?;
        self.after_write().await;
        Ok(())
    }

    pub async fn delete_file(&self, id: &str) -> Result<()> {
        self.cancel_timer(id).await;
        let owned = id.to_string();
        self.blocking(move |api| api.delete_file(&owned)).await?;
        self.forget_edit(id)?;
        self.after_write().await;
        Ok(())
    }

    /// Delete a folder, discarding unsaved edits of every file that went
    /// with it.
    pub async fn delete_folder(&self, id: &str, recursive: bool) -> Result<DeleteSummary> {
        let owned = id.to_string();
        let summary = self
            .blocking(move |api| api.delete_folder(&owned, recursive))
            .await?;
        if summary.files_deleted > 0 {
            self.discard_orphaned_edits().await?;
        }
        self.after_write().await;
        Ok(summary)
    }

    pub async fn import(
        &self,
        payload: &serde_json::Value,
        strategy: MergeStrategy,
    ) -> Result<ImportResult> {
        let payload = payload.clone();
        let result = self
            .blocking(move |api| Ok(api.import(&payload, strategy)))
            .await?;
        self.after_write().await;
        Ok(result)
    }

    // --- Selection ---

    /// Select a file. If the view does not hold it yet, it is fetched from the
    /// store by id. An id the store does not know is still selected;
    /// [`Session::active_file`] then returns `None`.
    pub async fn set_active_file(&self, id: Option<&str>) -> Result<Option<File>> {
        let owned = id.map(str::to_string);
        let missing_locally = match id {
            Some(id) => self.state.read().map_err(poisoned)?.view.file(id).is_none(),
            None => false,
        };
        let fetched = self
            .blocking(move |api| {
                api.set_active_file(owned.as_deref())?;
                match owned {
                    Some(id) if missing_locally => match api.get_file(&id) {
                        Ok(file) => Ok(Some(file)),
                        Err(NoteboxError::NotFound { .. }) => Ok(None),
                        Err(e) => Err(e),
                    },
                    _ => Ok(None),
                }
            })
            .await?;

        {
            let mut state = self.state.write().map_err(poisoned)?;
            if let Some(file) = fetched {
                state.view.files.push(file);
            }
            state.view.active_file_id = id.map(str::to_string);
        }
        self.active_file()
    }

    pub async fn set_active_folder(&self, id: Option<&str>) -> Result<()> {
        let owned = id.map(str::to_string);
        self.blocking(move |api| api.set_active_folder(owned.as_deref()))
            .await?;
        self.state.write().map_err(poisoned)?.view.active_folder_id = id.map(str::to_string);
        Ok(())
    }

    // --- Content edits ---

    /// Patch a file's content in the view and schedule its debounced write.
    pub async fn edit_content(&self, id: &str, content: &str) -> Result<()> {
        {
            let mut state = self.state.write().map_err(poisoned)?;
            let Some(file) = state.view.files.iter_mut().find(|f| f.id == id) else {
                return Err(NoteboxError::not_found(RecordKind::File, id));
            };
            file.content = content.to_string();
            state.generation += 1;
            let generation = state.generation;
            state.unsaved.insert(id.to_string(), generation);
        }

        let mut timers = self.timers.lock().await;
        if let Some(previous) = timers.remove(id) {
            previous.abort();
        }

        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        let delay = self.debounce;
        let file_id = id.to_string();
        let handle = tokio::spawn(async move {
            sleep(delay).await;
            let saved = tokio::task::spawn_blocking(move || {
                write_unsaved(&*api, &*state, &file_id).map_err(|e| (file_id, e))
            })
            .await;
            match saved {
                Ok(Ok(())) => {}
                Ok(Err((file_id, e))) => log::error!("Saving file {} failed: {}", file_id, e),
                Err(e) => log::error!("Save task failed: {}", e),
            }
        });
        timers.insert(id.to_string(), handle);
        Ok(())
    }

    /// Write every unsaved edit now, cancelling their timers.
    pub async fn flush(&self) -> Result<()> {
        {
            let mut timers = self.timers.lock().await;
            for (_, handle) in timers.drain() {
                handle.abort();
            }
        }

        let ids: Vec<String> = self
            .state
            .read()
            .map_err(poisoned)?
            .unsaved
            .keys()
            .cloned()
            .collect();

        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        let failures = tokio::task::spawn_blocking(move || {
            ids.into_iter()
                .filter_map(|id| write_unsaved(&*api, &*state, &id).err().map(|e| (id, e)))
                .collect::<Vec<_>>()
        })
        .await
        .map_err(join_failed)?;

        let mut first_error = None;
        for (id, e) in failures {
            log::error!("Saving file {} failed: {}", id, e);
            first_error.get_or_insert(e);
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Drop unsaved edits, and their timers, for files the store no longer has.
    async fn discard_orphaned_edits(&self) -> Result<()> {
        let ids: Vec<String> = self
            .state
            .read()
            .map_err(poisoned)?
            .unsaved
            .keys()
            .cloned()
            .collect();
        if ids.is_empty() {
            return Ok(());
        }

        let gone = self
            .blocking(move |api| {
                let mut gone = Vec::new();
                for id in ids {
                    match api.get_file(&id) {
                        Ok(_) => {}
                        Err(NoteboxError::NotFound { .. }) => gone.push(id),
                        Err(e) => return Err(e),
                    }
                }
                Ok(gone)
            })
            .await?;

        for id in &gone {
            log::debug!("Discarding unsaved edit of deleted file {}", id);
            self.cancel_timer(id).await;
            self.forget_edit(id)?;
        }
        Ok(())
    }

    async fn cancel_timer(&self, id: &str) {
        if let Some(handle) = self.timers.lock().await.remove(id) {
            handle.abort();
        }
    }

    fn forget_edit(&self, id: &str) -> Result<()> {
        self.state.write().map_err(poisoned)?.unsaved.remove(id);
        Ok(())
    }
}

impl Session<FileStore> {
    /// Open a session over an initialized context, saving edits after the
    /// configured `save_debounce_ms`.
    pub async fn from_context(ctx: NoteboxContext) -> Result<Self> {
        let debounce = ctx.config.save_debounce();
        Self::load(ctx.api, debounce).await
    }
}

/// Persist the view's current text for `id` if it has an unsaved edit. An
/// edit of a file that is gone from the view or the store is dropped.
fn write_unsaved<S: DataStore>(
    api: &Mutex<NoteboxApi<S>>,
    state: &RwLock<ViewState>,
    id: &str,
) -> Result<()> {
    let pending = {
        let state = state.read().map_err(poisoned)?;
        let Some(generation) = state.unsaved.get(id).copied() else {
            return Ok(());
        };
        state
            .view
            .file(id)
            .map(|file| (file.content.clone(), generation))
    };
    let Some((content, generation)) = pending else {
        state.write().map_err(poisoned)?.unsaved.remove(id);
        return Ok(());
    };

    let result = lock(api)?.update_file_content(id, &content);
    let saved = match result {
        Ok(saved) => saved,
        Err(NoteboxError::NotFound { .. }) => {
            log::debug!("File {} is gone, dropping its unsaved edit", id);
            state.write().map_err(poisoned)?.unsaved.remove(id);
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    log::debug!("Saved content of {}", id);

    let mut state = state.write().map_err(poisoned)?;
    if state.unsaved.get(id) == Some(&generation) {
        state.unsaved.remove(id);
        if let Some(file) = state.view.files.iter_mut().find(|f| f.id == id) {
            file.updated_at = saved.updated_at;
        }
    }
    Ok(())
}
