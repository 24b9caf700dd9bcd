//! Active file/folder and UI settings, all kept in the app state record.
//!
//! Setting a selection never checks that the target exists: a consumer that
//! finds the selected id missing treats it as "nothing selected". Deletes
//! clear selections that point at what they remove.

use crate::error::Result;
use crate::model::{AppState, UiSettings, UiSettingsPatch};
use crate::store::DataStore;

use super::helpers::app_state;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    pub previous: Option<String>,
    pub current: Option<String>,
}

pub fn current<S: DataStore>(store: &S) -> Result<AppState> {
    app_state(store)
}

pub fn set_active_file<S: DataStore>(store: &mut S, id: Option<&str>) -> Result<SelectionChange> {
    let mut state = app_state(store)?;
    let previous = state.active_file_id.take();
    state.active_file_id = id.map(str::to_string);
    if previous != state.active_file_id {
        store.put(&state)?;
    }
    Ok(SelectionChange {
        previous,
        current: state.active_file_id,
    })
}

pub fn set_active_folder<S: DataStore>(
    store: &mut S,
    id: Option<&str>,
) -> Result<SelectionChange> {
    let mut state = app_state(store)?;
    let previous = state.active_folder_id.take();
    state.active_folder_id = id.map(str::to_string);
    if previous != state.active_folder_id {
        store.put(&state)?;
    }
    Ok(SelectionChange {
        previous,
        current: state.active_folder_id,
    })
}

pub fn ui_settings<S: DataStore>(store: &S) -> Result<UiSettings> {
    Ok(app_state(store)?.ui_settings)
}

pub fn update_ui_settings<S: DataStore>(
    store: &mut S,
    patch: &UiSettingsPatch,
) -> Result<UiSettings> {
    let mut state = app_state(store)?;
    state.ui_settings.apply(patch);
    store.put(&state)?;
    Ok(state.ui_settings)
}
