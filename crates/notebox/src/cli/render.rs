//! # Rendering Module
//!
//! Turns library values into terminal text. Every function returns a
//! `String`; printing is left to the handlers so the output can be tested
//! without a terminal.
//!
//! Styling goes through `console`, which drops colors when stdout is not a
//! terminal.
//!
//! ## Tree Layout
//!
//! ```text
//! ▾ My Documents  root
//!   • * readme.md  0b9ad2c1  1 day ago
//!   ▾ Recipes  1c0f3a9e
//!     • miso.md  7d21be04  3 minutes ago
//! ```
//!
//! Each folder lists its own files, then its subfolders, both sorted by name.
//! The active file is marked with `*`, the active folder is underlined.

use chrono::{DateTime, Utc};
use console::style;
use noteboxapp::commands::delete::DeleteSummary;
use noteboxapp::commands::doctor::DoctorReport;
use noteboxapp::model::{AppState, File, Folder, ImportResult, TreeListing};
use std::collections::HashMap;

pub const SHORT_ID_LEN: usize = 8;
const INDENT: &str = "  ";

pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

fn time_ago(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = (now - at).to_std().unwrap_or_default();
    timeago::Formatter::new().convert(elapsed)
}

pub fn render_tree(listing: &TreeListing, state: &AppState, now: DateTime<Utc>) -> String {
    let mut child_folders: HashMap<&str, Vec<&Folder>> = HashMap::new();
    let mut roots = Vec::new();
    for folder in &listing.folders {
        match folder.parent_id.as_deref() {
            Some(parent) => child_folders.entry(parent).or_default().push(folder),
            None => roots.push(folder),
        }
    }
    let mut files_by_folder: HashMap<&str, Vec<&File>> = HashMap::new();
    for file in &listing.files {
        files_by_folder
            .entry(file.folder_id.as_str())
            .or_default()
            .push(file);
    }
    for list in child_folders.values_mut() {
        list.sort_by(|a, b| a.name.cmp(&b.name));
    }
    for list in files_by_folder.values_mut() {
        list.sort_by(|a, b| a.name.cmp(&b.name));
    }

    let mut out = String::new();
    // (folder, depth); pushed in reverse so siblings print in order.
    let mut stack: Vec<(&Folder, usize)> = roots.into_iter().rev().map(|f| (f, 0)).collect();
    while let Some((folder, depth)) = stack.pop() {
        let pad = INDENT.repeat(depth);
        let name = if state.active_folder_id.as_deref() == Some(folder.id.as_str()) {
            style(&folder.name).bold().underlined().to_string()
        } else {
            style(&folder.name).bold().to_string()
        };
        out.push_str(&format!(
            "{}▾ {}  {}\n",
            pad,
            name,
            style(short_id(&folder.id)).dim()
        ));

        if let Some(files) = files_by_folder.get(folder.id.as_str()) {
            for file in files {
                let marker = if state.active_file_id.as_deref() == Some(file.id.as_str()) {
                    format!("{} ", style("*").yellow())
                } else {
                    String::new()
                };
                out.push_str(&format!(
                    "{}{}• {}{}  {}  {}\n",
                    pad,
                    INDENT,
                    marker,
                    file.name,
                    style(short_id(&file.id)).dim(),
                    style(time_ago(file.updated_at, now)).italic().dim()
                ));
            }
        }

        if let Some(children) = child_folders.get(folder.id.as_str()) {
            for child in children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }
    out
}

pub fn render_import(result: &ImportResult) -> String {
    let mut out = format!(
        "Imported {} folder(s) and {} file(s).\n",
        result.folders_imported, result.files_imported
    );
    for error in &result.errors {
        out.push_str(&format!("  {} {}\n", style("✗").red(), error));
    }
    out
}

pub fn render_delete(name: &str, summary: &DeleteSummary) -> String {
    if summary.folders_deleted <= 1 && summary.files_deleted == 0 {
        return format!("Deleted folder {}.\n", name);
    }
    format!(
        "Deleted folder {} with {} subfolder(s) and {} file(s).\n",
        name,
        summary.folders_deleted.saturating_sub(1),
        summary.files_deleted
    )
}

pub fn render_doctor(report: &DoctorReport) -> String {
    if report.is_clean() {
        return format!("{}\n", style("No inconsistencies found.").green());
    }
    let mut out = format!("{}\n", style("Inconsistencies found and fixed:").yellow());
    if report.reseeded_root {
        out.push_str("  - Recreated the root folder.\n");
    }
    if report.reseeded_app_state {
        out.push_str("  - Recreated the app state.\n");
    }
    if report.removed_folders > 0 {
        out.push_str(&format!(
            "  - Removed {} folder(s) with a missing parent.\n",
            report.removed_folders
        ));
    }
    if report.removed_files > 0 {
        out.push_str(&format!(
            "  - Removed {} file(s) with a missing folder.\n",
            report.removed_files
        ));
    }
    if report.cleared_selection {
        out.push_str("  - Cleared a selection pointing at a missing item.\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use noteboxapp::model::{Folder, ROOT_FOLDER_ID};

    fn plain() {
        console::set_colors_enabled(false);
    }

    #[test]
    fn short_id_truncates_uuid_but_not_root() {
        assert_eq!(short_id("1c0f3a9e-aaaa-bbbb"), "1c0f3a9e");
        assert_eq!(short_id(ROOT_FOLDER_ID), "root");
    }

    #[test]
    fn tree_nests_and_marks_active_file() {
        plain();
        let now = Utc::now();
        let root = Folder::root("My Documents");
        let recipes = Folder::new("Recipes", ROOT_FOLDER_ID);
        let mut miso = File::new("miso.md", recipes.id.clone(), "");
        miso.updated_at = now - Duration::minutes(3);
        let readme = File::new("readme.md", ROOT_FOLDER_ID, "");
        let state = AppState {
            active_file_id: Some(readme.id.clone()),
            ..Default::default()
        };
        let listing = TreeListing {
            folders: vec![recipes, root],
            files: vec![readme, miso],
        };

        let out = render_tree(&listing, &state, now);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("▾ My Documents  root"));
        assert!(lines[1].starts_with("  • * readme.md"));
        assert!(lines[2].starts_with("  ▾ Recipes"));
        assert!(lines[3].starts_with("    • miso.md"));
        assert!(lines[3].contains("3 minutes ago"));
    }

    #[test]
    fn import_lists_errors() {
        plain();
        let out = render_import(&ImportResult {
            success: false,
            folders_imported: 2,
            files_imported: 0,
            errors: vec!["Failed to import file a.md: Parent folder not found".into()],
        });
        assert!(out.starts_with("Imported 2 folder(s) and 0 file(s)."));
        assert!(out.contains("✗ Failed to import file a.md"));
    }

    #[test]
    fn doctor_clean_and_dirty() {
        plain();
        assert_eq!(
            render_doctor(&DoctorReport::default()),
            "No inconsistencies found.\n"
        );
        let out = render_doctor(&DoctorReport {
            removed_files: 2,
            ..Default::default()
        });
        assert!(out.contains("Removed 2 file(s)"));
    }

    #[test]
    fn delete_summary_wording() {
        let single = DeleteSummary {
            folders_deleted: 1,
            files_deleted: 0,
        };
        assert_eq!(render_delete("a", &single), "Deleted folder a.\n");
        let cascade = DeleteSummary {
            folders_deleted: 3,
            files_deleted: 4,
        };
        assert_eq!(
            render_delete("a", &cascade),
            "Deleted folder a with 2 subfolder(s) and 4 file(s).\n"
        );
    }
}
