//! # CLI Layer
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr, stdin)
//! - Sets exit codes
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: shell arguments to typed commands via clap
//! 2. **Context Setup**: logging, data directory, configuration and API
//! 3. **Dispatch**: one handler per command
//! 4. **Output Formatting**: through `render`
//! 5. **Error Handling**: library errors become `anyhow` errors and exit code 1

use super::render::{render_delete, render_doctor, render_import, render_tree};
use super::setup::{Cli, Commands};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use noteboxapp::api::NoteboxApi;
use noteboxapp::init::{initialize, NoteboxContext};
use noteboxapp::model::ROOT_FOLDER_ID;
use noteboxapp::store::fs::FileStore;
use std::fs;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut ctx = initialize(cli.data.clone())?;
    dispatch(&mut ctx, cli.command.unwrap_or(Commands::Tree))
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn dispatch(ctx: &mut NoteboxContext, command: Commands) -> Result<()> {
    let api = &mut ctx.api;
    match command {
        Commands::Tree => {
            let listing = api.tree()?;
            let state = api.app_state()?;
            print!("{}", render_tree(&listing, &state, Utc::now()));
        }
        Commands::Mkdir { name, parent } => {
            let parent = match parent {
                Some(p) => resolve_folder(api, &p)?,
                None => ROOT_FOLDER_ID.to_string(),
            };
            let id = api.create_folder(&name, &parent)?;
            println!("Created folder {} ({})", name, id);
        }
        Commands::New {
            name,
            folder,
            content,
        } => {
            let folder = match folder {
                Some(f) => resolve_folder(api, &f)?,
                None => default_folder(api),
            };
            let id = api.create_file(&name, &folder, content.as_deref().unwrap_or(""))?;
            println!("Created file {} ({})", name, id);
        }
        Commands::Write { id, content } => {
            let id = resolve_file(api, &id)?;
            let content = match content {
                Some(c) => c,
                None => std::io::read_to_string(std::io::stdin())
                    .context("Failed to read content from stdin")?,
            };
            let file = api.update_file_content(&id, &content)?;
            println!("Saved {}", file.name);
        }
        Commands::Show { id } => {
            let id = resolve_file(api, &id)?;
            let file = api.get_file(&id)?;
            print!("{}", file.content);
            if !file.content.is_empty() && !file.content.ends_with('\n') {
                println!();
            }
        }
        Commands::Rename { id, name, folder } => {
            if folder {
                let id = resolve_folder(api, &id)?;
                let old = api.get_folder(&id)?.name;
                api.rename_folder(&id, &name)?;
                println!("Renamed folder {} to {}", old, name);
            } else {
                let id = resolve_file(api, &id)?;
                let old = api.get_file(&id)?.name;
                api.rename_file(&id, &name)?;
                println!("Renamed {} to {}", old, name);
            }
        }
        Commands::Mv { id, dest, folder } => {
            let dest = resolve_folder(api, &dest)?;
            let dest_name = api.get_folder(&dest)?.name;
            if folder {
                let id = resolve_folder(api, &id)?;
                let moved = api.move_folder(&id, &dest)?;
                println!("Moved folder {} into {}", moved.name, dest_name);
            } else {
                let id = resolve_file(api, &id)?;
                let moved = api.move_file(&id, &dest)?;
                println!("Moved {} into {}", moved.name, dest_name);
            }
        }
        Commands::Rm { id } => {
            let id = resolve_file(api, &id)?;
            let name = api.get_file(&id).map(|f| f.name).unwrap_or_else(|_| id.clone());
            api.delete_file(&id)?;
            println!("Deleted {}", name);
        }
        Commands::Rmdir { id, recursive } => {
            let id = resolve_folder(api, &id)?;
            let name = api.get_folder(&id)?.name;
            let summary = api.delete_folder(&id, recursive)?;
            print!("{}", render_delete(&name, &summary));
        }
        Commands::Select { id, folder } => {
            let target = if id == "none" {
                None
            } else if folder {
                Some(resolve_folder(api, &id)?)
            } else {
                Some(resolve_file(api, &id)?)
            };
            if folder {
                api.set_active_folder(target.as_deref())?;
            } else {
                api.set_active_file(target.as_deref())?;
            }
            match target {
                Some(id) => println!("Selected {}", id),
                None => println!("Selection cleared"),
            }
        }
        Commands::Export { path } => {
            let data = api.export()?;
            let json = serde_json::to_string_pretty(&data)?;
            match path {
                Some(path) => {
                    fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!(
                        "Exported {} folder(s) and {} file(s) to {}",
                        data.folders.len(),
                        data.files.len(),
                        path.display()
                    );
                }
                None => println!("{}", json),
            }
        }
        Commands::Import { path, strategy } => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let strategy = strategy.unwrap_or_else(|| ctx.config.default_strategy());
            let result = api.import_json(&text, strategy);
            print!("{}", render_import(&result));
            if !result.success {
                bail!("Import finished with {} error(s)", result.errors.len());
            }
        }
        Commands::Doctor => {
            let report = api.doctor()?;
            print!("{}", render_doctor(&report));
        }
    }
    Ok(())
}

/// The active folder when it still exists, else the root.
fn default_folder(api: &NoteboxApi<FileStore>) -> String {
    api.app_state()
        .ok()
        .and_then(|state| state.active_folder_id)
        .filter(|id| api.get_folder(id).is_ok())
        .unwrap_or_else(|| ROOT_FOLDER_ID.to_string())
}

fn resolve_folder(api: &NoteboxApi<FileStore>, input: &str) -> Result<String> {
    let listing = api.tree()?;
    resolve_prefix(input, listing.folders.iter().map(|f| f.id.as_str()), "folder")
}

fn resolve_file(api: &NoteboxApi<FileStore>, input: &str) -> Result<String> {
    let listing = api.tree()?;
    resolve_prefix(input, listing.files.iter().map(|f| f.id.as_str()), "file")
}

/// Expand a unique id prefix. An input matching nothing is passed through so
/// the library reports it as not found.
fn resolve_prefix<'a>(
    input: &str,
    ids: impl Iterator<Item = &'a str>,
    kind: &str,
) -> Result<String> {
    let matches: Vec<&str> = ids.filter(|id| id.starts_with(input)).collect();
    if matches.contains(&input) {
        return Ok(input.to_string());
    }
    match matches.as_slice() {
        [] => Ok(input.to_string()),
        [only] => Ok(only.to_string()),
        many => bail!(
            "Ambiguous {} id '{}' matches {} items",
            kind,
            input,
            many.len()
        ),
    }
}
