//! # CLI Behavior
//!
//! This is **one possible UI client** for notebox, not the application itself.
//! It is the only place that knows about terminal I/O, exit codes and output
//! formatting.
//!
//! ## Naked Execution
//!
//! Running `notebox` with no arguments prints the tree, same as `notebox tree`.
//!
//! ## Ids
//!
//! Records have UUID ids (the root folder is `root`). The tree prints the
//! first eight characters and every command accepts any unique prefix.
//!
//! ## Data Directory
//!
//! `--data <dir>` or `NOTEBOX_DATA` select the store; otherwise the OS data
//! directory is used.
//!
//! ## Module Structure
//!
//! - `setup`: argument parsing via clap
//! - `commands`: context setup, dispatch and per-command handlers
//! - `render`: output formatting

mod commands;
mod render;
pub mod setup;

pub use commands::run;
