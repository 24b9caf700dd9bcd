//! # Notebox CLI
//!
//! A terminal client for the `noteboxapp` library. The binary is intentionally
//! thin: the CLI lives in `src/cli/` and this file only invokes `cli::run()`
//! and handles process termination.
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/notebox/src/cli/)                        │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring and dispatch (commands.rs)                │
//! │  - Terminal rendering (render.rs)                           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/noteboxapp/src/api.rs)                   │
//! │  - Dispatches to command modules                            │
//! │  - Returns structured values                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything from `api.rs` inward is UI agnostic. The CLI owns argument
//! parsing, id prefix resolution, logging setup, rendering and exit codes.
//!
//! ## Testing Approach
//!
//! - **Library**: command logic is unit tested in `noteboxapp`.
//! - **Rendering**: `render.rs` is tested with canned records.
//! - **End to end**: `tests/cli_e2e.rs` drives the built binary against a
//!   temporary data directory.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
