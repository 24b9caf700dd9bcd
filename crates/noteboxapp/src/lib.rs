//! # Notebox Architecture
//!
//! Notebox is a **UI-agnostic note storage library**: a tree of folders and
//! markdown files kept in a small local key-value store, with JSON export and
//! a reconciling import. The `notebox` binary is one client of it; a desktop
//! or web front end would be another.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Client (the notebox CLI, or any other UI)                  │
//! │  - Parses input, renders output, sources/saves export files │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Session (session.rs), optional                             │
//! │  - In-memory view, single-flight refresh                    │
//! │  - Optimistic content edits with debounced writes           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Tree invariants, cascades, import reconciliation         │
//! │  - Operates on Rust types, returns Rust types               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - DataStore trait: get / get_all / by index / put / delete │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code:
//! - Takes regular Rust function arguments
//! - Returns regular Rust types
//! - **Never** writes to stdout/stderr (diagnostics go through `log`)
//! - **Never** assumes a terminal environment
//!
//! ## Invariants
//!
//! After every operation:
//! 1. exactly one folder has id `"root"` and no parent, and it is never deleted;
//! 2. every other folder's parent exists;
//! 3. every file's folder exists;
//! 4. the parent relation is acyclic;
//! 5. a delete clears any selection pointing at what it removed.
//!
//! Multi-record operations (cascading delete, import) are sequences of
//! independent writes. [`commands::doctor`] repairs what an interrupted one
//! leaves behind.
//!
//! ## Module Overview
//!
//! - [`api`]: the facade, entry point for all operations
//! - [`session`]: view projection and write coalescing for interactive UIs
//! - [`commands`]: business logic
//! - [`store`]: storage abstraction and implementations
//! - [`model`]: `Folder`, `File`, `AppState`, export and import types
//! - [`config`]: configuration
//! - [`init`]: data directory resolution and startup
//! - [`error`]: error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod session;
pub mod store;
