//! # Command Layer
//!
//! This module contains the **core business logic** of notebox. Each concern
//! lives in its own submodule as plain functions generic over [`DataStore`].
//!
//! ## Role and Responsibilities
//!
//! - Enforce the tree invariants: one undeletable root, no dangling parent or
//!   owning-folder references, no cycles, no dangling selection.
//! - Return typed values (ids, records, reports), never strings for display.
//! - Fail with [`NoteboxError::NotFound`] or
//!   [`NoteboxError::InvalidOperation`] for single-entity misuse.
//!
//! ## What Commands Do NOT Do
//!
//! - **Any I/O** beyond the store: no stdout, no file pickers, no downloads
//! - **Argument parsing**: that's the CLI layer's job
//! - **View state**: the in-memory projection and debounced writes live in
//!   [`crate::session`]
//!
//! ## Layering Inside the Commands
//!
//! `folders`, `files`, `delete` and `selection` are the only modules that write
//! to the store. `import` is layered on top of them and goes through the same
//! functions a UI would call, so imported entities get the same ids,
//! timestamps and checks as hand-made ones.
//!
//! ## Testing Strategy
//!
//! **This is where the lion's share of testing lives.** Tests use
//! `InMemoryStore` (usually through `TreeFixture`) and cover every error
//! branch.
//!
//! ## Command Modules
//!
//! - [`folders`]: create, rename, move and look up folders
//! - [`files`]: create, rename, edit, move and look up files
//! - [`delete`]: file delete and guarded/cascading folder delete
//! - [`selection`]: active file/folder and UI settings
//! - [`tree`]: full listing for client-side tree assembly
//! - [`export`]: serialize the whole tree
//! - [`import`]: validate, remap and merge a foreign export
//! - [`doctor`]: consistency sweep after interrupted multi-record operations
//! - [`helpers`]: shared lookups
//!
//! [`DataStore`]: crate::store::DataStore
//! [`NoteboxError::NotFound`]: crate::error::NoteboxError::NotFound
//! [`NoteboxError::InvalidOperation`]: crate::error::NoteboxError::InvalidOperation

pub mod delete;
pub mod doctor;
pub mod export;
pub mod files;
pub mod folders;
pub mod helpers;
pub mod import;
pub mod selection;
pub mod tree;
