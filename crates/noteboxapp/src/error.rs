use crate::store::RecordKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NoteboxError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Invalid import data format: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

impl NoteboxError {
    pub fn not_found(kind: RecordKind, id: impl Into<String>) -> Self {
        NoteboxError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NoteboxError>;
