// SPDX-License-Identifier: PMPL-1.0-or-later
//! Index error types.

use thiserror::Error;

/// Errors raised while building, filling or searching an issue index.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field declared twice: {0}")]
    DuplicateField(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Index error: {0}")]
    Tantivy(#[from] tantivy::TantivyError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tantivy::directory::error::OpenDirectoryError> for IndexError {
    fn from(e: tantivy::directory::error::OpenDirectoryError) -> Self {
        IndexError::Io(std::io::Error::other(e.to_string()))
    }
}
