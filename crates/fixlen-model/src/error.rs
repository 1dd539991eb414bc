//! Error types for schema construction and loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or loading a [`Schema`](crate::Schema).
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A column was declared without a name.
    #[error("column {index} has an empty name")]
    EmptyName { index: usize },

    /// A column width was zero or negative.
    #[error("column '{name}' has invalid width {width} (must be greater than 0)")]
    InvalidWidth { name: String, width: i64 },

    /// Adding this column's width overflows the total record width.
    #[error("column '{name}' makes the total record width overflow")]
    WidthOverflow { name: String },

    /// Two columns share a name.
    #[error("duplicate column name: {name}")]
    DuplicateColumn { name: String },

    /// Schema document file does not exist.
    #[error("schema file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Schema document is not valid JSON or has the wrong shape.
    #[error("invalid schema document: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while reading a schema document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

impl SchemaError {
    /// Create an InvalidWidth error.
    pub fn invalid_width(name: impl Into<String>, width: i64) -> Self {
        Self::InvalidWidth {
            name: name.into(),
            width,
        }
    }

    /// Create a DuplicateColumn error.
    pub fn duplicate_column(name: impl Into<String>) -> Self {
        Self::DuplicateColumn { name: name.into() }
    }
}
