//! Error types for decoding, encoding and field binding.

use std::fmt;
use std::path::PathBuf;

use fixlen_model::SchemaError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::binder::FieldKind;

/// Kind of defect found while validating a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefectKind {
    /// Line has more characters than the schema's total width.
    LineTooLong,
    /// Line has fewer characters than the schema's total width.
    LineTooShort,
    /// A column is empty after trimming.
    EmptyColumn,
}

impl DefectKind {
    /// Short human-readable description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::LineTooLong => "line is too long",
            Self::LineTooShort => "line is too short",
            Self::EmptyColumn => "column is empty",
        }
    }
}

impl fmt::Display for DefectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A defect recorded for one input line.
///
/// Every defect is kept in the decoder's diagnostics, whether or not a
/// tolerance let decoding continue past it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseError {
    /// 1-based line number.
    pub line_number: usize,
    /// Offending column, for [`DefectKind::EmptyColumn`].
    pub column: Option<String>,
    pub kind: DefectKind,
}

impl ParseError {
    /// A defect concerning the whole line.
    #[must_use]
    pub fn line(line_number: usize, kind: DefectKind) -> Self {
        Self {
            line_number,
            column: None,
            kind,
        }
    }

    /// An empty-column defect.
    pub fn empty_column(line_number: usize, column: impl Into<String>) -> Self {
        Self {
            line_number,
            column: Some(column.into()),
            kind: DefectKind::EmptyColumn,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.column {
            Some(column) => write!(
                f,
                "error parsing line {}, column '{}': {}",
                self.line_number, column, self.kind
            ),
            None => write!(f, "error parsing line {}: {}", self.line_number, self.kind),
        }
    }
}

impl std::error::Error for ParseError {}

/// Errors raised while mapping tokens to and from record fields.
///
/// Binding errors only concern the record being bound; they never end a
/// decoding session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// Token text could not be converted to the field's type.
    #[error("cannot convert '{value}' to {kind} for field '{field}': {reason}")]
    Coercion {
        field: String,
        value: String,
        kind: FieldKind,
        reason: String,
    },

    /// The record declares the field with a type the binder cannot handle.
    #[error("field '{field}' has unsupported type {type_name}")]
    UnsupportedFieldType {
        field: String,
        type_name: &'static str,
    },
}

impl BindError {
    /// Create a Coercion error.
    pub fn coercion(
        field: impl Into<String>,
        value: impl Into<String>,
        kind: FieldKind,
        reason: impl Into<String>,
    ) -> Self {
        Self::Coercion {
            field: field.into(),
            value: value.into(),
            kind,
            reason: reason.into(),
        }
    }
}

/// Errors that can occur when decoding or encoding fixed-width records.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Schema could not be built.
    ///
    /// Decoders and encoders take a built schema, so the codec never raises
    /// this itself; it lets callers build a schema and decode in one
    /// function returning [`Result`].
    #[error("invalid schema: {0}")]
    InvalidSchema(#[from] SchemaError),

    /// A line failed validation and no tolerance covered it.
    #[error(transparent)]
    Decode(#[from] ParseError),

    /// Field binding failed.
    #[error(transparent)]
    Bind(#[from] BindError),

    /// `next_record` was called without a successful `has_next`.
    #[error("no pending line: has_next() must return true before next_record()")]
    NoPendingLine,

    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// I/O error from the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    /// The recorded defect, when this is a decode error.
    #[must_use]
    pub fn defect(&self) -> Option<&ParseError> {
        match self {
            Self::Decode(defect) => Some(defect),
            _ => None,
        }
    }
}

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
