//! Error taxonomy for uploaded files and exports.
//!
//! File errors are values, not failures of the batch: the pipeline collects
//! one `FileError` per rejected file and keeps going.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a single uploaded file was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ErrorKind {
    /// Content is empty, oversized, not UTF-8, or not well-formed JSON.
    #[error("parse error: {0}")]
    Parse(String),

    /// Well-formed JSON with the wrong shape (not an object, missing or
    /// mistyped required fields, non-object application entries).
    #[error("schema error: {0}")]
    Schema(String),
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Parse(_) => "parse",
            ErrorKind::Schema(_) => "schema",
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            ErrorKind::Parse(d) | ErrorKind::Schema(d) => d,
        }
    }
}

/// A rejected file, attributable by name.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("error processing {file_name}: {kind}")]
pub struct FileError {
    pub file_name: String,
    pub kind: ErrorKind,
}

impl FileError {
    pub fn parse(file_name: &str, detail: impl Into<String>) -> Self {
        Self {
            file_name: file_name.to_string(),
            kind: ErrorKind::Parse(detail.into()),
        }
    }

    pub fn schema(file_name: &str, detail: impl Into<String>) -> Self {
        Self {
            file_name: file_name.to_string(),
            kind: ErrorKind::Schema(detail.into()),
        }
    }
}

/// Errors while rendering an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize rows: {0}")]
    Serialize(#[from] serde_json::Error),
}
