use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::schema::TypeTag;

/// Call-level failure of a parse or write.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("cannot open {path} as a spreadsheet: {message}")]
    Container { path: PathBuf, message: String },

    #[error("no backend available for {path} (enable the matching feature)")]
    UnsupportedFormat { path: PathBuf },

    #[error("{backend} backend error: {message}")]
    Backend { backend: String, message: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no records to write")]
    NothingToWrite,

    #[error("failed writing cell at row {row}, column {col}: {message}")]
    Write { row: u32, col: u32, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl BindError {
    pub fn container(path: &Path, err: impl std::fmt::Display) -> Self {
        BindError::Container {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    pub fn from_backend(backend: &str, err: impl std::fmt::Display) -> Self {
        BindError::Backend {
            backend: backend.to_string(),
            message: err.to_string(),
        }
    }
}

/// A single cell could not be converted into its field's declared type.
///
/// Always recovered: the field keeps its default value and the error goes to
/// the diagnostics sink.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionError {
    #[error("boolean cell cannot populate a {target} field")]
    BooleanTarget { target: TypeTag },

    #[error("expected a {expected} value, found {found}")]
    TypeMismatch { expected: TypeTag, found: String },

    #[error("'{text}' does not match date format '{format}'")]
    DateParse { text: String, format: String },

    #[error("serial {0} is not a representable date")]
    DateOutOfRange(f64),
}

impl CoercionError {
    pub fn is_date_parse(&self) -> bool {
        matches!(self, CoercionError::DateParse { .. })
    }
}

pub type Result<T> = std::result::Result<T, BindError>;
