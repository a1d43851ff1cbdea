use std::io;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an operation could not produce its primary result.
///
/// The category only selects the diagnostic text. The fallback value handed
/// back to the caller is decided by the operation, never by the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    DivideByZero,
    TypeMismatch,
    NotFound,
    PermissionDenied,
    #[serde(rename = "decode_error")]
    Decode,
    #[serde(rename = "encoding_error")]
    Encoding,
    NotAFile,
    #[serde(rename = "unexpected_error")]
    Unexpected,
}

impl FailureCategory {
    /// Stable identifier used in logs and serialized outcomes.
    pub fn code(self) -> &'static str {
        match self {
            FailureCategory::DivideByZero => "divide_by_zero",
            FailureCategory::TypeMismatch => "type_mismatch",
            FailureCategory::NotFound => "not_found",
            FailureCategory::PermissionDenied => "permission_denied",
            FailureCategory::Decode => "decode_error",
            FailureCategory::Encoding => "encoding_error",
            FailureCategory::NotAFile => "not_a_file",
            FailureCategory::Unexpected => "unexpected_error",
        }
    }
}

impl std::fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Recoverable failures raised inside the conversion utilities.
///
/// Each variant maps to exactly one [`FailureCategory`]. These errors do not
/// leave the crate's public operations; [`crate::Outcome::recover`] turns
/// them into a fallback value plus a diagnostic.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("division by zero: {0}")]
    DivideByZero(String),
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("encoding error: {0}")]
    Encoding(String),
    #[error("path is not a file: {0}")]
    NotAFile(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl ConversionError {
    pub fn category(&self) -> FailureCategory {
        match self {
            ConversionError::DivideByZero(_) => FailureCategory::DivideByZero,
            ConversionError::TypeMismatch(_) => FailureCategory::TypeMismatch,
            ConversionError::NotFound(_) => FailureCategory::NotFound,
            ConversionError::PermissionDenied(_) => FailureCategory::PermissionDenied,
            ConversionError::Decode(_) => FailureCategory::Decode,
            ConversionError::Encoding(_) => FailureCategory::Encoding,
            ConversionError::NotAFile(_) => FailureCategory::NotAFile,
            ConversionError::Unexpected(_) => FailureCategory::Unexpected,
        }
    }

    /// Classify an I/O failure on `path`, most specific kind first.
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        let path = path.display();
        match err.kind() {
            io::ErrorKind::NotFound => ConversionError::NotFound(format!("{path}")),
            io::ErrorKind::PermissionDenied => ConversionError::PermissionDenied(format!("{path}")),
            io::ErrorKind::InvalidData => {
                ConversionError::Encoding(format!("{path}: content is not valid UTF-8"))
            }
            _ => ConversionError::Unexpected(format!("{path}: {err}")),
        }
    }
}

/// Result type for the fallible inner steps of each operation.
pub type Result<T> = std::result::Result<T, ConversionError>;
