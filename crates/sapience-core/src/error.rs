//! Error types for the Sapience workbench.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::method::MethodKind;

/// A shared error type for the entire workbench.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait. All operations fail closed:
/// an error means no partial mutation of workspace state is visible.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum SapienceError {
    /// A required field or precondition is missing (e.g. minimizing a
    /// window before a text column was chosen).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A second window with the same method/column pair is already
    /// minimized in the tray.
    #[error("Duplicate tray entry: {method} on column '{column}'")]
    DuplicateTray { method: MethodKind, column: String },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Authentication failure while decrypting a project container
    /// (wrong key or corrupted bytes).
    #[error("Decryption error: {0}")]
    Decryption(String),

    /// The container decrypted cleanly but the document inside does not
    /// match the project schema.
    #[error("Malformed project document: {0}")]
    MalformedDocument(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SapienceError {
    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Decryption error
    pub fn decryption(message: impl Into<String>) -> Self {
        Self::Decryption(message.into())
    }

    /// Creates a MalformedDocument error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a Decryption error
    pub fn is_decryption(&self) -> bool {
        matches!(self, Self::Decryption(_))
    }

    /// Check if this is a DuplicateTray error
    pub fn is_duplicate_tray(&self) -> bool {
        matches!(self, Self::DuplicateTray { .. })
    }
}

impl From<std::io::Error> for SapienceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for SapienceError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedDocument(err.to_string())
    }
}

/// Conversion from collaborator errors (profiler/analysis services).
impl From<anyhow::Error> for SapienceError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, SapienceError>`.
pub type Result<T> = std::result::Result<T, SapienceError>;
