//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the navigation data invariants.
/// These are independent of where the data came from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("malformed navigation tree at {at}: {reason}")]
    MalformedTree { at: String, reason: String },

    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("invalid locator {locator:?}: {reason}")]
    InvalidLocator { locator: String, reason: String },

    #[error("invalid fragment id {id:?}: {reason}")]
    InvalidFragmentId { id: String, reason: String },

    #[error("index position {position} out of range (length {length})")]
    IndexOutOfRange { position: usize, length: usize },

    #[error("script does not define {0}")]
    MissingBinding(String),
}

impl DomainError {
    pub(crate) fn malformed(at: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedTree {
            at: at.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
