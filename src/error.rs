//! Error handling - hierarchical, zero-cost errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Ledger-core error hierarchy.
///
/// Every variant aborts the current invocation before any write is
/// committed; the `kind` string is the machine-readable error class
/// carried in failure responses.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrong arity or an empty required field
    #[error("Validation: {0}")]
    Validation(String),

    /// Unparseable price or timestamp
    #[error("Format: {0}")]
    Format(String),

    /// Referenced entity missing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate identifier within a namespace
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Illegal order lifecycle move
    #[error("Transition: {0}")]
    Transition(String),

    /// Store read/write failure
    #[error("Persistence: {0}")]
    Persistence(String),

    /// Stored bytes not valid for the expected entity shape
    #[error("Decode: {0}")]
    Decode(String),
}

impl Error {
    /// Stable error-kind name for failure responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Format(_) => "format",
            Self::NotFound(_) => "not_found",
            Self::AlreadyExists(_) => "already_exists",
            Self::Transition(_) => "transition",
            Self::Persistence(_) => "persistence",
            Self::Decode(_) => "decode",
        }
    }
}
