//! Error types for typed error handling.
//!
//! Cache operations themselves never fail with an error: they report misses
//! and refusals through `bool`/`Option` return values. The errors here cover
//! the seams around them: backend registration and storage media.

/// Result type for cachet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Cachet errors with structured context.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A backend with the same identifier is already registered.
    #[error("cache implementation already registered: {identifier}")]
    DuplicateImplementation { identifier: String },

    /// The storage medium cannot be used in this environment.
    #[error("storage medium unavailable: {reason}")]
    Unavailable { reason: String },

    /// A storage medium operation failed.
    #[error("storage error on '{key}': {reason}")]
    Storage { key: String, reason: String },

    /// Entry could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

impl Error {
    /// Create a duplicate implementation error.
    pub fn duplicate_implementation(identifier: impl Into<String>) -> Self {
        Self::DuplicateImplementation {
            identifier: identifier.into(),
        }
    }

    /// Create an unavailable medium error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Create a storage error for a key.
    pub fn storage(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::Storage {
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}
