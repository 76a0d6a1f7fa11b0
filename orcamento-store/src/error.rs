//! Store error types.

use orcamento_core::{CoreError, QuoteId};
use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A stored value exists but does not have the expected shape.
    #[error("Corrupt record under '{key}': {source}")]
    CorruptRecord {
        /// Storage key holding the bad value.
        key: String,
        /// Parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// No quote with this id.
    #[error("Quote not found: {0}")]
    QuoteNotFound(QuoteId),

    /// Storage key that cannot be mapped onto the backend.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Domain error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Returns true if the error came from stored data rather than the medium.
    pub fn is_corrupt_data(&self) -> bool {
        matches!(self, StoreError::CorruptRecord { .. })
    }
}
