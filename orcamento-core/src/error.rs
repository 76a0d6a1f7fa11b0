//! Core error types for Orçamento.

use thiserror::Error;

/// Core error type for domain-level operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A status string outside the closed set of quote statuses.
    #[error("Invalid quote status: {0}")]
    InvalidStatus(String),

    /// A line item or draft field that cannot be interpreted.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
