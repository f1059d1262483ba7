//! Error types for port operations.

use branchline_domain::CurrencyKind;

/// Repository operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Database operation failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RepoError {
    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a Serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }
}

/// Errors from the currency ledger collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("Insufficient {kind}: {needed} needed")]
    InsufficientFunds { kind: CurrencyKind, needed: u32 },
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}

/// Errors from the reward-media collaborator (rewarded ads and the like).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RewardError {
    #[error("No reward available")]
    Unavailable,
    #[error("Reward was cancelled before completion")]
    Cancelled,
}

/// Errors from the remote completion recorder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecorderError {
    #[error("Completion recording failed: {0}")]
    Failed(String),
}
