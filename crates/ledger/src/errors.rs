//! Error types for the ledger engine

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Bad assignment payload: unknown item/member reference, negative
    /// share, or a per-item share sum off by more than rounding tolerance.
    /// Nothing is persisted; the caller recomputes and retries.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Group not found: {0}")]
    GroupNotFound(String),

    /// Another save for the same group is in flight. The caller retries
    /// after it commits; neither write is silently dropped.
    #[error("a save for this group is already in flight")]
    ConcurrentSaveConflict,

    #[error("Database error: {0}")]
    Database(String),
}

/// Result alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
