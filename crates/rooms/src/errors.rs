//! Error types for the room broker

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RoomError {
    /// The session attempted a chat operation before joining a room.
    /// Recoverable: join first.
    #[error("session has not joined a room")]
    NotJoined,
}

/// Result alias for room operations
pub type RoomResult<T> = Result<T, RoomError>;
