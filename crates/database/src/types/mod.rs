//! Shared types for the database layer

pub mod errors;

pub use errors::DatabaseError;

/// Result alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
