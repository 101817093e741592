//! Error types for the common library
//!
//! Database failures are classified by the stage that produced them so that
//! callers can log a meaningful cause without inspecting driver errors.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Opening the SQLite file or acquiring a connection failed
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// A statement failed to execute
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Schema bootstrap failed
    #[error("Database migration error: {0}")]
    Migration(String),

    /// The supplied settings are unusable
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
