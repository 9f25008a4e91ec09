//! Error types
//!
//! Every operation of the core returns one of the typed errors below. Storage
//! failures are wrapped by each domain error so callers can tell a rejected
//! request (non-fatal, reported to the operator) from a broken store.

use thiserror::Error;

/// Failures of the backing SQLite store
#[derive(Debug, Error)]
pub enum StorageError {
    /// The database could not be opened or configured. Fatal.
    #[error("database connection failed: {0}")]
    Connection(String),

    /// The schema could not be created or is from an incompatible version. Fatal.
    #[error("database schema error: {0}")]
    Schema(String),

    /// A single statement failed
    #[error("database query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

impl StorageError {
    /// Whether this error should terminate the process
    pub fn is_fatal(&self) -> bool {
        matches!(self, StorageError::Connection(_) | StorageError::Schema(_))
    }
}

/// Registration and login failures
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("username cannot be empty")]
    EmptyUsername,

    #[error("username already exists")]
    DuplicateUsername,

    #[error("password must be at least {min_len} characters")]
    WeakPassword { min_len: usize },

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Employee record failures
#[derive(Debug, Error)]
pub enum EmployeeError {
    #[error("employee ID {0} already exists")]
    DuplicateId(u32),

    #[error("age must be between 18-65, got {0}")]
    InvalidAge(i64),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid salary value: {0}")]
    InvalidSalary(f64),

    #[error("employee {0} not found")]
    NotFound(u32),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Performance review failures
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("rating must be between 1-5, got {0}")]
    InvalidRating(i64),

    #[error("employee ID {0} not found")]
    EmployeeNotFound(u32),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Raw text that could not be parsed into the expected type
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid input for {field}: '{value}' is not {expected}")]
pub struct InputFormatError {
    pub field: String,
    pub value: String,
    pub expected: &'static str,
}

macro_rules! impl_from_rusqlite {
    ($($ty:ty),+) => {
        $(
            impl From<rusqlite::Error> for $ty {
                fn from(e: rusqlite::Error) -> Self {
                    <$ty>::Storage(StorageError::Query(e))
                }
            }
        )+
    };
}

impl_from_rusqlite!(AuthError, EmployeeError, ReviewError);

/// Whether a rusqlite error is a UNIQUE/PRIMARY KEY constraint violation
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
