//! Database connection management
//!
//! This module provides the single store handle used by every repository.

use crate::errors::StorageError;
use rusqlite::Connection;
use tracing::debug;

/// Core database connection wrapper
///
/// `DatabaseConn` provides a thin wrapper around SQLite connections,
/// handling both file-based and in-memory databases with consistent
/// configuration. It is opened once at startup and dropped at shutdown.
pub struct DatabaseConn {
    pub conn: Connection,
}

impl DatabaseConn {
    /// Open a database at the specified path
    ///
    /// If the path is `None`, an in-memory database is created.
    pub fn open(path: Option<&str>) -> Result<Self, StorageError> {
        let conn = match path {
            Some(p) => Connection::open(p).map_err(|e| {
                StorageError::Connection(format!("failed to open database at '{}': {}", p, e))
            })?,
            None => Connection::open_in_memory().map_err(|e| {
                StorageError::Connection(format!("failed to create in-memory database: {}", e))
            })?,
        };

        let db = DatabaseConn { conn };
        db.configure()?;
        debug!("database opened at {}", path.unwrap_or(":memory:"));
        Ok(db)
    }

    /// Open a database at the specified path (convenience method)
    pub fn open_path(path: &str) -> Result<Self, StorageError> {
        Self::open(Some(path))
    }

    /// Create an in-memory database
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::open(None)
    }

    fn configure(&self) -> Result<(), StorageError> {
        // Foreign keys are off by default in SQLite; reviews rely on them
        self.conn
            .execute("PRAGMA foreign_keys=ON", [])
            .map_err(|e| StorageError::Connection(format!("failed to enable foreign keys: {}", e)))?;

        self.conn
            .execute("PRAGMA temp_store=MEMORY", [])
            .map_err(|e| StorageError::Connection(format!("failed to set temp store: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = DatabaseConn::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_pragmas_applied() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let foreign_keys: i32 = db
            .conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(foreign_keys, 1);
    }

    #[test]
    fn test_open_bad_path() {
        let result = DatabaseConn::open_path("/nonexistent-dir/for/sure/staffdb.sqlite3");
        assert!(matches!(result, Err(StorageError::Connection(_))));
    }
}
