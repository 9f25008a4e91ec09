//! Staff database storage
//!
//! This module provides the persistent database used across sessions.
//! It stores:
//! - Operator accounts (username, password hash, role)
//! - Employee records
//! - Performance reviews

mod accounts;
mod employees;
mod performance;

pub use accounts::{hash_password, CredentialService, Role, Session, MIN_PASSWORD_LEN};
pub use employees::{Employee, EmployeeRepository, NewEmployee, MAX_AGE, MIN_AGE};
pub use performance::{
    NewReview, PerformanceRecord, PerformanceRepository, MAX_RATING, MIN_RATING,
};

use crate::database::core::{DatabaseConn, SchemaManager, SchemaStatus};
use crate::errors::StorageError;
use chrono::{Local, NaiveDate};
use rusqlite::Row;
use tracing::info;

/// Storage format of date columns
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// File name of the database inside the data directory
pub const DATABASE_FILE_NAME: &str = "staffdb.sqlite3";

/// Today's local date in storage format
pub(crate) fn today() -> String {
    Local::now().date_naive().format(DATE_FORMAT).to_string()
}

/// Read a `YYYY-MM-DD` text column
pub(crate) fn parse_date_column(row: &Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let text: String = row.get(idx)?;
    NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Round a money amount to whole cents
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Main staff database
///
/// `StaffDatabase` owns the single store connection and hands out the
/// repositories, each borrowing that connection. It handles:
/// - Schema bootstrap on open
/// - Refusing databases written by a newer schema version
pub struct StaffDatabase {
    db: DatabaseConn,
}

impl StaffDatabase {
    /// Open the staff database at the specified path
    ///
    /// If the database doesn't exist, it will be created and bootstrapped.
    pub fn open(path: &str) -> Result<Self, StorageError> {
        let db = DatabaseConn::open_path(path)?;
        Self::prepare(db)
    }

    /// Open the staff database from a data directory
    ///
    /// Uses the standard database file path: `{data_dir}/staffdb.sqlite3`
    pub fn open_in_dir(data_dir: &str) -> Result<Self, StorageError> {
        let path = format!("{}/{}", data_dir.trim_end_matches('/'), DATABASE_FILE_NAME);
        Self::open(&path)
    }

    /// Create an in-memory staff database (for testing)
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let db = DatabaseConn::open_in_memory()?;
        Self::prepare(db)
    }

    fn prepare(db: DatabaseConn) -> Result<Self, StorageError> {
        let schema = SchemaManager::new(&db.conn);

        match schema.check_status()? {
            SchemaStatus::Current => {
                info!("staff database schema is current");
            }
            SchemaStatus::NotInitialized => {
                info!("initializing staff database schema");
                schema.bootstrap()?;
            }
            SchemaStatus::Corrupted => {
                info!("staff database is missing tables, recreating them");
                schema.bootstrap()?;
            }
            status @ SchemaStatus::Incompatible { .. } => {
                return Err(StorageError::Schema(format!(
                    "cannot use this database: schema {}",
                    status
                )));
            }
        }

        Ok(Self { db })
    }

    /// Run the schema bootstrap again (idempotent)
    pub fn bootstrap(&self) -> Result<(), StorageError> {
        SchemaManager::new(&self.db.conn).bootstrap()
    }

    /// Current schema status
    pub fn schema_status(&self) -> Result<SchemaStatus, StorageError> {
        SchemaManager::new(&self.db.conn).check_status()
    }

    /// Get the credential service
    pub fn credentials(&self) -> CredentialService<'_> {
        CredentialService::new(&self.db.conn)
    }

    /// Get the employee repository
    pub fn employees(&self) -> EmployeeRepository<'_> {
        EmployeeRepository::new(&self.db.conn)
    }

    /// Get the performance review repository
    pub fn reviews(&self) -> PerformanceRepository<'_> {
        PerformanceRepository::new(&self.db.conn)
    }

    /// Get the underlying database connection (for advanced queries)
    pub fn connection(&self) -> &rusqlite::Connection {
        &self.db.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::core::SCHEMA_VERSION;

    #[test]
    fn test_open_in_memory() {
        let db = StaffDatabase::open_in_memory().unwrap();
        assert_eq!(db.schema_status().unwrap(), SchemaStatus::Current);
    }

    #[test]
    fn test_repositories_start_empty() {
        let db = StaffDatabase::open_in_memory().unwrap();

        assert_eq!(db.credentials().count().unwrap(), 0);
        assert_eq!(db.employees().count().unwrap(), 0);
        assert_eq!(db.reviews().count().unwrap(), 0);
    }

    #[test]
    fn test_rebootstrap_keeps_data() {
        let db = StaffDatabase::open_in_memory().unwrap();
        db.credentials().register("alice", "secret1").unwrap();

        db.bootstrap().unwrap();
        assert_eq!(db.credentials().count().unwrap(), 1);
    }

    #[test]
    fn test_refuses_newer_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("staffdb.sqlite3");
        let path = path.to_str().unwrap();

        {
            let db = StaffDatabase::open(path).unwrap();
            SchemaManager::new(db.connection())
                .set_meta("schema_version", &(SCHEMA_VERSION + 1).to_string())
                .unwrap();
        }

        assert!(matches!(
            StaffDatabase::open(path),
            Err(StorageError::Schema(_))
        ));
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(1100.0000000000002), 1100.0);
        assert_eq!(round_cents(10.126), 10.13);
        assert_eq!(round_cents(0.0), 0.0);
    }

    #[test]
    fn test_today_format() {
        let s = today();
        assert_eq!(s.len(), 10);
        assert!(NaiveDate::parse_from_str(&s, DATE_FORMAT).is_ok());
    }
}
