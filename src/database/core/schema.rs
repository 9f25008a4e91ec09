//! Database schema management
//!
//! This module provides schema definitions and the idempotent bootstrap for
//! the staff database. All tables are defined here so the foreign key from
//! `performance` to `employees` stays next to the table it references.

use crate::errors::StorageError;
use rusqlite::Connection;
use tracing::info;

/// Current schema version
/// Increment this when making breaking schema changes
pub const SCHEMA_VERSION: u32 = 1;

/// Schema definitions for all tables in the staff database
pub struct SchemaDefinitions;

impl SchemaDefinitions {
    /// SQL for creating the meta table (tracks schema version)
    pub const META_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS staffdb_meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );
    "#;

    /// Operator accounts; only the credential service reads or writes it
    pub const ACCOUNTS_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS accounts (
            username TEXT PRIMARY KEY CHECK (length(trim(username)) > 0),
            password_hash TEXT NOT NULL CHECK (length(password_hash) = 64),
            role TEXT NOT NULL DEFAULT 'employee'
        );
    "#;

    pub const EMPLOYEES_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS employees (
            employee_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            department TEXT NOT NULL,
            position TEXT NOT NULL DEFAULT '',
            salary REAL NOT NULL,
            age INTEGER NOT NULL CHECK (age BETWEEN 18 AND 65),
            join_date TEXT NOT NULL,
            email TEXT NOT NULL DEFAULT ''
        );
    "#;

    /// AUTOINCREMENT keeps record ids strictly increasing, never reused
    pub const PERFORMANCE_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS performance (
            record_id INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id INTEGER NOT NULL REFERENCES employees(employee_id),
            rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
            comments TEXT NOT NULL DEFAULT '',
            review_date TEXT NOT NULL
        );
    "#;

    pub const INDEXES: &'static [&'static str] = &[
        "CREATE INDEX IF NOT EXISTS idx_performance_employee_id ON performance(employee_id)",
    ];

    /// Tables that must exist for the schema to be considered intact
    pub const REQUIRED_TABLES: &'static [&'static str] =
        &["staffdb_meta", "accounts", "employees", "performance"];
}

/// Schema manager for the staff database
///
/// Handles bootstrap and version checking. There is no migration path:
/// bootstrap only ever creates what is missing.
pub struct SchemaManager<'a> {
    conn: &'a Connection,
}

impl<'a> SchemaManager<'a> {
    /// Create a new schema manager for the given connection
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create all tables and indexes that do not exist yet
    ///
    /// Safe to call on every startup; existing rows are never touched.
    pub fn bootstrap(&self) -> Result<(), StorageError> {
        let statements = [
            ("staffdb_meta", SchemaDefinitions::META_TABLE),
            ("accounts", SchemaDefinitions::ACCOUNTS_TABLE),
            ("employees", SchemaDefinitions::EMPLOYEES_TABLE),
            ("performance", SchemaDefinitions::PERFORMANCE_TABLE),
        ];

        for (table, sql) in statements {
            self.conn.execute(sql, []).map_err(|e| {
                StorageError::Schema(format!("failed to create {} table: {}", table, e))
            })?;
        }

        for index_sql in SchemaDefinitions::INDEXES {
            self.conn
                .execute(index_sql, [])
                .map_err(|e| StorageError::Schema(format!("failed to create index: {}", e)))?;
        }

        if self.get_meta("schema_version")?.is_none() {
            self.set_meta("schema_version", &SCHEMA_VERSION.to_string())?;
        }

        info!("staff database schema bootstrapped (v{})", SCHEMA_VERSION);
        Ok(())
    }

    /// Check the current schema status
    pub fn check_status(&self) -> Result<SchemaStatus, StorageError> {
        if !self.table_exists("staffdb_meta")? {
            return Ok(SchemaStatus::NotInitialized);
        }

        let current_version = self.get_schema_version()?;

        if current_version > SCHEMA_VERSION {
            // Written by a newer build
            return Ok(SchemaStatus::Incompatible {
                database_version: current_version,
                required_version: SCHEMA_VERSION,
            });
        }

        if self.verify_integrity()? {
            Ok(SchemaStatus::Current)
        } else {
            Ok(SchemaStatus::Corrupted)
        }
    }

    /// Get the schema version recorded in the database, 0 if absent
    pub fn get_schema_version(&self) -> Result<u32, StorageError> {
        match self.get_meta("schema_version")? {
            Some(version) => version
                .parse()
                .map_err(|e| StorageError::Schema(format!("invalid schema version: {}", e))),
            None => Ok(0),
        }
    }

    fn verify_integrity(&self) -> Result<bool, StorageError> {
        for table in SchemaDefinitions::REQUIRED_TABLES {
            if !self.table_exists(table)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn table_exists(&self, table: &str) -> Result<bool, StorageError> {
        let exists: i32 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            [table],
            |row| row.get(0),
        )?;
        Ok(exists > 0)
    }

    /// Set a metadata value
    pub fn set_meta(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO staffdb_meta (key, value, updated_at) VALUES (?1, ?2, strftime('%s', 'now'))",
            [key, value],
        )?;
        Ok(())
    }

    /// Get a metadata value
    pub fn get_meta(&self, key: &str) -> Result<Option<String>, StorageError> {
        let result: Result<String, _> = self.conn.query_row(
            "SELECT value FROM staffdb_meta WHERE key = ?1",
            [key],
            |row| row.get(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::Query(e)),
        }
    }
}

/// Status of the database schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaStatus {
    /// Database is not initialized (fresh database)
    NotInitialized,

    /// Schema is current and valid
    Current,

    /// Database is from a newer version (incompatible)
    Incompatible {
        database_version: u32,
        required_version: u32,
    },

    /// Meta table present but a required table is missing
    Corrupted,
}

impl std::fmt::Display for SchemaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaStatus::NotInitialized => write!(f, "not initialized"),
            SchemaStatus::Current => write!(f, "current (v{})", SCHEMA_VERSION),
            SchemaStatus::Incompatible {
                database_version,
                required_version,
            } => write!(
                f,
                "incompatible (database v{}, supported v{})",
                database_version, required_version
            ),
            SchemaStatus::Corrupted => write!(f, "corrupted"),
        }
    }
}
