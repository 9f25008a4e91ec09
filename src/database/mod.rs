//! Database module
//!
//! This module provides all database functionality for staffdb, organized into:
//!
//! - **core**: Core database infrastructure (SQLite connection, schema bootstrap)
//! - **staff**: The staff database with its repositories
//!
//! # Architecture
//!
//! ```text
//! database/
//! ├── core/            # Foundation
//! │   ├── connection   # SQLite DatabaseConn wrapper
//! │   └── schema       # Table definitions and bootstrap
//! │
//! └── staff/           # Persistent storage
//!     ├── accounts     # Credential service (operator login)
//!     ├── employees    # Employee records and salary updates
//!     └── performance  # Append-only performance reviews
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use staffdb::database::{NewEmployee, StaffDatabase};
//!
//! let db = StaffDatabase::open_in_dir("~/.staffdb")?;
//! let session = db.credentials().login("alice", "secret1")?;
//!
//! db.employees().add(&NewEmployee::new(7, "Grace", "Engineering").age(30))?;
//! let raised = db.employees().update_salary(7, 10.0)?;
//! ```

pub mod core;
pub mod staff;

pub use self::core::{DatabaseConn, SchemaDefinitions, SchemaManager, SchemaStatus, SCHEMA_VERSION};

pub use staff::{
    hash_password, round_cents, CredentialService, Employee, EmployeeRepository, NewEmployee,
    NewReview, PerformanceRecord, PerformanceRepository, Role, Session, StaffDatabase,
    DATABASE_FILE_NAME, MAX_AGE, MAX_RATING, MIN_AGE, MIN_PASSWORD_LEN, MIN_RATING,
};
