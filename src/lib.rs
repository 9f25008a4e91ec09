#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! staffdb - An employee records toolkit
//!
//! staffdb records employees, salary updates and performance reviews in a
//! local SQLite database, gated by a single operator login. It can be used as
//! both a command-line application and a library.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | (none) | Database, credential service, repositories | `rusqlite`, `sha2` |
//! | `display` | Lenses: input parsing and table output | `tabled` |
//! | `cli` | Interactive `staffdb` binary | All above + `clap`, `tracing-subscriber` |
//!
//! # Architecture
//!
//! - **[`database`]**: store connection, schema bootstrap, credential service
//!   and the employee/performance repositories (always available)
//! - **[`lens`]**: raw-text forms and output formatting (requires `display`)
//! - **[`config`]**: configuration management
//! - **[`errors`]**: typed error taxonomy
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use staffdb::database::{NewEmployee, NewReview, StaffDatabase};
//!
//! let db = StaffDatabase::open_in_dir("~/.staffdb")?;
//!
//! db.credentials().register("alice", "secret1")?;
//! let session = db.credentials().login("alice", "secret1")?;
//!
//! let employees = db.employees();
//! employees.add(
//!     &NewEmployee::new(7, "Grace Hopper", "Engineering")
//!         .salary(1000.0)
//!         .age(30),
//! )?;
//! let new_salary = employees.update_salary(7, 10.0)?; // 1100.0
//!
//! db.reviews().add_review(&NewReview::new(7, 5, "Outstanding"))?;
//! ```

pub mod config;
pub mod database;
pub mod errors;

#[cfg(feature = "display")]
pub mod lens;

// =============================================================================
// Configuration
// =============================================================================

pub use config::StaffdbConfig;

// =============================================================================
// Errors
// =============================================================================

pub use errors::{AuthError, EmployeeError, InputFormatError, ReviewError, StorageError};

// =============================================================================
// Database Module - Re-export commonly used types
// =============================================================================

pub use database::StaffDatabase;

pub use database::{DatabaseConn, SchemaDefinitions, SchemaManager, SchemaStatus, SCHEMA_VERSION};

pub use database::{
    CredentialService, Employee, EmployeeRepository, NewEmployee, NewReview, PerformanceRecord,
    PerformanceRepository, Role, Session,
};

// =============================================================================
// Lens Module - Feature-gated exports
// =============================================================================

#[cfg(feature = "display")]
pub use lens::utils::OutputFormat;
