//! Lens module
//!
//! Lenses sit between a front end and the database: they turn raw operator
//! text into typed inputs and render results as tables or JSON. They are
//! reusable by any interface; the `staffdb` binary is one of them.
//!
//! | Lens | Purpose |
//! |------|---------|
//! | `EmployeeLens` | add, look up, raise salary, list and count employees |
//! | `ReviewLens` | append and list performance reviews |
//!
//! ```rust,ignore
//! use staffdb::lens::employee::{EmployeeLens, NewEmployeeForm};
//! use staffdb::lens::utils::OutputFormat;
//!
//! let lens = EmployeeLens::new(&db);
//! let employees = lens.list()?;
//! println!("{}", lens.format_employees(&employees, OutputFormat::Table)?);
//! ```

pub mod utils;

pub mod employee;
pub mod review;
