//! Employee lens arguments
//!
//! Raw text forms as captured by an interactive front end. Each form parses
//! into the typed input the repository validates, so parsing failures
//! (`InputFormatError`) stay separate from rule violations (`EmployeeError`).

use serde::{Deserialize, Serialize};

use crate::database::NewEmployee;
use crate::errors::InputFormatError;
use crate::lens::utils::{parse_decimal, parse_i64, parse_u32};

/// Raw fields for a new employee
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewEmployeeForm {
    pub employee_id: String,
    pub name: String,
    pub department: String,
    pub position: String,
    pub salary: String,
    pub age: String,
    pub email: String,
}

impl NewEmployeeForm {
    /// Parse the numeric fields
    ///
    /// Text fields are passed through untouched; emptiness is checked by
    /// [`NewEmployee::validate`].
    pub fn parse(&self) -> Result<NewEmployee, InputFormatError> {
        Ok(NewEmployee {
            employee_id: parse_u32("Employee ID", &self.employee_id)?,
            name: self.name.clone(),
            department: self.department.clone(),
            position: self.position.clone(),
            salary: parse_decimal("Salary", &self.salary)?,
            age: parse_i64("Age", &self.age)?,
            email: self.email.clone(),
        })
    }
}
