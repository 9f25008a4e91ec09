//! Employee lens types

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::database::Employee;
use crate::lens::utils::{truncate_name, DEFAULT_NAME_MAX_LEN};

/// One row of the employee listing
#[derive(Debug, Clone, Serialize, Deserialize, Tabled)]
pub struct EmployeeEntry {
    #[tabled(rename = "ID")]
    pub employee_id: u32,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Department")]
    pub department: String,
    #[tabled(rename = "Position")]
    pub position: String,
    #[tabled(rename = "Salary")]
    pub salary: String,
    #[tabled(rename = "Age")]
    pub age: u32,
    #[tabled(rename = "Joined")]
    pub join_date: String,
    #[tabled(rename = "Email")]
    pub email: String,
}

impl From<&Employee> for EmployeeEntry {
    fn from(e: &Employee) -> Self {
        Self {
            employee_id: e.employee_id,
            name: truncate_name(&e.name, DEFAULT_NAME_MAX_LEN),
            department: truncate_name(&e.department, 15),
            position: truncate_name(&e.position, 15),
            salary: format!("{:.2}", e.salary),
            age: e.age,
            join_date: e.join_date.to_string(),
            email: e.email.clone(),
        }
    }
}
