//! Employee lens
//!
//! This module provides the employee lens: raw form parsing on the way in,
//! table/JSON rendering on the way out, with the repository in between.

pub mod args;
pub mod types;

pub use args::NewEmployeeForm;
pub use types::EmployeeEntry;

use crate::database::{Employee, StaffDatabase};
use crate::errors::EmployeeError;
use crate::lens::utils::{parse_decimal, parse_u32, OutputFormat};
use anyhow::Result;
use serde::Serialize;
use tabled::settings::Style;
use tabled::Table;

/// Outcome of a salary update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryChange {
    pub employee_id: u32,
    pub name: String,
    pub old_salary: f64,
    pub new_salary: f64,
}

/// Employee lens
///
/// Operations used by the interactive session:
/// - Adding an employee from a raw form
/// - Looking up an employee before changing the salary
/// - Listing and counting employees
pub struct EmployeeLens<'a> {
    db: &'a StaffDatabase,
}

impl<'a> EmployeeLens<'a> {
    pub fn new(db: &'a StaffDatabase) -> Self {
        Self { db }
    }

    /// Parse, validate and insert a new employee; returns the employee ID
    pub fn add(&self, form: &NewEmployeeForm) -> Result<u32> {
        let employee = form.parse()?;
        self.db.employees().add(&employee)?;
        Ok(employee.employee_id)
    }

    /// Find an employee from a raw ID, failing with `NotFound` when absent
    pub fn lookup(&self, raw_id: &str) -> Result<Employee> {
        let employee_id = parse_u32("Employee ID", raw_id)?;
        let employee = self
            .db
            .employees()
            .find(employee_id)?
            .ok_or(EmployeeError::NotFound(employee_id))?;
        Ok(employee)
    }

    /// Apply a raw percentage to a looked-up employee's salary
    pub fn apply_raise(&self, employee: &Employee, raw_percent: &str) -> Result<SalaryChange> {
        let percent = parse_decimal("Percentage increase", raw_percent)?;
        self.update_salary(employee, percent)
    }

    fn update_salary(&self, employee: &Employee, percent: f64) -> Result<SalaryChange> {
        let new_salary = self
            .db
            .employees()
            .update_salary(employee.employee_id, percent)?;
        Ok(SalaryChange {
            employee_id: employee.employee_id,
            name: employee.name.clone(),
            old_salary: employee.salary,
            new_salary,
        })
    }

    /// All employees ordered by ID
    pub fn list(&self) -> Result<Vec<Employee>> {
        Ok(self.db.employees().list_all()?)
    }

    /// Total number of employees
    pub fn count(&self) -> Result<u64> {
        Ok(self.db.employees().count()?)
    }

    /// Render employees in the requested format
    pub fn format_employees(&self, employees: &[Employee], format: OutputFormat) -> Result<String> {
        let entries: Vec<EmployeeEntry> = employees.iter().map(EmployeeEntry::from).collect();

        let output = match format {
            OutputFormat::Table => Table::new(&entries).with(Style::rounded()).to_string(),
            OutputFormat::Markdown => Table::new(&entries).with(Style::markdown()).to_string(),
            OutputFormat::Json => serde_json::to_string(employees)?,
            OutputFormat::JsonPretty => serde_json::to_string_pretty(employees)?,
            OutputFormat::JsonLine => employees
                .iter()
                .map(serde_json::to_string)
                .collect::<Result<Vec<_>, _>>()?
                .join("\n"),
            OutputFormat::Psv => {
                let mut lines =
                    vec!["employee_id|name|department|position|salary|age|join_date|email".to_string()];
                for e in employees {
                    lines.push(format!(
                        "{}|{}|{}|{}|{:.2}|{}|{}|{}",
                        e.employee_id,
                        e.name,
                        e.department,
                        e.position,
                        e.salary,
                        e.age,
                        e.join_date,
                        e.email
                    ));
                }
                lines.join("\n")
            }
        };
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::InputFormatError;

    fn form(id: &str, age: &str) -> NewEmployeeForm {
        NewEmployeeForm {
            employee_id: id.to_string(),
            name: "Grace Hopper".to_string(),
            department: "Engineering".to_string(),
            position: "Rear Admiral".to_string(),
            salary: "1000".to_string(),
            age: age.to_string(),
            email: "grace@example.com".to_string(),
        }
    }

    #[test]
    fn test_add_and_count() {
        let db = StaffDatabase::open_in_memory().unwrap();
        let lens = EmployeeLens::new(&db);

        assert_eq!(lens.add(&form("7", "30")).unwrap(), 7);
        assert_eq!(lens.count().unwrap(), 1);
    }

    #[test]
    fn test_add_reports_typed_errors() {
        let db = StaffDatabase::open_in_memory().unwrap();
        let lens = EmployeeLens::new(&db);

        let err = lens.add(&form("x", "30")).unwrap_err();
        assert!(err.downcast_ref::<InputFormatError>().is_some());

        let err = lens.add(&form("7", "17")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EmployeeError>(),
            Some(EmployeeError::InvalidAge(17))
        ));
    }

    #[test]
    fn test_negative_age_is_out_of_range() {
        let db = StaffDatabase::open_in_memory().unwrap();
        let lens = EmployeeLens::new(&db);

        let err = lens.add(&form("7", "-3")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EmployeeError>(),
            Some(EmployeeError::InvalidAge(-3))
        ));
        assert_eq!(err.to_string(), "age must be between 18-65, got -3");
        assert_eq!(lens.count().unwrap(), 0);
    }

    #[test]
    fn test_lookup_and_raise() {
        let db = StaffDatabase::open_in_memory().unwrap();
        let lens = EmployeeLens::new(&db);
        lens.add(&form("7", "30")).unwrap();

        let employee = lens.lookup("7").unwrap();
        let change = lens.apply_raise(&employee, "10").unwrap();
        assert_eq!(change.old_salary, 1000.0);
        assert_eq!(change.new_salary, 1100.0);
        assert_eq!(lens.list().unwrap()[0].salary, 1100.0);

        let err = lens.lookup("8").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EmployeeError>(),
            Some(EmployeeError::NotFound(8))
        ));
    }

    #[test]
    fn test_format_table_and_psv() {
        let db = StaffDatabase::open_in_memory().unwrap();
        let lens = EmployeeLens::new(&db);
        lens.add(&form("7", "30")).unwrap();
        let employees = lens.list().unwrap();

        let table = lens
            .format_employees(&employees, OutputFormat::Markdown)
            .unwrap();
        assert!(table.contains("Grace Hopper"));
        assert!(table.contains("1000.00"));

        let psv = lens.format_employees(&employees, OutputFormat::Psv).unwrap();
        let lines: Vec<&str> = psv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("7|Grace Hopper|Engineering|Rear Admiral|1000.00|30|"));
    }

    #[test]
    fn test_format_json() {
        let db = StaffDatabase::open_in_memory().unwrap();
        let lens = EmployeeLens::new(&db);
        lens.add(&form("7", "30")).unwrap();
        let employees = lens.list().unwrap();

        let json = lens.format_employees(&employees, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["employee_id"], 7);
        assert_eq!(value[0]["salary"], 1000.0);
    }
}
