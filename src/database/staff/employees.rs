//! Employee repository
//!
//! Employees are created once and never deleted; salary is the only
//! attribute that changes after insert.

use super::{parse_date_column, round_cents, today};
use crate::errors::{is_unique_violation, EmployeeError};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Youngest age accepted for a new employee
pub const MIN_AGE: i64 = 18;
/// Oldest age accepted for a new employee
pub const MAX_AGE: i64 = 65;

/// A stored employee record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: u32,
    pub name: String,
    pub department: String,
    pub position: String,
    pub salary: f64,
    pub age: u32,
    pub join_date: NaiveDate,
    pub email: String,
}

/// Input for creating an employee
///
/// The join date is not part of the input; it is set to the current date
/// when the record is inserted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewEmployee {
    pub employee_id: u32,
    pub name: String,
    pub department: String,
    #[serde(default)]
    pub position: String,
    pub salary: f64,
    pub age: i64,
    #[serde(default)]
    pub email: String,
}

impl NewEmployee {
    /// Create a new input with the required identity fields
    pub fn new(employee_id: u32, name: &str, department: &str) -> Self {
        Self {
            employee_id,
            name: name.to_string(),
            department: department.to_string(),
            ..Default::default()
        }
    }

    pub fn position(mut self, position: &str) -> Self {
        self.position = position.to_string();
        self
    }

    pub fn salary(mut self, salary: f64) -> Self {
        self.salary = salary;
        self
    }

    pub fn age(mut self, age: i64) -> Self {
        self.age = age;
        self
    }

    pub fn email(mut self, email: &str) -> Self {
        self.email = email.to_string();
        self
    }

    /// Validate the field rules that do not need the store
    ///
    /// Checked in order: name, department, age range, salary.
    pub fn validate(&self) -> Result<(), EmployeeError> {
        if self.name.trim().is_empty() {
            return Err(EmployeeError::MissingField("name"));
        }
        if self.department.trim().is_empty() {
            return Err(EmployeeError::MissingField("department"));
        }
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(EmployeeError::InvalidAge(self.age));
        }
        if !round_cents(self.salary).is_finite() || self.salary < 0.0 {
            return Err(EmployeeError::InvalidSalary(self.salary));
        }
        Ok(())
    }
}

/// Repository for employee records
pub struct EmployeeRepository<'a> {
    conn: &'a Connection,
}

impl<'a> EmployeeRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Validate and insert a new employee, joining today
    pub fn add(&self, employee: &NewEmployee) -> Result<(), EmployeeError> {
        employee.validate()?;

        if self.exists(employee.employee_id)? {
            return Err(EmployeeError::DuplicateId(employee.employee_id));
        }

        self.conn
            .execute(
                "INSERT INTO employees (employee_id, name, department, position, salary, age, join_date, email)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                (
                    employee.employee_id,
                    employee.name.trim(),
                    employee.department.trim(),
                    employee.position.trim(),
                    round_cents(employee.salary),
                    employee.age,
                    today(),
                    employee.email.trim(),
                ),
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    EmployeeError::DuplicateId(employee.employee_id)
                } else {
                    EmployeeError::from(e)
                }
            })?;

        info!("added employee {}", employee.employee_id);
        Ok(())
    }

    /// All employees ordered by ID; empty when there are none
    pub fn list_all(&self) -> Result<Vec<Employee>, EmployeeError> {
        let mut stmt = self.conn.prepare(
            "SELECT employee_id, name, department, position, salary, age, join_date, email
             FROM employees ORDER BY employee_id",
        )?;

        let employees = stmt
            .query_map([], row_to_employee)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(employees)
    }

    /// Look up a single employee
    pub fn find(&self, employee_id: u32) -> Result<Option<Employee>, EmployeeError> {
        let employee = self
            .conn
            .query_row(
                "SELECT employee_id, name, department, position, salary, age, join_date, email
                 FROM employees WHERE employee_id = ?1",
                [employee_id],
                row_to_employee,
            )
            .optional()?;
        debug!("employee lookup {}: {}", employee_id, employee.is_some());
        Ok(employee)
    }

    /// Whether an employee with this ID exists
    pub fn exists(&self, employee_id: u32) -> Result<bool, EmployeeError> {
        let found: Option<u32> = self
            .conn
            .query_row(
                "SELECT employee_id FROM employees WHERE employee_id = ?1",
                [employee_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Raise (or, with a negative percentage, lower) a salary
    ///
    /// Returns the new salary, rounded to cents.
    pub fn update_salary(
        &self,
        employee_id: u32,
        percent_increase: f64,
    ) -> Result<f64, EmployeeError> {
        if !percent_increase.is_finite() {
            return Err(EmployeeError::InvalidSalary(percent_increase));
        }

        let current: Option<f64> = self
            .conn
            .query_row(
                "SELECT salary FROM employees WHERE employee_id = ?1",
                [employee_id],
                |row| row.get(0),
            )
            .optional()?;
        let current = current.ok_or(EmployeeError::NotFound(employee_id))?;

        let new_salary = round_cents(current * (1.0 + percent_increase / 100.0));
        if !new_salary.is_finite() {
            return Err(EmployeeError::InvalidSalary(new_salary));
        }

        self.conn.execute(
            "UPDATE employees SET salary = ?1 WHERE employee_id = ?2",
            (new_salary, employee_id),
        )?;

        info!(
            "salary of employee {} changed by {}%: {:.2} -> {:.2}",
            employee_id, percent_increase, current, new_salary
        );
        Ok(new_salary)
    }

    /// Total number of employees
    pub fn count(&self) -> Result<u64, EmployeeError> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM employees", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn row_to_employee(row: &Row) -> rusqlite::Result<Employee> {
    Ok(Employee {
        employee_id: row.get(0)?,
        name: row.get(1)?,
        department: row.get(2)?,
        position: row.get(3)?,
        salary: row.get(4)?,
        age: row.get(5)?,
        join_date: parse_date_column(row, 6)?,
        email: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::core::{DatabaseConn, SchemaManager};
    use chrono::Local;

    fn setup_test_db() -> DatabaseConn {
        let db = DatabaseConn::open_in_memory().unwrap();
        SchemaManager::new(&db.conn).bootstrap().unwrap();
        db
    }

    fn sample(employee_id: u32, age: i64) -> NewEmployee {
        NewEmployee::new(employee_id, "Grace Hopper", "Engineering")
            .position("Engineer")
            .salary(1000.0)
            .age(age)
            .email("grace@example.com")
    }

    #[test]
    fn test_list_all_empty() {
        let db = setup_test_db();
        let repo = EmployeeRepository::new(&db.conn);

        assert!(repo.list_all().unwrap().is_empty());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_add_and_list() {
        let db = setup_test_db();
        let repo = EmployeeRepository::new(&db.conn);

        repo.add(&sample(7, 30)).unwrap();

        let all = repo.list_all().unwrap();
        assert_eq!(all.len(), 1);
        let e = &all[0];
        assert_eq!(e.employee_id, 7);
        assert_eq!(e.name, "Grace Hopper");
        assert_eq!(e.department, "Engineering");
        assert_eq!(e.position, "Engineer");
        assert_eq!(e.salary, 1000.0);
        assert_eq!(e.age, 30);
        assert_eq!(e.email, "grace@example.com");
        assert_eq!(e.join_date, Local::now().date_naive());
    }

    #[test]
    fn test_age_boundaries() {
        let db = setup_test_db();
        let repo = EmployeeRepository::new(&db.conn);

        assert!(matches!(
            repo.add(&sample(7, 17)),
            Err(EmployeeError::InvalidAge(17))
        ));
        assert!(matches!(
            repo.add(&sample(8, 66)),
            Err(EmployeeError::InvalidAge(66))
        ));
        repo.add(&sample(7, 18)).unwrap();
        repo.add(&sample(8, 65)).unwrap();
        assert_eq!(repo.count().unwrap(), 2);
    }

    #[test]
    fn test_duplicate_id() {
        let db = setup_test_db();
        let repo = EmployeeRepository::new(&db.conn);

        repo.add(&sample(7, 30)).unwrap();
        assert!(matches!(
            repo.add(&sample(7, 40)),
            Err(EmployeeError::DuplicateId(7))
        ));
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_missing_fields() {
        let db = setup_test_db();
        let repo = EmployeeRepository::new(&db.conn);

        let no_name = NewEmployee::new(1, "  ", "Sales").age(30);
        assert!(matches!(
            repo.add(&no_name),
            Err(EmployeeError::MissingField("name"))
        ));

        let no_dept = NewEmployee::new(1, "Linus", "").age(30);
        assert!(matches!(
            repo.add(&no_dept),
            Err(EmployeeError::MissingField("department"))
        ));
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_negative_salary_rejected() {
        let db = setup_test_db();
        let repo = EmployeeRepository::new(&db.conn);

        let input = sample(1, 30).salary(-5.0);
        assert!(matches!(
            repo.add(&input),
            Err(EmployeeError::InvalidSalary(_))
        ));

        // finite, but overflows once rounded to cents
        let huge = sample(1, 30).salary(f64::MAX);
        assert!(matches!(
            repo.add(&huge),
            Err(EmployeeError::InvalidSalary(_))
        ));
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_list_ordered_by_id() {
        let db = setup_test_db();
        let repo = EmployeeRepository::new(&db.conn);

        for id in [30, 10, 20] {
            repo.add(&sample(id, 30)).unwrap();
        }

        let ids: Vec<u32> = repo
            .list_all()
            .unwrap()
            .iter()
            .map(|e| e.employee_id)
            .collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    #[test]
    fn test_update_salary() {
        let db = setup_test_db();
        let repo = EmployeeRepository::new(&db.conn);
        repo.add(&sample(7, 30)).unwrap();

        let new_salary = repo.update_salary(7, 10.0).unwrap();
        assert_eq!(new_salary, 1100.0);
        assert_eq!(repo.list_all().unwrap()[0].salary, 1100.0);
    }

    #[test]
    fn test_update_salary_negative_percent() {
        let db = setup_test_db();
        let repo = EmployeeRepository::new(&db.conn);
        repo.add(&sample(7, 30)).unwrap();

        let new_salary = repo.update_salary(7, -25.0).unwrap();
        assert_eq!(new_salary, 750.0);
    }

    #[test]
    fn test_update_salary_not_found() {
        let db = setup_test_db();
        let repo = EmployeeRepository::new(&db.conn);

        assert!(matches!(
            repo.update_salary(42, 10.0),
            Err(EmployeeError::NotFound(42))
        ));
    }

    #[test]
    fn test_update_salary_rejects_nan() {
        let db = setup_test_db();
        let repo = EmployeeRepository::new(&db.conn);
        repo.add(&sample(7, 30)).unwrap();

        assert!(matches!(
            repo.update_salary(7, f64::NAN),
            Err(EmployeeError::InvalidSalary(_))
        ));
        assert_eq!(repo.find(7).unwrap().unwrap().salary, 1000.0);
    }

    #[test]
    fn test_update_salary_rejects_overflow() {
        let db = setup_test_db();
        let repo = EmployeeRepository::new(&db.conn);
        repo.add(&sample(7, 30)).unwrap();

        assert!(matches!(
            repo.update_salary(7, 1e308),
            Err(EmployeeError::InvalidSalary(s)) if s.is_infinite()
        ));
        assert!(matches!(
            repo.update_salary(7, -1e308),
            Err(EmployeeError::InvalidSalary(_))
        ));
        assert_eq!(repo.find(7).unwrap().unwrap().salary, 1000.0);

        // the stored salary is still usable afterwards
        assert_eq!(repo.update_salary(7, -100.0).unwrap(), 0.0);
    }

    #[test]
    fn test_find() {
        let db = setup_test_db();
        let repo = EmployeeRepository::new(&db.conn);
        repo.add(&sample(7, 30)).unwrap();

        assert_eq!(repo.find(7).unwrap().unwrap().name, "Grace Hopper");
        assert!(repo.find(8).unwrap().is_none());
    }

    #[test]
    fn test_text_fields_trimmed() {
        let db = setup_test_db();
        let repo = EmployeeRepository::new(&db.conn);

        let input = NewEmployee::new(3, "  Ada  ", " R&D ")
            .position(" Lead ")
            .age(36)
            .email(" ada@example.com ");
        repo.add(&input).unwrap();

        let e = repo.find(3).unwrap().unwrap();
        assert_eq!(e.name, "Ada");
        assert_eq!(e.department, "R&D");
        assert_eq!(e.position, "Lead");
        assert_eq!(e.email, "ada@example.com");
    }
}
