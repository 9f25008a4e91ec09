use std::io::{self, BufRead, Write};

use anyhow::Result;
use chrono::Local;
use staffdb::database::{Session, StaffDatabase};
use staffdb::errors::{AuthError, EmployeeError, ReviewError, StorageError};
use staffdb::lens::employee::{EmployeeLens, NewEmployeeForm};
use staffdb::lens::review::{NewReviewForm, ReviewLens};
use staffdb::lens::utils::OutputFormat;
use staffdb::StaffdbConfig;
use tracing::{error, info};

use super::prompt::Prompt;

/// How an interactive session ended
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    LoggedOut,
    AuthFailed,
}

pub fn run(config: &StaffdbConfig, output_format: OutputFormat) {
    let stdin = io::stdin();
    let mut prompt = Prompt::new(stdin.lock(), io::stdout());

    if let Err(e) = print_banner(&mut prompt) {
        error!("unable to write to stdout: {}", e);
        std::process::exit(1);
    }

    let db = match StaffDatabase::open(&config.sqlite_path()) {
        Ok(db) => db,
        Err(e) => {
            error!("database startup failed: {}", e);
            eprintln!("✗ Database startup failed: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = prompt.say("✓ Database ready") {
        error!("unable to write to stdout: {}", e);
        std::process::exit(1);
    }

    let mut interactive = Interactive::new(&db, prompt, output_format);
    match interactive.run() {
        Ok(Outcome::LoggedOut) => {}
        Ok(Outcome::AuthFailed) => std::process::exit(1),
        Err(e) => {
            error!("session aborted: {}", e);
            eprintln!("✗ Fatal error: {}", e);
            std::process::exit(1);
        }
    }
    // db is dropped here, closing the connection
}

fn print_banner<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>) -> io::Result<()> {
    prompt.rule(60)?;
    prompt.say("       EMPLOYEE MANAGEMENT SYSTEM - STARTUP")?;
    prompt.rule(60)
}

/// Whether an error means the store itself is unusable
fn is_fatal(err: &anyhow::Error) -> bool {
    let storage = err
        .downcast_ref::<StorageError>()
        .or_else(|| match err.downcast_ref::<EmployeeError>() {
            Some(EmployeeError::Storage(s)) => Some(s),
            _ => None,
        })
        .or_else(|| match err.downcast_ref::<ReviewError>() {
            Some(ReviewError::Storage(s)) => Some(s),
            _ => None,
        })
        .or_else(|| match err.downcast_ref::<AuthError>() {
            Some(AuthError::Storage(s)) => Some(s),
            _ => None,
        });
    storage.map(StorageError::is_fatal).unwrap_or(false) || err.downcast_ref::<io::Error>().is_some()
}

/// The login gate plus the numbered menu loop
pub struct Interactive<'a, R, W> {
    db: &'a StaffDatabase,
    prompt: Prompt<R, W>,
    format: OutputFormat,
}

impl<'a, R: BufRead, W: Write> Interactive<'a, R, W> {
    pub fn new(db: &'a StaffDatabase, prompt: Prompt<R, W>, format: OutputFormat) -> Self {
        Self { db, prompt, format }
    }

    pub fn run(&mut self) -> Result<Outcome> {
        let Some(session) = self.authenticate()? else {
            return Ok(Outcome::AuthFailed);
        };

        loop {
            self.display_main_menu(&session)?;

            let Some(choice) = self.prompt.ask("\nEnter your choice (1-7): ")? else {
                self.prompt.say("")?;
                break;
            };

            match choice.parse::<u32>() {
                Ok(1) => self.add_employee()?,
                Ok(2) => self.view_all_employees()?,
                Ok(3) => self.update_salary()?,
                Ok(4) => self.view_employee_count()?,
                Ok(5) => self.add_performance_review()?,
                Ok(6) => self.view_performance_reviews()?,
                Ok(7) => break,
                Ok(_) => self.prompt.say("✗ Please enter a number between 1-7")?,
                Err(_) => self.prompt.say("✗ Invalid input. Please enter a number.")?,
            }
        }

        info!("operator '{}' logged out", session.username);
        self.prompt
            .say("\nThank you for using Employee Management System!")?;
        Ok(Outcome::LoggedOut)
    }

    /// Print a non-fatal error and swallow it; pass fatal ones through
    fn report<T>(&mut self, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(v) => Ok(Some(v)),
            Err(e) if is_fatal(&e) => Err(e),
            Err(e) => {
                self.prompt.say(&format!("✗ {}", e))?;
                Ok(None)
            }
        }
    }

    fn authenticate(&mut self) -> Result<Option<Session>> {
        self.prompt.say("\n1. Register new user")?;
        self.prompt.say("2. Login")?;

        let Some(choice) = self.prompt.ask("\nEnter choice (1-2): ")? else {
            return Ok(None);
        };

        match choice.parse::<u32>() {
            Ok(1) => {
                if !self.register()? {
                    return Ok(None);
                }
                self.login()
            }
            Ok(2) => self.login(),
            Ok(_) => {
                self.prompt.say("✗ Invalid choice")?;
                Ok(None)
            }
            Err(_) => {
                self.prompt.say("✗ Please enter a valid number")?;
                Ok(None)
            }
        }
    }

    fn register(&mut self) -> Result<bool> {
        self.prompt.say("")?;
        self.prompt.rule(40)?;
        self.prompt.say("USER REGISTRATION")?;
        self.prompt.rule(40)?;

        let Some(username) = self.prompt.ask("Enter username: ")? else {
            return Ok(false);
        };
        let Some(password) = self.prompt.ask("Enter password: ")? else {
            return Ok(false);
        };

        let result = self
            .db
            .credentials()
            .register(&username, &password)
            .map_err(anyhow::Error::from);
        if self.report(result)?.is_none() {
            return Ok(false);
        }
        self.prompt.say("✓ User registered successfully!")?;
        Ok(true)
    }

    fn login(&mut self) -> Result<Option<Session>> {
        self.prompt.say("")?;
        self.prompt.rule(40)?;
        self.prompt.say("USER LOGIN")?;
        self.prompt.rule(40)?;

        let Some(username) = self.prompt.ask("Username: ")? else {
            return Ok(None);
        };
        let Some(password) = self.prompt.ask("Password: ")? else {
            return Ok(None);
        };

        let result = self
            .db
            .credentials()
            .login(&username, &password)
            .map_err(anyhow::Error::from);
        let session = self.report(result)?;
        if session.is_some() {
            self.prompt.say("✓ Login successful!")?;
        }
        Ok(session)
    }

    fn display_main_menu(&mut self, session: &Session) -> Result<()> {
        self.prompt.say("")?;
        self.prompt.rule(50)?;
        self.prompt.say("      EMPLOYEE MANAGEMENT SYSTEM")?;
        self.prompt.rule(50)?;
        self.prompt.say(&format!(
            "Date: {}    Operator: {} ({})",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            session.username,
            session.role
        ))?;
        self.prompt.say("\n1. Add New Employee")?;
        self.prompt.say("2. View All Employees")?;
        self.prompt.say("3. Update Employee Salary")?;
        self.prompt.say("4. View Employee Count")?;
        self.prompt.say("5. Add Performance Review")?;
        self.prompt.say("6. View Performance Reviews")?;
        self.prompt.say("7. Logout")?;
        self.prompt.rule(50)?;
        Ok(())
    }

    fn add_employee(&mut self) -> Result<()> {
        self.prompt.say("\n--- ADD NEW EMPLOYEE ---")?;

        let mut form = NewEmployeeForm::default();
        let fields: [(&str, &mut String); 7] = [
            ("Employee ID: ", &mut form.employee_id),
            ("Full Name: ", &mut form.name),
            ("Department: ", &mut form.department),
            ("Position: ", &mut form.position),
            ("Salary: ", &mut form.salary),
            ("Age: ", &mut form.age),
            ("Email: ", &mut form.email),
        ];
        for (label, slot) in fields {
            match self.prompt.ask(label)? {
                Some(value) => *slot = value,
                None => return Ok(()),
            }
        }

        let result = EmployeeLens::new(self.db).add(&form);
        if self.report(result)?.is_some() {
            self.prompt.say("✓ Employee added successfully!")?;
        }
        Ok(())
    }

    fn view_all_employees(&mut self) -> Result<()> {
        self.prompt.say("\n--- ALL EMPLOYEES ---")?;

        let lens = EmployeeLens::new(self.db);
        let result = lens.list();
        let Some(employees) = self.report(result)? else {
            return Ok(());
        };

        if employees.is_empty() {
            self.prompt.say("No employees found in database")?;
            return Ok(());
        }

        let result = lens.format_employees(&employees, self.format);
        if let Some(text) = self.report(result)? {
            self.prompt.say(&text)?;
        }
        Ok(())
    }

    fn update_salary(&mut self) -> Result<()> {
        self.prompt.say("\n--- UPDATE SALARY ---")?;

        let Some(raw_id) = self.prompt.ask("Enter Employee ID: ")? else {
            return Ok(());
        };

        let lens = EmployeeLens::new(self.db);
        let result = lens.lookup(&raw_id);
        let Some(employee) = self.report(result)? else {
            return Ok(());
        };

        self.prompt.say(&format!(
            "Current salary for {}: ${:.2}",
            employee.name, employee.salary
        ))?;

        let Some(raw_percent) = self
            .prompt
            .ask("Enter percentage increase (e.g., 10 for 10%): ")?
        else {
            return Ok(());
        };

        let result = lens.apply_raise(&employee, &raw_percent);
        if let Some(change) = self.report(result)? {
            self.prompt.say(&format!(
                "✓ Salary updated successfully! New salary: ${:.2}",
                change.new_salary
            ))?;
        }
        Ok(())
    }

    fn view_employee_count(&mut self) -> Result<()> {
        let result = EmployeeLens::new(self.db).count();
        if let Some(count) = self.report(result)? {
            self.prompt
                .say(&format!("\nTotal employees in system: {}", count))?;
        }
        Ok(())
    }

    fn add_performance_review(&mut self) -> Result<()> {
        self.prompt.say("\n--- ADD PERFORMANCE REVIEW ---")?;

        let mut form = NewReviewForm::default();
        let fields: [(&str, &mut String); 3] = [
            ("Employee ID: ", &mut form.employee_id),
            ("Performance Rating (1-5): ", &mut form.rating),
            ("Comments: ", &mut form.comments),
        ];
        for (label, slot) in fields {
            match self.prompt.ask(label)? {
                Some(value) => *slot = value,
                None => return Ok(()),
            }
        }

        let result = ReviewLens::new(self.db).add(&form);
        if self.report(result)?.is_some() {
            self.prompt
                .say("✓ Performance review added successfully!")?;
        }
        Ok(())
    }

    fn view_performance_reviews(&mut self) -> Result<()> {
        self.prompt.say("\n--- PERFORMANCE REVIEWS ---")?;

        let Some(raw_id) = self.prompt.ask("Employee ID: ")? else {
            return Ok(());
        };

        let lens = ReviewLens::new(self.db);
        let result = lens.list_for(&raw_id);
        let Some(reviews) = self.report(result)? else {
            return Ok(());
        };

        if reviews.is_empty() {
            self.prompt
                .say(&format!("No reviews found for employee {}", raw_id))?;
            return Ok(());
        }

        let result = lens.format_reviews(&reviews, self.format);
        if let Some(text) = self.report(result)? {
            self.prompt.say(&text)?;
        }
        Ok(())
    }
}
