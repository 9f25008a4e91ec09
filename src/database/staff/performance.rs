//! Performance review repository
//!
//! Reviews are append-only: there is no update or delete statement for the
//! `performance` table anywhere in the program.

use super::{parse_date_column, today};
use crate::errors::ReviewError;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Lowest accepted rating
pub const MIN_RATING: i64 = 1;
/// Highest accepted rating
pub const MAX_RATING: i64 = 5;

/// A stored performance review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub record_id: i64,
    pub employee_id: u32,
    pub rating: i64,
    pub comments: String,
    pub review_date: NaiveDate,
}

/// Input for a new review
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewReview {
    pub employee_id: u32,
    pub rating: i64,
    #[serde(default)]
    pub comments: String,
}

impl NewReview {
    pub fn new(employee_id: u32, rating: i64, comments: &str) -> Self {
        Self {
            employee_id,
            rating,
            comments: comments.to_string(),
        }
    }

    /// Validate the rating range
    pub fn validate(&self) -> Result<(), ReviewError> {
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(ReviewError::InvalidRating(self.rating));
        }
        Ok(())
    }
}

/// Repository for performance reviews
pub struct PerformanceRepository<'a> {
    conn: &'a Connection,
}

impl<'a> PerformanceRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Append a review dated today; returns the new record id
    pub fn add_review(&self, review: &NewReview) -> Result<i64, ReviewError> {
        review.validate()?;

        let employee: Option<u32> = self
            .conn
            .query_row(
                "SELECT employee_id FROM employees WHERE employee_id = ?1",
                [review.employee_id],
                |row| row.get(0),
            )
            .optional()?;
        if employee.is_none() {
            return Err(ReviewError::EmployeeNotFound(review.employee_id));
        }

        self.conn.execute(
            "INSERT INTO performance (employee_id, rating, comments, review_date)
             VALUES (?1, ?2, ?3, ?4)",
            (
                review.employee_id,
                review.rating,
                review.comments.trim(),
                today(),
            ),
        )?;

        let record_id = self.conn.last_insert_rowid();
        info!(
            "added review {} for employee {} (rating {})",
            record_id, review.employee_id, review.rating
        );
        Ok(record_id)
    }

    /// Reviews of one employee, oldest first
    pub fn list_for_employee(&self, employee_id: u32) -> Result<Vec<PerformanceRecord>, ReviewError> {
        let mut stmt = self.conn.prepare(
            "SELECT record_id, employee_id, rating, comments, review_date
             FROM performance WHERE employee_id = ?1 ORDER BY record_id",
        )?;

        let records = stmt
            .query_map([employee_id], |row| {
                Ok(PerformanceRecord {
                    record_id: row.get(0)?,
                    employee_id: row.get(1)?,
                    rating: row.get(2)?,
                    comments: row.get(3)?,
                    review_date: parse_date_column(row, 4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Total number of reviews
    pub fn count(&self) -> Result<u64, ReviewError> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM performance", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::core::{DatabaseConn, SchemaManager};
    use crate::database::staff::{EmployeeRepository, NewEmployee};
    use chrono::Local;

    fn setup_test_db() -> DatabaseConn {
        let db = DatabaseConn::open_in_memory().unwrap();
        SchemaManager::new(&db.conn).bootstrap().unwrap();
        EmployeeRepository::new(&db.conn)
            .add(&NewEmployee::new(1, "Ada", "R&D").age(36).salary(5000.0))
            .unwrap();
        db
    }

    #[test]
    fn test_add_review() {
        let db = setup_test_db();
        let repo = PerformanceRepository::new(&db.conn);

        let id = repo
            .add_review(&NewReview::new(1, 4, "Solid quarter"))
            .unwrap();

        let reviews = repo.list_for_employee(1).unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].record_id, id);
        assert_eq!(reviews[0].rating, 4);
        assert_eq!(reviews[0].comments, "Solid quarter");
        assert_eq!(reviews[0].review_date, Local::now().date_naive());
    }

    #[test]
    fn test_unknown_employee() {
        let db = setup_test_db();
        let repo = PerformanceRepository::new(&db.conn);

        assert!(matches!(
            repo.add_review(&NewReview::new(999, 3, "n/a")),
            Err(ReviewError::EmployeeNotFound(999))
        ));
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_invalid_rating() {
        let db = setup_test_db();
        let repo = PerformanceRepository::new(&db.conn);

        assert!(matches!(
            repo.add_review(&NewReview::new(1, 6, "")),
            Err(ReviewError::InvalidRating(6))
        ));
        assert!(matches!(
            repo.add_review(&NewReview::new(1, 0, "")),
            Err(ReviewError::InvalidRating(0))
        ));
        // rating is checked before the employee lookup
        assert!(matches!(
            repo.add_review(&NewReview::new(999, 6, "")),
            Err(ReviewError::InvalidRating(6))
        ));
        repo.add_review(&NewReview::new(1, 1, "")).unwrap();
        repo.add_review(&NewReview::new(1, 5, "")).unwrap();
    }

    #[test]
    fn test_record_ids_increase() {
        let db = setup_test_db();
        let repo = PerformanceRepository::new(&db.conn);

        let first = repo.add_review(&NewReview::new(1, 3, "a")).unwrap();
        let second = repo.add_review(&NewReview::new(1, 4, "b")).unwrap();
        let third = repo.add_review(&NewReview::new(1, 5, "c")).unwrap();

        assert!(first < second && second < third);
        assert_eq!(repo.count().unwrap(), 3);

        let ratings: Vec<i64> = repo
            .list_for_employee(1)
            .unwrap()
            .iter()
            .map(|r| r.rating)
            .collect();
        assert_eq!(ratings, vec![3, 4, 5]);
    }

    #[test]
    fn test_list_for_employee_without_reviews() {
        let db = setup_test_db();
        let repo = PerformanceRepository::new(&db.conn);

        assert!(repo.list_for_employee(1).unwrap().is_empty());
    }
}
