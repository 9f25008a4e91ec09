//! Performance review lens

use crate::database::{NewReview, PerformanceRecord, StaffDatabase};
use crate::errors::InputFormatError;
use crate::lens::utils::{parse_i64, parse_u32, OutputFormat};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Raw fields for a new review
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewReviewForm {
    pub employee_id: String,
    pub rating: String,
    pub comments: String,
}

impl NewReviewForm {
    pub fn parse(&self) -> Result<NewReview, InputFormatError> {
        Ok(NewReview {
            employee_id: parse_u32("Employee ID", &self.employee_id)?,
            rating: parse_i64("Performance Rating", &self.rating)?,
            comments: self.comments.clone(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Tabled)]
pub struct ReviewEntry {
    #[tabled(rename = "Record")]
    pub record_id: i64,
    #[tabled(rename = "Employee")]
    pub employee_id: u32,
    #[tabled(rename = "Rating")]
    pub rating: String,
    #[tabled(rename = "Date")]
    pub review_date: String,
    #[tabled(rename = "Comments")]
    pub comments: String,
}

impl From<&PerformanceRecord> for ReviewEntry {
    fn from(r: &PerformanceRecord) -> Self {
        Self {
            record_id: r.record_id,
            employee_id: r.employee_id,
            rating: format!("{}/5", r.rating),
            review_date: r.review_date.to_string(),
            comments: r.comments.clone(),
        }
    }
}

pub struct ReviewLens<'a> {
    db: &'a StaffDatabase,
}

impl<'a> ReviewLens<'a> {
    pub fn new(db: &'a StaffDatabase) -> Self {
        Self { db }
    }

    /// Parse and append a review; returns the new record id
    pub fn add(&self, form: &NewReviewForm) -> Result<i64> {
        let review = form.parse()?;
        Ok(self.db.reviews().add_review(&review)?)
    }

    /// Reviews of one employee from a raw ID
    pub fn list_for(&self, raw_id: &str) -> Result<Vec<PerformanceRecord>> {
        let employee_id = parse_u32("Employee ID", raw_id)?;
        Ok(self.db.reviews().list_for_employee(employee_id)?)
    }

    pub fn format_reviews(&self, reviews: &[PerformanceRecord], format: OutputFormat) -> Result<String> {
        let entries: Vec<ReviewEntry> = reviews.iter().map(ReviewEntry::from).collect();

        let output = match format {
            OutputFormat::Table => Table::new(&entries).with(Style::rounded()).to_string(),
            OutputFormat::Markdown => Table::new(&entries).with(Style::markdown()).to_string(),
            OutputFormat::Json => serde_json::to_string(reviews)?,
            OutputFormat::JsonPretty => serde_json::to_string_pretty(reviews)?,
            OutputFormat::JsonLine => reviews
                .iter()
                .map(serde_json::to_string)
                .collect::<Result<Vec<_>, _>>()?
                .join("\n"),
            OutputFormat::Psv => {
                let mut lines = vec!["record_id|employee_id|rating|review_date|comments".to_string()];
                lines.extend(reviews.iter().map(|r| {
                    format!(
                        "{}|{}|{}|{}|{}",
                        r.record_id, r.employee_id, r.rating, r.review_date, r.comments
                    )
                }));
                lines.join("\n")
            }
        };
        Ok(output)
    }
}
