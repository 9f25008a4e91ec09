//! Common utility functions for lens modules
//!
//! This module provides the unified output format, name truncation for
//! tables, and parsing of raw operator text into typed fields.

use crate::errors::InputFormatError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default maximum length for name display in tables
pub const DEFAULT_NAME_MAX_LEN: usize = 20;

/// Unified output format for listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Pretty table with borders (default)
    #[default]
    Table,
    /// Markdown table format
    Markdown,
    /// Compact JSON (single line)
    Json,
    /// Pretty-printed JSON with indentation
    JsonPretty,
    /// JSON Lines format (one JSON object per line)
    JsonLine,
    /// Pipe-separated values with header
    Psv,
}

impl OutputFormat {
    /// Check if this is a JSON variant
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json | Self::JsonPretty | Self::JsonLine)
    }

    /// Get a list of all format names for help text
    pub fn all_names() -> &'static [&'static str] {
        &[
            "table",
            "markdown",
            "json",
            "json-pretty",
            "json-line",
            "psv",
        ]
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Markdown => write!(f, "markdown"),
            Self::Json => write!(f, "json"),
            Self::JsonPretty => write!(f, "json-pretty"),
            Self::JsonLine => write!(f, "json-line"),
            Self::Psv => write!(f, "psv"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "pretty" => Ok(Self::Table),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "json-pretty" | "jsonpretty" => Ok(Self::JsonPretty),
            "json-line" | "jsonline" | "jsonl" | "ndjson" => Ok(Self::JsonLine),
            "psv" | "pipe" => Ok(Self::Psv),
            _ => Err(format!(
                "Unknown output format '{}'. Valid formats: {}",
                s,
                Self::all_names().join(", ")
            )),
        }
    }
}

/// Truncate a string to the specified length, adding "..." if truncated
///
/// ```
/// use staffdb::lens::utils::truncate_name;
///
/// assert_eq!(truncate_name("Short", 20), "Short");
/// assert_eq!(truncate_name("This is a very long name", 20), "This is a very lo...");
/// ```
pub fn truncate_name(name: &str, max_len: usize) -> String {
    if name.chars().count() <= max_len {
        name.to_string()
    } else {
        let truncated: String = name.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn input_error(field: &str, value: &str, expected: &'static str) -> InputFormatError {
    InputFormatError {
        field: field.to_string(),
        value: value.to_string(),
        expected,
    }
}

/// Parse a whole non-negative number (IDs, ages)
pub fn parse_u32(field: &str, value: &str) -> Result<u32, InputFormatError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| input_error(field, value, "a whole non-negative number"))
}

/// Parse a whole number that may be negative (ratings)
pub fn parse_i64(field: &str, value: &str) -> Result<i64, InputFormatError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| input_error(field, value, "a whole number"))
}

/// Parse a finite decimal number (salaries, percentages)
///
/// `inf` and `NaN` are accepted by `f64::from_str` but rejected here.
pub fn parse_decimal(field: &str, value: &str) -> Result<f64, InputFormatError> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(input_error(field, value, "a decimal number")),
    }
}
