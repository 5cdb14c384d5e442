use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid {field} code '{value}': expected two ASCII letters")]
    InvalidCode { field: &'static str, value: String },
    #[error("Invalid '{field}' date '{value}'. Use RFC3339 or YYYY-MM-DD format.")]
    InvalidDate { field: &'static str, value: String },
    #[error("Date range is empty: 'from' is after 'to'")]
    EmptyDateRange,
}

/// A country or language code: two ASCII letters, stored lowercase.
fn two_letter_code(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(trimmed.to_ascii_lowercase())
    } else {
        Err(ValidationError::InvalidCode {
            field,
            value: value.to_string(),
        })
    }
}

pub fn validate_country(value: &str) -> Result<String, ValidationError> {
    two_letter_code("country", value)
}

pub fn validate_language(value: &str) -> Result<String, ValidationError> {
    two_letter_code("language", value)
}

/// Parses a date bound as an RFC3339 timestamp, or a bare `YYYY-MM-DD` date
/// taken as midnight UTC. Results are naive UTC, matching the stored column.
pub fn parse_date_bound(field: &'static str, value: &str) -> Result<NaiveDateTime, ValidationError> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.naive_utc());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ValidationError::InvalidDate {
            field,
            value: value.to_string(),
        })
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DateRange {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

pub fn parse_date_range(from: Option<&str>, to: Option<&str>) -> Result<DateRange, ValidationError> {
    let from = from
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse_date_bound("from", s.trim()))
        .transpose()?;
    let to = to
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse_date_bound("to", s.trim()))
        .transpose()?;

    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(ValidationError::EmptyDateRange);
        }
    }

    Ok(DateRange { from, to })
}

/// Reads the leading integer of `limit`, like `"25"` or `"25abc"`.
/// Anything without a positive leading integer yields `default`; values
/// beyond `u32::MAX` saturate.
pub fn parse_limit(limit: Option<&str>, default: u32) -> u32 {
    let Some(raw) = limit.map(str::trim) else {
        return default;
    };
    let digits_end = raw
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && *c == '+')))
        .map_or(raw.len(), |(i, _)| i);
    let digits = raw[..digits_end].trim_start_matches('+');

    if digits.is_empty() {
        return default;
    }
    match digits.parse::<u64>() {
        Ok(0) => default,
        Ok(limit) => u32::try_from(limit).unwrap_or(u32::MAX),
        Err(_) => u32::MAX,
    }
}
