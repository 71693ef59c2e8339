//! Calendar date parsing shared by the calculators.
//!
//! Every date is a bare Gregorian `YYYY-MM-DD` triple pinned to 12:00:00 UTC,
//! so no timezone offset can push it onto a neighbouring day.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Display label for calculators that received no input.
pub const UNKNOWN_LABEL: &str = "Desconhecido";

lazy_static::lazy_static! {
    static ref DATE_SHAPE: regex::Regex =
        regex::Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static date regex");
}

/// Errors raised while reading a calendar date
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("No date was provided")]
    EmptyInput,
    #[error("Invalid date format: {input:?} (expected YYYY-MM-DD)")]
    InvalidDateFormat { input: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CalendarDate {
    year: i32,
    month: u32,
    day: u32,
}

impl CalendarDate {
    /// Build a date from its parts, rejecting impossible Gregorian days.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(|_| Self { year, month, day })
    }

    /// Parse a strict `YYYY-MM-DD` string.
    pub fn parse(input: &str) -> Result<Self, CalendarError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CalendarError::EmptyInput);
        }

        let invalid = || CalendarError::InvalidDateFormat {
            input: input.to_string(),
        };

        if !DATE_SHAPE.is_match(trimmed) {
            return Err(invalid());
        }

        let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| invalid())?;
        Ok(Self::from(date))
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// The instant this date stands for: noon UTC.
    pub fn at_noon_utc(&self) -> DateTime<Utc> {
        // from_ymd/parse already validated the triple, so `single()` always hits.
        Utc.with_ymd_and_hms(self.year, self.month, self.day, 12, 0, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Shift by a whole number of days.
    pub fn add_days(&self, days: i64) -> Option<Self> {
        let naive = NaiveDate::from_ymd_opt(self.year, self.month, self.day)?;
        let shifted = naive.checked_add_signed(chrono::Duration::days(days))?;
        Some(Self::from(shifted))
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl std::str::FromStr for CalendarDate {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse a date that may legitimately be absent.
///
/// Empty input is the "unknown" case and yields `Ok(None)`; anything else that
/// fails to parse is still an error.
pub fn parse_optional(input: &str) -> Result<Option<CalendarDate>, CalendarError> {
    match CalendarDate::parse(input) {
        Ok(date) => Ok(Some(date)),
        Err(CalendarError::EmptyInput) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Render an optional calculator result, falling back to [`UNKNOWN_LABEL`].
pub fn label_or_unknown<T: fmt::Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
}
