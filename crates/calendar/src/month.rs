//! Calendar months

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{CalendarError, Result};

/// A calendar month, e.g. `2024-03`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct YearMonth {
    first: NaiveDate,
    last: NaiveDate,
}

impl YearMonth {
    /// Creates a month, failing for a month outside 1..=12 or an
    /// unrepresentable year.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self::of)
            .ok_or(CalendarError::InvalidMonth { year, month })
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        let first = date - Duration::days(i64::from(date.day0()));
        // only the last representable month has no successor
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        Self { first, last }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last
    }

    /// Number of days in the month.
    pub fn day_count(&self) -> u32 {
        self.last.day()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }

    /// Days of the month in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let last = self.last;
        self.first.iter_days().take_while(move |day| *day <= last)
    }

    /// The following month, if representable.
    pub fn succ(&self) -> Option<Self> {
        self.last.succ_opt().map(Self::of)
    }

    /// The preceding month, if representable.
    pub fn pred(&self) -> Option<Self> {
        self.first.pred_opt().map(Self::of)
    }

    /// `YYYYMM`, the form the diary API expects in `yearMonth`.
    pub fn compact(&self) -> String {
        format!("{:04}{:02}", self.year(), self.month())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = CalendarError;

    /// Accepts `YYYY-MM`, `YYYY/MM` and `YYYYMM`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CalendarError::InvalidYearMonth(s.to_string());
        let trimmed = s.trim();

        let (year, month) = match trimmed.split_once(|c: char| c == '-' || c == '/') {
            Some(parts) => parts,
            None if trimmed.len() == 6 && trimmed.is_char_boundary(4) => trimmed.split_at(4),
            None => return Err(invalid()),
        };

        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for YearMonth {
    type Error = CalendarError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}
