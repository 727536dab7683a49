//! Kong diary calendar grids
//!
//! Builds the month view of the diary: a run of complete weeks (Sunday
//! first) covering one month, padded with days borrowed from the adjacent
//! months, with each day carrying the entries written on it.
//!
//! ```
//! use chrono::NaiveDate;
//! use kong_diary_calendar::build_month_grid;
//!
//! let focused = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! let grid = build_month_grid(focused, Vec::<NaiveDate>::new()).unwrap();
//! assert_eq!(grid.len() % 7, 0);
//! ```

pub mod grid;
pub mod month;

use chrono::NaiveDate;
use thiserror::Error;

pub use grid::{build_month_grid, build_month_grid_for, CalendarCell, CalendarGrid, Dated};
pub use month::YearMonth;

/// Calendar errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("Invalid year-month: {0}")]
    InvalidYearMonth(String),

    #[error("Date out of range: {0}")]
    OutOfRange(NaiveDate),
}

pub type Result<T> = std::result::Result<T, CalendarError>;
