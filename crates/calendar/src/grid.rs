//! Month grid construction

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Deref;
use std::slice::Chunks;

use crate::{CalendarError, Result, YearMonth};

/// Anything that belongs to exactly one calendar day.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for NaiveDate {
    fn date(&self) -> NaiveDate {
        *self
    }
}

impl<T: Dated> Dated for &T {
    fn date(&self) -> NaiveDate {
        (**self).date()
    }
}

/// One day of the month view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarCell<E> {
    pub date: NaiveDate,
    /// `false` for padding days borrowed from the adjacent months.
    pub belongs_to_focused_month: bool,
    /// Entries of this day, in the order they were handed to the builder.
    pub entries: Vec<E>,
}

impl<E> CalendarCell<E> {
    pub fn has_entries(&self) -> bool {
        !self.entries.is_empty()
    }
}

/// Complete weeks covering one month, Sunday first.
///
/// The cell count is always a multiple of seven and dates ascend by one day
/// from cell to cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarGrid<E> {
    month: YearMonth,
    cells: Vec<CalendarCell<E>>,
}

impl<E> CalendarGrid<E> {
    /// The focused month.
    pub fn month(&self) -> YearMonth {
        self.month
    }

    pub fn cells(&self) -> &[CalendarCell<E>] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<CalendarCell<E>> {
        self.cells
    }

    /// Rows of seven cells.
    pub fn weeks(&self) -> Chunks<'_, CalendarCell<E>> {
        self.cells.chunks(7)
    }

    /// Cells of the focused month only.
    pub fn focused_cells(&self) -> impl Iterator<Item = &CalendarCell<E>> {
        self.cells.iter().filter(|cell| cell.belongs_to_focused_month)
    }

    /// The cell for `date`, if it is on the grid.
    pub fn cell(&self, date: NaiveDate) -> Option<&CalendarCell<E>> {
        self.cells
            .binary_search_by_key(&date, |cell| cell.date)
            .ok()
            .map(|index| &self.cells[index])
    }
}

impl<E> Deref for CalendarGrid<E> {
    type Target = [CalendarCell<E>];

    fn deref(&self) -> &Self::Target {
        &self.cells
    }
}

impl<E> IntoIterator for CalendarGrid<E> {
    type Item = CalendarCell<E>;
    type IntoIter = std::vec::IntoIter<CalendarCell<E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

/// Builds the grid of the month containing `focused`.
///
/// Leading days run back to the Sunday before the first of the month and
/// trailing days forward to the Saturday after the last. Entries dated
/// outside the padded range are dropped.
pub fn build_month_grid<E, I>(focused: NaiveDate, entries: I) -> Result<CalendarGrid<E>>
where
    E: Dated,
    I: IntoIterator<Item = E>,
{
    let month = YearMonth::of(focused);

    let leading = month.first_day().weekday().num_days_from_sunday();
    let trailing = 6 - month.last_day().weekday().num_days_from_sunday();

    let start = month
        .first_day()
        .checked_sub_days(Days::new(u64::from(leading)))
        .ok_or(CalendarError::OutOfRange(focused))?;
    let end = month
        .last_day()
        .checked_add_days(Days::new(u64::from(trailing)))
        .ok_or(CalendarError::OutOfRange(focused))?;

    let mut by_day: BTreeMap<NaiveDate, Vec<E>> = BTreeMap::new();
    for entry in entries {
        by_day.entry(entry.date()).or_default().push(entry);
    }

    let cells: Vec<CalendarCell<E>> = start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(|date| CalendarCell {
            date,
            belongs_to_focused_month: month.contains(date),
            entries: by_day.remove(&date).unwrap_or_default(),
        })
        .collect();

    if !by_day.is_empty() {
        log::debug!(
            "{} day(s) of entries fall outside the {} grid",
            by_day.len(),
            month
        );
    }

    Ok(CalendarGrid { month, cells })
}

/// Builds the grid for `year`/`month`, failing for an invalid pair.
pub fn build_month_grid_for<E, I>(year: i32, month: u32, entries: I) -> Result<CalendarGrid<E>>
where
    E: Dated,
    I: IntoIterator<Item = E>,
{
    let month = YearMonth::new(year, month)?;
    build_month_grid(month.first_day(), entries)
}
