//! Calendar months and the date windows they cover.

use std::ops::RangeInclusive;

use time::{Date, Month};

use crate::Error;

/// The years that dates may fall in.
///
/// Dates are stored as `YYYY-MM-DD` text and compared as strings, which only orders correctly for
/// four digit, non-negative years.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 0..=9999;

/// Check that `date` falls within [SUPPORTED_YEARS].
///
/// # Errors
///
/// Returns [Error::InvalidYear] if the year of `date` is out of range.
pub fn validate_date(date: Date) -> Result<Date, Error> {
    if SUPPORTED_YEARS.contains(&date.year()) {
        Ok(date)
    } else {
        Err(Error::InvalidYear(date.year()))
    }
}

/// A validated calendar month, e.g. March 2024.
///
/// A month covers the half-open date range from its first day up to, but not including, the first
/// day of the following month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMonth {
    start: Date,
    end: Date,
}

impl CalendarMonth {
    /// Create a calendar month from a month number (1 to 12) and a year.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidMonth] if `month` is not in 1 to 12, or [Error::InvalidYear] if
    /// `year` is not in [SUPPORTED_YEARS] or the month after it cannot be represented as a date.
    pub fn new(year: i32, month: u8) -> Result<Self, Error> {
        let month = Month::try_from(month).map_err(|_| Error::InvalidMonth(month))?;
        if !SUPPORTED_YEARS.contains(&year) {
            return Err(Error::InvalidYear(year));
        }
        let start =
            Date::from_calendar_date(year, month, 1).map_err(|_| Error::InvalidYear(year))?;

        let next_year = match month {
            Month::December => year.checked_add(1).ok_or(Error::InvalidYear(year))?,
            _ => year,
        };
        let end = Date::from_calendar_date(next_year, month.next(), 1)
            .map_err(|_| Error::InvalidYear(year))?;

        Ok(Self { start, end })
    }

    /// The first day of the month.
    pub fn start(&self) -> Date {
        self.start
    }

    /// The first day of the following month.
    pub fn end(&self) -> Date {
        self.end
    }

    /// The month number, from 1 to 12.
    pub fn month(&self) -> u8 {
        self.start.month() as u8
    }

    /// The year.
    pub fn year(&self) -> i32 {
        self.start.year()
    }
}
