//! Date range and day iteration.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};

use crate::DateRangeError;

/// Date format used for daily file names and range arguments.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// Start date (inclusive).
    pub start: NaiveDate,
    /// End date (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    ///
    /// # Errors
    ///
    /// Returns an error if start > end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses a range from two `YYYY-MM-DD` strings.
    ///
    /// # Errors
    ///
    /// Returns an error if either string is malformed or start > end.
    pub fn parse(start: &str, end: &str) -> Result<Self, DateRangeError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// Creates a date range for a single day.
    #[must_use]
    pub const fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Returns an iterator over all days in the range, in calendar order.
    pub fn days(&self) -> DayIterator {
        DayIterator {
            current: Some(self.start),
            end: self.end,
        }
    }

    /// Returns the days of the range formatted as `YYYY-MM-DD`.
    #[must_use]
    pub fn date_strings(&self) -> Vec<String> {
        self.days()
            .map(|d| d.format(DATE_FORMAT).to_string())
            .collect()
    }

    /// Returns the total number of days in the range.
    #[must_use]
    pub fn total_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    /// Returns true if the range contains the given date.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Returns midnight (UTC) of the start date.
    #[must_use]
    pub fn start_datetime(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.start.and_time(NaiveTime::MIN))
    }

    /// Returns midnight (UTC) of the day after the end date.
    #[must_use]
    pub fn end_datetime_exclusive(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.end.and_time(NaiveTime::MIN)) + TimeDelta::days(1)
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Parses a single `YYYY-MM-DD` date.
fn parse_date(s: &str) -> Result<NaiveDate, DateRangeError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| DateRangeError::InvalidDate(s.to_string()))
}

/// Iterator over all days in a date range.
#[derive(Debug, Clone)]
pub struct DayIterator {
    current: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for DayIterator {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let day = self.current.filter(|d| *d <= self.end)?;
        self.current = day.succ_opt();
        Some(day)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.current {
            Some(day) if day <= self.end => {
                let days = (self.end - day).num_days() as usize + 1;
                (days, Some(days))
            }
            _ => (0, Some(0)),
        }
    }
}

impl ExactSizeIterator for DayIterator {}
