//! Fixed-width time buckets anchored at midnight.

use chrono::{DateTime, NaiveTime, TimeDelta, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const SECONDS_PER_DAY: u32 = 86_400;

/// Width of a resampling bucket or regression window.
///
/// Buckets are right-open (`[start, start + width)`) and anchored at
/// midnight UTC of the day each timestamp belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Interval {
    seconds: u32,
}

impl Interval {
    /// Default bucket for interval signals (10 seconds).
    pub const SIGNAL_DEFAULT: Self = Self::from_secs(10);

    /// Default coarse window for depth and regression (30 minutes).
    pub const WINDOW_DEFAULT: Self = Self::from_mins(30);

    /// Creates an interval of the given number of seconds.
    ///
    /// # Panics
    ///
    /// Panics if `seconds` is zero or longer than one day.
    #[must_use]
    pub const fn from_secs(seconds: u32) -> Self {
        assert!(
            seconds > 0 && seconds <= SECONDS_PER_DAY,
            "interval out of range"
        );
        Self { seconds }
    }

    /// Creates an interval of the given number of minutes.
    #[must_use]
    pub const fn from_mins(minutes: u32) -> Self {
        Self::from_secs(minutes * 60)
    }

    /// Returns the width in seconds.
    #[must_use]
    pub const fn seconds(&self) -> u32 {
        self.seconds
    }

    /// Returns the width as a duration.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        TimeDelta::seconds(i64::from(self.seconds))
    }

    /// Returns the start of the bucket containing `timestamp`.
    #[must_use]
    pub fn bucket_start(&self, timestamp: DateTime<Utc>) -> DateTime<Utc> {
        let second_of_day = timestamp.num_seconds_from_midnight();
        let offset = second_of_day / self.seconds * self.seconds;
        let midnight = timestamp.date_naive().and_time(NaiveTime::MIN).and_utc();
        midnight + TimeDelta::seconds(i64::from(offset))
    }

    /// Returns every bucket start from `first` through `last`, inclusive.
    ///
    /// Both bounds are expected to be bucket starts already.
    pub fn steps(
        self,
        first: DateTime<Utc>,
        last: DateTime<Utc>,
    ) -> impl Iterator<Item = DateTime<Utc>> {
        let step = self.duration();
        std::iter::successors(Some(first), move |t| Some(*t + step))
            .take_while(move |t| *t <= last)
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::SIGNAL_DEFAULT
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self.seconds;
        if s % 3600 == 0 {
            write!(f, "{}h", s / 3600)
        } else if s % 60 == 0 {
            write!(f, "{}min", s / 60)
        } else {
            write!(f, "{s}s")
        }
    }
}

impl From<Interval> for String {
    fn from(interval: Interval) -> Self {
        interval.to_string()
    }
}

impl TryFrom<String> for Interval {
    type Error = IntervalParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl FromStr for Interval {
    type Err = IntervalParseError;

    /// Accepts `10s`, `10S`, `30min`, `30Min`, `30m`, `30T`, `1h`, `1H`, `1d`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        let (count, unit) = trimmed.split_at(split);

        let count: u32 = if count.is_empty() {
            1
        } else {
            count
                .parse()
                .map_err(|_| IntervalParseError(s.to_string()))?
        };

        let unit_seconds = match unit.trim().to_lowercase().as_str() {
            "s" | "sec" | "secs" | "second" | "seconds" => 1,
            "m" | "t" | "min" | "mins" | "minute" | "minutes" => 60,
            "h" | "hr" | "hour" | "hours" => 3600,
            "d" | "day" | "days" => SECONDS_PER_DAY,
            _ => return Err(IntervalParseError(s.to_string())),
        };

        match count.checked_mul(unit_seconds) {
            Some(seconds) if seconds > 0 && seconds <= SECONDS_PER_DAY => Ok(Self { seconds }),
            _ => Err(IntervalParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid interval string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalParseError(String);

impl std::fmt::Display for IntervalParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid interval '{}', expected e.g. 10s, 30min, 1h (between 1s and 1d)",
            self.0
        )
    }
}

impl std::error::Error for IntervalParseError {}
