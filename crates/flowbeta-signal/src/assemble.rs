//! Multi-day assembly with per-day fault isolation.

use chrono::NaiveDate;
use flowbeta_load::TickSource;
use flowbeta_types::{DateRange, DayIterator, DepthPoint, FlowError, Result, SignalRow};
use tracing::{debug, info, warn};

use crate::{DepthParams, SignalParams, depth_series, resample};

/// Failure class of a skipped day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Index or shape problem inside the day's computation.
    Alignment,
    /// Any other failure, including a missing source file.
    Other,
}

impl FailureKind {
    /// Classifies a per-day error.
    #[must_use]
    pub const fn of(err: &FlowError) -> Self {
        if err.is_alignment() {
            Self::Alignment
        } else {
            Self::Other
        }
    }
}

/// Result of processing one day of a multi-day run.
#[derive(Debug)]
pub struct DayBatch<T> {
    /// The processed date.
    pub date: NaiveDate,
    /// Rows produced for the day; empty when the day failed.
    pub rows: Vec<T>,
    /// Failure class, if the day was skipped.
    pub failure: Option<FailureKind>,
}

impl<T> DayBatch<T> {
    /// Creates a batch for a successful day.
    #[must_use]
    pub const fn new(date: NaiveDate, rows: Vec<T>) -> Self {
        Self {
            date,
            rows,
            failure: None,
        }
    }

    /// Creates a batch for a skipped day.
    #[must_use]
    pub const fn skipped(date: NaiveDate, kind: FailureKind) -> Self {
        Self {
            date,
            rows: Vec::new(),
            failure: Some(kind),
        }
    }

    /// Returns true if the day was skipped.
    #[must_use]
    pub const fn had_error(&self) -> bool {
        self.failure.is_some()
    }

    fn from_result(date: NaiveDate, result: Result<Vec<T>>) -> Self {
        match result {
            Ok(rows) => {
                info!(%date, rows = rows.len(), "{date} done");
                Self::new(date, rows)
            }
            Err(err) => {
                let kind = FailureKind::of(&err);
                match kind {
                    FailureKind::Alignment => {
                        warn!(%date, error = %err, "alignment error, skipping day");
                    }
                    FailureKind::Other => {
                        warn!(%date, error = %err, "other error, skipping day");
                    }
                }
                Self::skipped(date, kind)
            }
        }
    }
}

/// Records stamped just outside the file's date stay in the table and fall
/// into their own buckets.
fn note_strays<'a>(
    date: NaiveDate,
    table: &str,
    timestamps: impl Iterator<Item = &'a chrono::DateTime<chrono::Utc>>,
) {
    let stray = timestamps.filter(|ts| ts.date_naive() != date).count();
    if stray > 0 {
        debug!(%date, stray, "{table} stamped outside the day");
    }
}

/// Builds the interval-signal table of one day.
///
/// Records whose timestamp falls outside `date`, such as exchange stamps a
/// few milliseconds before midnight, are kept and bucketed by their own
/// timestamp.
///
/// # Errors
///
/// Returns an error if either source fails to load, or an alignment error
/// if the day has no quotes.
pub fn construct_day<S: TickSource>(
    source: &S,
    date: NaiveDate,
    params: &SignalParams,
) -> Result<Vec<SignalRow>> {
    let quotes = source.quotes(date)?;
    let trades = source.trades(date)?;

    if quotes.is_empty() {
        return Err(FlowError::Alignment(format!("no quotes for {date}")));
    }
    note_strays(date, "quotes", quotes.iter().map(|q| &q.timestamp));
    note_strays(date, "trades", trades.iter().map(|t| &t.timestamp));

    Ok(resample(&quotes, &trades, params))
}

/// Builds the depth series of one day.
///
/// # Errors
///
/// Returns an error if the quote source fails to load, or an alignment error
/// if the day has no quotes.
pub fn depth_day<S: TickSource>(
    source: &S,
    date: NaiveDate,
    params: &DepthParams,
) -> Result<Vec<DepthPoint>> {
    let quotes = source.quotes(date)?;

    if quotes.is_empty() {
        return Err(FlowError::Alignment(format!("no quotes for {date}")));
    }
    note_strays(date, "quotes", quotes.iter().map(|q| &q.timestamp));

    Ok(depth_series(&quotes, params))
}

/// Day-by-day iterator over a date range.
///
/// Each item is the outcome of one day, in date order. Failed days are
/// logged and yielded as skipped batches.
#[derive(Debug)]
pub struct DayBatches<'a, S, P, T> {
    source: &'a S,
    params: P,
    days: DayIterator,
    build: fn(&S, NaiveDate, &P) -> Result<Vec<T>>,
}

impl<S, P, T> Iterator for DayBatches<'_, S, P, T> {
    type Item = DayBatch<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let date = self.days.next()?;
        let result = (self.build)(self.source, date, &self.params);
        Some(DayBatch::from_result(date, result))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.days.size_hint()
    }
}

/// Iterates interval-signal construction over a date range.
#[must_use]
pub fn signal_days<S: TickSource>(
    source: &S,
    range: DateRange,
    params: SignalParams,
) -> DayBatches<'_, S, SignalParams, SignalRow> {
    DayBatches {
        source,
        params,
        days: range.days(),
        build: construct_day::<S>,
    }
}

/// Iterates depth estimation over a date range.
#[must_use]
pub fn depth_days<S: TickSource>(
    source: &S,
    range: DateRange,
    params: DepthParams,
) -> DayBatches<'_, S, DepthParams, DepthPoint> {
    DayBatches {
        source,
        params,
        days: range.days(),
        build: depth_day::<S>,
    }
}

/// Concatenates the rows of all successful days, in date order.
pub fn flatten_days<T>(batches: impl IntoIterator<Item = DayBatch<T>>) -> Vec<T> {
    batches.into_iter().flat_map(|b| b.rows).collect()
}

/// Builds the interval-signal table of a date range.
///
/// Days that fail are logged and left out; a single bad day never aborts
/// the run.
#[must_use]
pub fn assemble_signals<S: TickSource>(
    source: &S,
    range: DateRange,
    params: SignalParams,
) -> Vec<SignalRow> {
    flatten_days(signal_days(source, range, params))
}

/// Builds the depth series of a date range with the same per-day fault
/// isolation as [`assemble_signals`].
#[must_use]
pub fn assemble_depth<S: TickSource>(
    source: &S,
    range: DateRange,
    params: DepthParams,
) -> Vec<DepthPoint> {
    flatten_days(depth_days(source, range, params))
}
