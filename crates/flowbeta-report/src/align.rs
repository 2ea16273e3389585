//! Timestamp-keyed alignment of the beta and depth series.

use chrono::{DateTime, Utc};
use flowbeta_regress::{RegressionParams, Variable, WindowedRegression, extract_betas};
use flowbeta_types::{
    BetaPoint, DepthPoint, FlowError, Interval, ReportRow, Result, SignalRow, TIMESTAMP_FORMAT,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Parameters of the aligned report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportParams {
    /// Step of the grid spanning the depth series.
    pub grid: Interval,
    /// Predictor whose slope becomes the beta column.
    pub predictor: Variable,
}

impl Default for ReportParams {
    fn default() -> Self {
        Self {
            grid: Interval::WINDOW_DEFAULT,
            predictor: Variable::Ofi,
        }
    }
}

/// Returns the grid from the earliest to the latest depth timestamp.
#[must_use]
pub fn depth_grid(depth: &[DepthPoint], grid: Interval) -> Vec<DateTime<Utc>> {
    let first = depth.iter().map(|p| p.timestamp).min();
    let last = depth.iter().map(|p| p.timestamp).max();
    match (first, last) {
        (Some(first), Some(last)) => grid.steps(first, last).collect(),
        _ => Vec::new(),
    }
}

/// Joins betas and depth on timestamp.
///
/// Every grid slot must carry exactly one beta. Depth values missing from
/// a slot read as NaN.
///
/// # Errors
///
/// Returns [`FlowError::CardinalityMismatch`] if the beta count differs from
/// the grid size or a beta falls off the grid.
pub fn align(betas: &[BetaPoint], depth: &[DepthPoint], grid: Interval) -> Result<Vec<ReportRow>> {
    let slots = depth_grid(depth, grid);
    let mismatch = || FlowError::CardinalityMismatch {
        betas: betas.len(),
        grid: slots.len(),
    };

    if betas.len() != slots.len() {
        return Err(mismatch());
    }

    let by_time: BTreeMap<_, _> = betas.iter().map(|b| (b.timestamp, b.beta)).collect();
    let mut rows: BTreeMap<DateTime<Utc>, ReportRow> = BTreeMap::new();
    for &slot in &slots {
        let beta = by_time.get(&slot).copied().ok_or_else(mismatch)?;
        rows.insert(slot, ReportRow::new(slot, beta, f64::NAN));
    }

    for point in depth {
        rows.entry(point.timestamp)
            .or_insert_with(|| ReportRow::new(point.timestamp, f64::NAN, f64::NAN))
            .avg_depth = point.avg_depth;
    }

    Ok(rows.into_values().collect())
}

/// Formats a report timestamp.
#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

fn prefix(text: &str, len: usize) -> &str {
    text.get(..len).unwrap_or(text)
}

/// Keeps rows whose formatted timestamp lies between `start` and `end`,
/// inclusive.
///
/// Each bound is compared against the timestamp truncated to the bound's
/// length, so `"2020-11-15"` covers the whole day.
#[must_use]
pub fn restrict(rows: &[ReportRow], start: &str, end: &str) -> Vec<ReportRow> {
    rows.iter()
        .filter(|row| {
            let text = format_timestamp(row.timestamp);
            prefix(&text, start.len()) >= start && prefix(&text, end.len()) <= end
        })
        .copied()
        .collect()
}

/// Runs the regression on `signals`, aligns the betas with `depth` and
/// restricts the result to `[start, end]`.
///
/// Returns `Ok(None)` with a warning when `end` is not after `start`.
///
/// # Errors
///
/// Propagates regression, extraction and alignment failures.
pub fn finished_report(
    signals: &[SignalRow],
    depth: &[DepthPoint],
    start: &str,
    end: &str,
    regression: &RegressionParams,
    report: &ReportParams,
) -> Result<Option<Vec<ReportRow>>> {
    if end <= start {
        warn!(start, end, "end date should be greater than start date");
        return Ok(None);
    }

    let fits = WindowedRegression::new(regression.clone()).fit(signals)?;
    let betas = extract_betas(&fits, report.predictor)?;
    let aligned = align(&betas, depth, report.grid)?;
    let rows = restrict(&aligned, start, end);

    info!(windows = fits.len(), rows = rows.len(), "built aligned report");
    Ok(Some(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 11, 15, 0, 0, 0).unwrap() + TimeDelta::minutes(minutes)
    }

    #[test]
    fn test_depth_grid_spans_min_to_max() {
        let depth = [DepthPoint::new(at(90), 1.0), DepthPoint::new(at(0), 2.0)];
        let grid = depth_grid(&depth, Interval::WINDOW_DEFAULT);
        assert_eq!(grid, vec![at(0), at(30), at(60), at(90)]);
    }

    #[test]
    fn test_align_fills_missing_depth() {
        let betas: Vec<_> = (0..3).map(|i| BetaPoint::new(at(30 * i), i as f64)).collect();
        let depth = [DepthPoint::new(at(0), 5.0), DepthPoint::new(at(60), 7.0)];

        let rows = align(&betas, &depth, Interval::WINDOW_DEFAULT).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], ReportRow::new(at(0), 0.0, 5.0));
        assert!(rows[1].avg_depth.is_nan());
        assert_eq!(rows[2], ReportRow::new(at(60), 2.0, 7.0));
    }

    #[test]
    fn test_align_count_mismatch() {
        let betas = [BetaPoint::new(at(0), 1.0)];
        let depth = [DepthPoint::new(at(0), 5.0), DepthPoint::new(at(30), 7.0)];
        let err = align(&betas, &depth, Interval::WINDOW_DEFAULT).unwrap_err();
        assert!(matches!(err, FlowError::CardinalityMismatch { betas: 1, grid: 2 }));
    }

    #[test]
    fn test_align_off_grid_beta() {
        let betas = [BetaPoint::new(at(0), 1.0), BetaPoint::new(at(45), 1.0)];
        let depth = [DepthPoint::new(at(0), 5.0), DepthPoint::new(at(30), 7.0)];
        assert!(matches!(
            align(&betas, &depth, Interval::WINDOW_DEFAULT),
            Err(FlowError::CardinalityMismatch { .. })
        ));
    }

    #[test]
    fn test_format_timestamp_matches_written_layout() {
        let text = format_timestamp(at(570));
        assert_eq!(text, "2020-11-15 09:30:00");
        let parsed = chrono::NaiveDateTime::parse_from_str(&text, TIMESTAMP_FORMAT).unwrap();
        assert_eq!(parsed.and_utc(), at(570));
    }

    #[test]
    fn test_restrict_partial_strings() {
        let rows: Vec<_> = [0, 60 * 24 - 30, 60 * 24, 60 * 48]
            .iter()
            .map(|&m| ReportRow::new(at(m), 1.0, 1.0))
            .collect();

        let kept = restrict(&rows, "2020-11-15", "2020-11-16");
        assert_eq!(kept.len(), 3);

        let kept = restrict(&rows, "2020-11-15", "2020-11-15");
        assert_eq!(kept.len(), 2);

        let kept = restrict(&rows, "2020-11-15 12", "2020-11-16 00:00:00");
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_finished_report_rejects_reversed_range() {
        let result = finished_report(
            &[],
            &[],
            "2020-11-16",
            "2020-11-15",
            &RegressionParams::default(),
            &ReportParams::default(),
        )
        .unwrap();
        assert!(result.is_none());

        let same = finished_report(
            &[],
            &[],
            "2020-11-15",
            "2020-11-15",
            &RegressionParams::default(),
            &ReportParams::default(),
        )
        .unwrap();
        assert!(same.is_none());
    }
}
