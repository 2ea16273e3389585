//! Average inside depth conditioned on price changes.

use chrono::{DateTime, Utc};
use flowbeta_types::{DepthPoint, Interval, Quote};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::GridFill;

/// Parameters of the depth series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthParams {
    /// Window over which each depth value is estimated.
    pub window: Interval,
    /// Treatment of windows without quotes.
    pub fill: GridFill,
}

impl Default for DepthParams {
    fn default() -> Self {
        Self {
            window: Interval::WINDOW_DEFAULT,
            fill: GridFill::Sparse,
        }
    }
}

/// Depth sum and change count of one book side.
///
/// Prices are oriented so that a fall moves away from the spread: a fall
/// takes the current size, a rise takes the previous size.
fn side_depth(levels: impl Iterator<Item = (f64, f64)>) -> (f64, usize) {
    let mut sum = 0.0;
    let mut changes = 0;
    let mut prev: Option<(f64, f64)> = None;

    for (price, amount) in levels {
        if let Some((prev_price, prev_amount)) = prev {
            if price < prev_price {
                sum += amount;
                changes += 1;
            } else if price > prev_price {
                sum += prev_amount;
                changes += 1;
            }
        }
        prev = Some((price, amount));
    }

    (sum, changes)
}

#[allow(clippy::cast_precision_loss)]
fn ratio((sum, changes): (f64, usize)) -> f64 {
    if changes == 0 { f64::NAN } else { sum / changes as f64 }
}

/// Estimates the average inside depth of a quote slice.
///
/// On the bid side, sizes are taken at the current quote when the bid falls
/// and at the previous quote when it rises, then divided by the number of
/// bid price changes. The ask side mirrors this. The estimate is half the
/// sum of both sides, and NaN when either side never moved.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use flowbeta_signal::average_depth;
/// use flowbeta_types::Quote;
///
/// let t = Utc.with_ymd_and_hms(2020, 11, 15, 0, 0, 0).unwrap();
/// let quotes = [
///     Quote::new(t, 4.0, 10.2, 10.0, 2.0),
///     Quote::new(t, 6.0, 10.3, 9.9, 3.0),
/// ];
/// assert_eq!(average_depth(&quotes), 4.5);
/// assert!(average_depth(&quotes[..1]).is_nan());
/// ```
#[must_use]
pub fn average_depth(quotes: &[Quote]) -> f64 {
    let bid = side_depth(quotes.iter().map(|q| (q.bid_price, q.bid_amount)));
    let ask = side_depth(quotes.iter().map(|q| (-q.ask_price, q.ask_amount)));
    0.5 * (ratio(bid) + ratio(ask))
}

/// Estimates depth per window of one day's quotes.
///
/// Price changes are only compared within a window; the first quote of each
/// window has no predecessor.
#[must_use]
pub fn depth_series(quotes: &[Quote], params: &DepthParams) -> Vec<DepthPoint> {
    let mut windows: BTreeMap<DateTime<Utc>, Vec<Quote>> = BTreeMap::new();
    for quote in quotes {
        windows
            .entry(params.window.bucket_start(quote.timestamp))
            .or_default()
            .push(quote.clone());
    }

    let (Some(&first), Some(&last)) = (windows.keys().next(), windows.keys().next_back()) else {
        return Vec::new();
    };

    match params.fill {
        GridFill::Sparse => windows
            .iter()
            .map(|(start, slice)| DepthPoint::new(*start, average_depth(slice)))
            .collect(),
        GridFill::Dense => params
            .window
            .steps(first, last)
            .map(|start| {
                let depth = windows.get(&start).map_or(f64::NAN, |s| average_depth(s));
                DepthPoint::new(start, depth)
            })
            .collect(),
    }
}
