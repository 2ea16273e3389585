//! Fixed-interval resampling of event-level signals.

use chrono::{DateTime, Utc};
use flowbeta_types::{Interval, Quote, SignalRow, Trade};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::flow::{TICK_SIZE_DEFAULT, order_flow_events};

/// How buckets without any event are represented in resampled output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridFill {
    /// Empty buckets are omitted.
    #[default]
    Sparse,
    /// Every bucket between the first and last observed one is emitted.
    Dense,
}

/// Parameters of interval-signal construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalParams {
    /// Bucket width.
    pub interval: Interval,
    /// Divisor applied to mid prices.
    pub tick_size: f64,
    /// Treatment of empty buckets.
    pub fill: GridFill,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            interval: Interval::SIGNAL_DEFAULT,
            tick_size: TICK_SIZE_DEFAULT,
            fill: GridFill::Sparse,
        }
    }
}

/// Accumulates event-level observations into fixed-width buckets.
///
/// Observations may arrive in any order; buckets are keyed by their start
/// and emitted in time order by [`finish`](Self::finish).
#[derive(Debug)]
pub struct Resampler {
    interval: Interval,
    buckets: BTreeMap<DateTime<Utc>, BucketBuilder>,
}

impl Resampler {
    /// Creates a resampler for the given bucket width.
    #[must_use]
    pub const fn new(interval: Interval) -> Self {
        Self {
            interval,
            buckets: BTreeMap::new(),
        }
    }

    /// Returns the bucket width.
    #[must_use]
    pub const fn interval(&self) -> Interval {
        self.interval
    }

    fn bucket(&mut self, timestamp: DateTime<Utc>) -> &mut BucketBuilder {
        let start = self.interval.bucket_start(timestamp);
        self.buckets.entry(start).or_default()
    }

    /// Records a mid-price observation.
    pub fn push_mid(&mut self, timestamp: DateTime<Utc>, mid: f64) {
        self.bucket(timestamp).update_mid(mid);
    }

    /// Adds a net order-flow contribution.
    pub fn push_ofi(&mut self, timestamp: DateTime<Utc>, value: f64) {
        self.bucket(timestamp).ofi += value;
    }

    /// Adds a signed traded amount.
    pub fn push_tfi(&mut self, timestamp: DateTime<Utc>, value: f64) {
        self.bucket(timestamp).tfi += value;
    }

    /// Records the mid price and order-flow contribution of every quote.
    pub fn extend_quotes(&mut self, quotes: &[Quote], tick_size: f64) {
        for (quote, event) in quotes.iter().zip(order_flow_events(quotes)) {
            let bucket = self.bucket(quote.timestamp);
            bucket.update_mid(quote.mid_price(tick_size));
            bucket.ofi += event;
        }
    }

    /// Records the signed amount of every trade.
    pub fn extend_trades(&mut self, trades: &[Trade]) {
        for trade in trades {
            self.push_tfi(trade.timestamp, trade.signed_amount());
        }
    }

    /// Returns the number of non-empty buckets so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Finishes resampling, returning one row per bucket in time order.
    #[must_use]
    pub fn finish(self, fill: GridFill) -> Vec<SignalRow> {
        let (Some(&first), Some(&last)) = (self.buckets.keys().next(), self.buckets.keys().next_back())
        else {
            return Vec::new();
        };

        match fill {
            GridFill::Sparse => self
                .buckets
                .into_iter()
                .map(|(start, builder)| builder.finish(start))
                .collect(),
            GridFill::Dense => {
                let mut buckets = self.buckets;
                self.interval
                    .steps(first, last)
                    .map(|start| {
                        buckets
                            .remove(&start)
                            .map_or_else(|| SignalRow::empty(start), |b| b.finish(start))
                    })
                    .collect()
            }
        }
    }
}

/// Builder for one bucket.
#[derive(Debug, Default)]
struct BucketBuilder {
    first_mid: Option<f64>,
    last_mid: f64,
    mid_count: usize,
    ofi: f64,
    tfi: f64,
}

impl BucketBuilder {
    fn update_mid(&mut self, mid: f64) {
        if self.first_mid.is_none() {
            self.first_mid = Some(mid);
        }
        self.last_mid = mid;
        self.mid_count += 1;
    }

    fn finish(self, timestamp: DateTime<Utc>) -> SignalRow {
        let delta_midprice = match self.first_mid {
            Some(first) if self.mid_count >= 2 => self.last_mid - first,
            _ => 0.0,
        };
        SignalRow::new(timestamp, delta_midprice, self.ofi, self.tfi)
    }
}

/// Builds the interval-signal table of one day's quotes and trades.
#[must_use]
pub fn resample(quotes: &[Quote], trades: &[Trade], params: &SignalParams) -> Vec<SignalRow> {
    let mut resampler = Resampler::new(params.interval);
    resampler.extend_quotes(quotes, params.tick_size);
    resampler.extend_trades(trades);
    resampler.finish(params.fill)
}

/// Lists bucket starts missing from a sparse interval-signal series between
/// its first and last row.
#[must_use]
pub fn grid_gaps(rows: &[SignalRow], interval: Interval) -> Vec<DateTime<Utc>> {
    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return Vec::new();
    };

    let mut present = rows.iter().map(|r| r.timestamp).peekable();
    interval
        .steps(first.timestamp, last.timestamp)
        .filter(|slot| {
            while present.next_if(|t| t < slot).is_some() {}
            present.next_if_eq(slot).is_none()
        })
        .collect()
}
