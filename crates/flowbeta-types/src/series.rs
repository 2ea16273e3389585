//! Derived per-interval series.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp layout of written series, also used for range restriction.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One fixed-interval bucket of derived signals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalRow {
    /// Bucket start.
    pub timestamp: DateTime<Utc>,
    /// Last minus first tick-normalized mid price in the bucket, or 0 with
    /// fewer than two mid-price observations.
    pub delta_midprice: f64,
    /// Sum of net order-flow events in the bucket.
    #[serde(rename = "OFI")]
    pub ofi: f64,
    /// Sum of signed traded amounts in the bucket.
    #[serde(rename = "TFI")]
    pub tfi: f64,
}

impl SignalRow {
    /// Creates a new signal row.
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, delta_midprice: f64, ofi: f64, tfi: f64) -> Self {
        Self {
            timestamp,
            delta_midprice,
            ofi,
            tfi,
        }
    }

    /// Creates an all-zero row for a bucket with no events.
    #[must_use]
    pub const fn empty(timestamp: DateTime<Utc>) -> Self {
        Self::new(timestamp, 0.0, 0.0, 0.0)
    }
}

/// Average order-book depth over one coarse window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthPoint {
    /// Window start.
    pub timestamp: DateTime<Utc>,
    /// Average depth; NaN when the window saw no inside price change.
    pub avg_depth: f64,
}

impl DepthPoint {
    /// Creates a new depth point.
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, avg_depth: f64) -> Self {
        Self {
            timestamp,
            avg_depth,
        }
    }
}

/// OFI slope of one regression window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaPoint {
    /// Window start.
    pub timestamp: DateTime<Utc>,
    /// Slope coefficient of the flow-imbalance predictor.
    pub beta: f64,
}

impl BetaPoint {
    /// Creates a new beta point.
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, beta: f64) -> Self {
        Self { timestamp, beta }
    }
}

/// One row of the aligned beta/depth report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Grid timestamp.
    pub timestamp: DateTime<Utc>,
    /// Beta of the window starting at `timestamp`.
    pub beta_coef: f64,
    /// Average depth of the window starting at `timestamp`.
    pub avg_depth: f64,
}

impl ReportRow {
    /// Creates a new report row.
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, beta_coef: f64, avg_depth: f64) -> Self {
        Self {
            timestamp,
            beta_coef,
            avg_depth,
        }
    }
}
