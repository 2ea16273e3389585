//! Core types for flowbeta order-flow and depth analysis.
//!
//! This crate provides the fundamental data structures used throughout flowbeta:
//!
//! - [`Quote`] - Best bid/ask update from a daily quote file
//! - [`Trade`] - Executed trade from a daily trade file
//! - [`Interval`] - Fixed bucket width anchored at midnight
//! - [`DateRange`] - Inclusive range of calendar days
//! - [`SignalRow`], [`DepthPoint`], [`BetaPoint`], [`ReportRow`] - Derived series

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/flowbeta/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod date_range;
mod error;
mod interval;
mod series;
mod tick;

pub use date_range::{DATE_FORMAT, DateRange, DayIterator};
pub use error::{DateRangeError, FlowError, Result};
pub use interval::{Interval, IntervalParseError};
pub use series::{BetaPoint, DepthPoint, ReportRow, SignalRow, TIMESTAMP_FORMAT};
pub use tick::{Quote, Side, SideParseError, Trade, micros_to_datetime};
