//! Order-flow signal construction for flowbeta.
//!
//! This crate turns daily quote and trade tables into research series:
//!
//! - [`order_flow_events`] / [`signed_amounts`] - Event-level OFI and TFI
//! - [`Resampler`] - Fixed-interval bucketing of event-level signals
//! - [`average_depth`] / [`depth_series`] - Price-change conditioned depth
//! - [`assemble_signals`] / [`assemble_depth`] - Multi-day assembly with
//!   per-day fault isolation

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/flowbeta/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregator;
mod assemble;
mod depth;
mod flow;

pub use aggregator::{GridFill, Resampler, SignalParams, grid_gaps, resample};
pub use assemble::{
    DayBatch, DayBatches, FailureKind, assemble_depth, assemble_signals, construct_day, depth_day,
    depth_days, flatten_days, signal_days,
};
pub use depth::{DepthParams, average_depth, depth_series};
pub use flow::{TICK_SIZE_DEFAULT, mid_prices, order_flow_event, order_flow_events, signed_amounts};
