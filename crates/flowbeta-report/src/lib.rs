//! Alignment and intraday seasonality reporting for flowbeta.
//!
//! - [`align`] / [`restrict`] / [`finished_report`] - Beta and depth joined
//!   on a shared timestamp grid
//! - [`SeasonalityProfile`] - Normalized half-hour-of-day means
//! - [`render_svg`] - Line chart of a profile

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/flowbeta/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod align;
mod chart;
mod error;
mod seasonality;

pub use align::{ReportParams, align, depth_grid, finished_report, format_timestamp, restrict};
pub use chart::{render_svg, write_svg};
pub use error::ReportError;
pub use seasonality::{HALF_HOURS, ProfileRow, SeasonalityProfile, half_hour_labels};
