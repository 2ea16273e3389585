//! Output formatters for flowbeta series.
//!
//! This crate writes interval signals, depth series and aligned reports
//! to various output formats:
//!
//! - [`CsvFormatter`] - CSV format, readable back by `flowbeta-load`
//! - [`JsonFormatter`] - JSON array or NDJSON format
//! - [`ParquetFormatter`] - Apache Parquet columnar format

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/flowbeta/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod json;

#[cfg(feature = "parquet")]
mod parquet;

pub use crate::csv::CsvFormatter;
pub use formatter::{FormatError, Formatter, OutputFormat, TIMESTAMP_FORMAT};
pub use json::{JsonFormatter, JsonStyle};

#[cfg(feature = "parquet")]
pub use crate::parquet::ParquetFormatter;
