//! Daily tick file loading for flowbeta order-flow and depth analysis.
//!
//! This crate provides the data loading path:
//!
//! - [`path::daily_path`] - Builds per-date file paths
//! - [`open_source`] - Opens plain or gzip-compressed files
//! - [`parse_quotes`] / [`parse_trades`] - CSV parsing of the quote and trade schemas
//! - [`TickSource`] - Per-date access to quotes and trades
//! - [`read_signals`] / [`read_depth`] - Precomputed signal and depth files

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/flowbeta/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod decompress;
mod parse;
pub mod path;
mod precomputed;
mod source;

pub use decompress::{LoadError, open_source};
pub use parse::{ParseError, parse_quotes, parse_trades};
pub use precomputed::{
    parse_timestamp, read_depth, read_depth_file, read_signals, read_signals_file,
};
pub use source::{FileTickSource, MemoryTickSource, SourceConfig, TickSource};
