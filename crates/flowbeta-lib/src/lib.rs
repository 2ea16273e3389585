//! Order-flow imbalance, price-impact beta and market-depth analysis of
//! crypto tick data.
//!
//! This is a facade crate that re-exports functionality from the flowbeta
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```
//! use chrono::{NaiveDate, TimeDelta, TimeZone, Utc};
//! use flowbeta_lib::prelude::*;
//!
//! let date = NaiveDate::from_ymd_opt(2020, 11, 15).unwrap();
//! let t0 = Utc.with_ymd_and_hms(2020, 11, 15, 0, 0, 0).unwrap();
//! let quotes = vec![
//!     Quote::new(t0, 1.0, 100.02, 100.00, 2.0),
//!     Quote::new(t0 + TimeDelta::seconds(3), 1.0, 100.03, 100.01, 3.0),
//! ];
//! let source = MemoryTickSource::new().with_day(date, quotes, Vec::new());
//!
//! let signals = assemble_signals(&source, DateRange::single_day(date), SignalParams::default());
//! assert_eq!(signals.len(), 1);
//! // bid up by one tick adds 3, ask up by one tick removes 1
//! assert_eq!(signals[0].ofi, 2.0);
//! ```

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/flowbeta/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use flowbeta_types::*;

// Re-export tick loading
pub use flowbeta_load::{
    FileTickSource, LoadError, MemoryTickSource, ParseError, SourceConfig, TickSource,
    read_depth_file, read_signals_file,
};

// Re-export signal construction
pub use flowbeta_signal::{
    DayBatch, DayBatches, DepthParams, FailureKind, GridFill, Resampler, SignalParams,
    assemble_depth, assemble_signals, depth_days, depth_series, grid_gaps, resample, signal_days,
};

// Re-export regression
pub use flowbeta_regress::{
    CovarianceType, HAC_MAXLAGS_DEFAULT, ModelSpec, OlsFit, RegressionParams, Variable, WindowFit,
    WindowPolicy, WindowedRegression, extract_betas,
};

// Re-export reporting
pub use flowbeta_report::{
    ReportError, ReportParams, SeasonalityProfile, align, finished_report, render_svg, restrict,
    write_svg,
};

// Re-export formatters
#[cfg(feature = "format")]
pub use flowbeta_format::{CsvFormatter, FormatError, Formatter, JsonFormatter, OutputFormat};

#[cfg(all(feature = "format", feature = "parquet"))]
pub use flowbeta_format::ParquetFormatter;

/// Prelude module for convenient imports.
///
/// ```
/// use flowbeta_lib::prelude::*;
/// ```
pub mod prelude {
    pub use flowbeta_types::{
        BetaPoint, DateRange, DepthPoint, FlowError, Interval, Quote, ReportRow, Result, Side,
        SignalRow, Trade,
    };

    pub use flowbeta_load::{FileTickSource, MemoryTickSource, SourceConfig, TickSource};

    pub use flowbeta_signal::{
        DepthParams, GridFill, SignalParams, assemble_depth, assemble_signals, depth_days,
        signal_days,
    };

    pub use flowbeta_regress::{
        CovarianceType, ModelSpec, RegressionParams, Variable, WindowPolicy, WindowedRegression,
        extract_betas,
    };

    pub use flowbeta_report::{ReportParams, SeasonalityProfile, finished_report};

    #[cfg(feature = "format")]
    pub use flowbeta_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat};

    #[cfg(all(feature = "format", feature = "parquet"))]
    pub use flowbeta_format::ParquetFormatter;
}
