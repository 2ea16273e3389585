//! Display utilities and output formatting for the flowbeta CLI.

use anyhow::{Context, Result};
use clap::ValueEnum;
use flowbeta_lib::prelude::*;
use flowbeta_lib::HAC_MAXLAGS_DEFAULT;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Output format for written series.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Tsv,
    Json,
    Ndjson,
    Parquet,
}

impl Format {
    /// Returns the file extension for this format.
    pub(crate) const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
            Self::Parquet => "parquet",
        }
    }

    /// Returns `output`, or `<stem>.<extension>` without one.
    pub(crate) fn output_path(&self, output: Option<PathBuf>, stem: &str) -> PathBuf {
        output.unwrap_or_else(|| PathBuf::from(format!("{stem}.{}", self.extension())))
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Covariance estimator choice.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum CovarianceArg {
    Nonrobust,
    Hc0,
    Hac,
}

/// Window policy choice.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum PolicyArg {
    Abort,
    Skip,
    FillNan,
}

impl From<PolicyArg> for WindowPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Abort => Self::Abort,
            PolicyArg::Skip => Self::Skip,
            PolicyArg::FillNan => Self::FillNan,
        }
    }
}

/// Resolves the covariance estimator from the flags and the configured one.
///
/// Without flags the configured estimator is kept. `--maxlags` alone selects
/// HAC; a configured HAC lag count survives `--covariance hac` without
/// `--maxlags`.
pub(crate) const fn covariance(
    arg: Option<CovarianceArg>,
    maxlags: Option<usize>,
    configured: CovarianceType,
) -> CovarianceType {
    let configured_lags = match configured {
        CovarianceType::Hac { maxlags } => maxlags,
        _ => HAC_MAXLAGS_DEFAULT,
    };
    let lags = match maxlags {
        Some(lags) => lags,
        None => configured_lags,
    };

    match (arg, maxlags) {
        (Some(CovarianceArg::Nonrobust), _) => CovarianceType::NonRobust,
        (Some(CovarianceArg::Hc0), _) => CovarianceType::Hc0,
        (Some(CovarianceArg::Hac), _) | (None, Some(_)) => CovarianceType::Hac { maxlags: lags },
        (None, None) => configured,
    }
}

/// Creates a per-day progress bar, hidden in quiet mode.
pub(crate) fn day_progress(days: usize, label: &str, quiet: bool) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(days as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} days ({percent}%) {msg}")
            .context("Invalid progress template")?
            .progress_chars("=>-"),
    );
    pb.set_message(label.to_string());
    Ok(pb)
}

fn create(output: &Path) -> Result<BufWriter<File>> {
    let file = File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    Ok(BufWriter::new(file))
}

/// Dispatches one write to the formatter selected by `format`.
macro_rules! write_with {
    ($format:expr, $method:ident, $records:expr, $writer:expr) => {
        match $format {
            Format::Csv => CsvFormatter::new().$method($records, $writer)?,
            Format::Tsv => CsvFormatter::tsv().$method($records, $writer)?,
            Format::Json => JsonFormatter::new().$method($records, $writer)?,
            Format::Ndjson => JsonFormatter::ndjson().$method($records, $writer)?,
            Format::Parquet => {
                #[cfg(feature = "parquet")]
                {
                    ParquetFormatter::new().$method($records, $writer)?;
                }
                #[cfg(not(feature = "parquet"))]
                {
                    anyhow::bail!("Parquet support not compiled in");
                }
            }
        }
    };
}

/// Write an interval-signal table to a file in the specified format.
pub(crate) fn write_signals(rows: &[SignalRow], output: &Path, format: Format) -> Result<()> {
    let writer = create(output)?;
    write_with!(format, write_signals, rows, writer);
    Ok(())
}

/// Write a depth series to a file in the specified format.
pub(crate) fn write_depth(points: &[DepthPoint], output: &Path, format: Format) -> Result<()> {
    let writer = create(output)?;
    write_with!(format, write_depth, points, writer);
    Ok(())
}

/// Write an aligned report to a file in the specified format.
pub(crate) fn write_report(rows: &[ReportRow], output: &Path, format: Format) -> Result<()> {
    let writer = create(output)?;
    write_with!(format, write_report, rows, writer);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covariance_resolution() {
        let hac = CovarianceType::Hac { maxlags: 4 };
        assert_eq!(covariance(None, Some(8), hac), CovarianceType::Hac { maxlags: 8 });
        assert_eq!(
            covariance(Some(CovarianceArg::Hac), None, CovarianceType::Hac { maxlags: 2 }),
            CovarianceType::Hac { maxlags: 2 }
        );
        assert_eq!(
            covariance(Some(CovarianceArg::Hac), None, CovarianceType::Hc0),
            CovarianceType::Hac { maxlags: HAC_MAXLAGS_DEFAULT }
        );
        assert_eq!(covariance(Some(CovarianceArg::Hc0), Some(8), hac), CovarianceType::Hc0);
        assert_eq!(covariance(None, None, CovarianceType::Hc0), CovarianceType::Hc0);
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(Format::Ndjson.output_path(None, "depth"), PathBuf::from("depth.ndjson"));
        let explicit = PathBuf::from("out/s.csv");
        assert_eq!(Format::Csv.output_path(Some(explicit.clone()), "signals"), explicit);
    }

    #[test]
    fn test_write_report_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        write_report(&[], &path, Format::Csv).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(text, "timestamp,beta_coef,avg_depth\n");
    }

    #[test]
    fn test_write_depth_tsv() {
        let dir = tempfile::tempdir().unwrap();
        let path = Format::Tsv.output_path(Some(dir.path().join("depth.tsv")), "depth");
        let ts = chrono::DateTime::from_timestamp(1_605_398_400, 0).unwrap();
        write_depth(&[DepthPoint::new(ts, 2.5)], &path, Format::Tsv).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(text, "timestamp\tavg_depth\n2020-11-15 00:00:00\t2.5\n");
    }
}
