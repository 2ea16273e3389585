//! CSV output format.

use flowbeta_types::{DepthPoint, ReportRow, SignalRow};
use std::io::Write;

use crate::{FormatError, Formatter, TIMESTAMP_FORMAT};

/// CSV formatter.
///
/// Timestamps are written as `YYYY-MM-DD HH:MM:SS` and missing values as
/// `NaN`, which is what the precomputed-file readers expect.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: char,
    /// Whether to include header row.
    include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self::new().with_delimiter('\t')
    }
}

impl Formatter for CsvFormatter {
    fn write_signals<W: Write + Send>(
        &self,
        rows: &[SignalRow],
        mut writer: W,
    ) -> Result<(), FormatError> {
        let d = self.delimiter;

        if self.include_header {
            writeln!(writer, "timestamp{d}delta_midprice{d}OFI{d}TFI")?;
        }

        for row in rows {
            writeln!(
                writer,
                "{}{d}{}{d}{}{d}{}",
                row.timestamp.format(TIMESTAMP_FORMAT),
                row.delta_midprice,
                row.ofi,
                row.tfi
            )?;
        }

        Ok(())
    }

    fn write_depth<W: Write + Send>(
        &self,
        points: &[DepthPoint],
        mut writer: W,
    ) -> Result<(), FormatError> {
        let d = self.delimiter;

        if self.include_header {
            writeln!(writer, "timestamp{d}avg_depth")?;
        }

        for point in points {
            writeln!(
                writer,
                "{}{d}{}",
                point.timestamp.format(TIMESTAMP_FORMAT),
                point.avg_depth
            )?;
        }

        Ok(())
    }

    fn write_report<W: Write + Send>(
        &self,
        rows: &[ReportRow],
        mut writer: W,
    ) -> Result<(), FormatError> {
        let d = self.delimiter;

        if self.include_header {
            writeln!(writer, "timestamp{d}beta_coef{d}avg_depth")?;
        }

        for row in rows {
            writeln!(
                writer,
                "{}{d}{}{d}{}",
                row.timestamp.format(TIMESTAMP_FORMAT),
                row.beta_coef,
                row.avg_depth
            )?;
        }

        Ok(())
    }

    fn extension(&self) -> &str {
        if self.delimiter == '\t' { "tsv" } else { "csv" }
    }
}
