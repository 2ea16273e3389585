//! JSON output format.

use flowbeta_types::{DepthPoint, ReportRow, SignalRow};
use serde::Serialize;
use std::io::Write;

use crate::{FormatError, Formatter};

/// JSON output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// JSON array (standard JSON).
    #[default]
    Array,
    /// Newline-delimited JSON (NDJSON/JSONL).
    Ndjson,
}

/// JSON formatter.
///
/// Timestamps are RFC 3339 strings; NaN values become `null`.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    /// Output style.
    style: JsonStyle,
    /// Whether to pretty-print (only for array style).
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter with default settings (array style).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: JsonStyle::Array,
            pretty: false,
        }
    }

    /// Creates a new NDJSON formatter.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self {
            style: JsonStyle::Ndjson,
            pretty: false,
        }
    }

    /// Sets whether to pretty-print output (array style only).
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets the output style.
    #[must_use]
    pub const fn with_style(mut self, style: JsonStyle) -> Self {
        self.style = style;
        self
    }

    fn write_records<T: Serialize, W: Write>(
        &self,
        records: &[T],
        mut writer: W,
    ) -> Result<(), FormatError> {
        match self.style {
            JsonStyle::Array => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut writer, records)?;
                } else {
                    serde_json::to_writer(&mut writer, records)?;
                }
                writeln!(writer)?;
            }
            JsonStyle::Ndjson => {
                for record in records {
                    serde_json::to_writer(&mut writer, record)?;
                    writeln!(writer)?;
                }
            }
        }
        Ok(())
    }
}

impl Formatter for JsonFormatter {
    fn write_signals<W: Write + Send>(
        &self,
        rows: &[SignalRow],
        writer: W,
    ) -> Result<(), FormatError> {
        self.write_records(rows, writer)
    }

    fn write_depth<W: Write + Send>(
        &self,
        points: &[DepthPoint],
        writer: W,
    ) -> Result<(), FormatError> {
        self.write_records(points, writer)
    }

    fn write_report<W: Write + Send>(
        &self,
        rows: &[ReportRow],
        writer: W,
    ) -> Result<(), FormatError> {
        self.write_records(rows, writer)
    }

    fn extension(&self) -> &str {
        match self.style {
            JsonStyle::Array => "json",
            JsonStyle::Ndjson => "ndjson",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::io::Cursor;

    fn create_test_row() -> SignalRow {
        let timestamp = Utc.with_ymd_and_hms(2020, 11, 15, 12, 30, 40).unwrap();
        SignalRow::new(timestamp, 2.0, 35.5, -1.25)
    }

    #[test]
    fn test_json_array() {
        let formatter = JsonFormatter::new();
        let rows = vec![create_test_row()];
        let mut output = Cursor::new(Vec::new());

        formatter.write_signals(&rows, &mut output).unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert!(result.starts_with('['));
        assert!(result.contains("\"OFI\":35.5"));
        assert!(result.contains("\"TFI\":-1.25"));
    }

    #[test]
    fn test_ndjson() {
        let formatter = JsonFormatter::ndjson();
        let rows = vec![create_test_row(), create_test_row()];
        let mut output = Cursor::new(Vec::new());

        formatter.write_signals(&rows, &mut output).unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        let lines: Vec<_> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('{'));
        assert_eq!(formatter.extension(), "ndjson");
    }

    #[test]
    fn test_nan_depth_is_null() {
        let timestamp = Utc.with_ymd_and_hms(2020, 11, 15, 0, 0, 0).unwrap();
        let formatter = JsonFormatter::ndjson();
        let mut output = Cursor::new(Vec::new());

        formatter
            .write_depth(&[DepthPoint::new(timestamp, f64::NAN)], &mut output)
            .unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert!(result.contains("\"avg_depth\":null"));
    }

    #[test]
    fn test_pretty_json() {
        let timestamp = Utc.with_ymd_and_hms(2020, 11, 15, 0, 0, 0).unwrap();
        let formatter = JsonFormatter::new().with_pretty(true);
        let mut output = Cursor::new(Vec::new());

        formatter
            .write_report(&[ReportRow::new(timestamp, 0.1, 20.0)], &mut output)
            .unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert!(result.contains('\n'));
        assert!(result.contains("  \"beta_coef\""));
    }
}
