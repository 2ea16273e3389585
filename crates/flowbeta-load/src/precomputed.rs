//! Readers for precomputed signal and depth tables.
//!
//! Both tables are timestamp-indexed CSV files whose first column holds the
//! index. Signal files carry `delta_midprice`, `OFI` and `TFI` columns
//! (matched by header name); depth files carry a single value column.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use flowbeta_types::{DATE_FORMAT, DepthPoint, SignalRow};
use std::io::Read;
use std::path::Path;

use crate::decompress::load_file;
use crate::{LoadError, ParseError};

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parses an index timestamp.
///
/// Accepts `YYYY-MM-DD HH:MM:SS[.f]`, the same with a `T` separator,
/// RFC 3339 with any offset, and a bare date (midnight). Naive values are
/// taken as UTC.
///
/// # Example
///
/// ```
/// use flowbeta_load::parse_timestamp;
///
/// let a = parse_timestamp("2020-11-15 09:30:00").unwrap();
/// let b = parse_timestamp("2020-11-15T09:30:00+00:00").unwrap();
/// assert_eq!(a, b);
/// ```
#[must_use]
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, ParseError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| ParseError::MissingColumn(name.to_string()))
}

fn field<'a>(record: &'a csv::StringRecord, index: usize, number: u64) -> Result<&'a str, ParseError> {
    record.get(index).ok_or_else(|| ParseError::Csv {
        record: number,
        message: format!("missing field {index}"),
    })
}

fn timestamp_field(record: &csv::StringRecord, number: u64) -> Result<DateTime<Utc>, ParseError> {
    let text = field(record, 0, number)?;
    parse_timestamp(text).ok_or_else(|| ParseError::InvalidTimestampText {
        record: number,
        value: text.to_string(),
    })
}

fn float_field(value: &str, column: &str, number: u64) -> Result<f64, ParseError> {
    value.parse::<f64>().map_err(|_| ParseError::InvalidValue {
        record: number,
        column: column.to_string(),
        value: value.to_string(),
    })
}

/// Reads a precomputed interval-signal table.
///
/// # Errors
///
/// Returns an error if a required column is missing or a record is
/// malformed.
pub fn read_signals<R: Read>(reader: R) -> Result<Vec<SignalRow>, ParseError> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = csv.headers().map_err(|e| ParseError::csv(0, &e))?.clone();

    let columns = ["delta_midprice", "OFI", "TFI"];
    let mut indices = [0_usize; 3];
    for (slot, name) in indices.iter_mut().zip(columns) {
        *slot = column_index(&headers, name)?;
    }

    let mut rows = Vec::new();
    for (i, result) in csv.records().enumerate() {
        let number = i as u64 + 1;
        let record = result.map_err(|e| ParseError::csv(number, &e))?;

        let timestamp = timestamp_field(&record, number)?;
        let mut values = [0.0_f64; 3];
        for ((value, &index), name) in values.iter_mut().zip(&indices).zip(columns) {
            *value = float_field(field(&record, index, number)?, name, number)?;
        }

        rows.push(SignalRow::new(timestamp, values[0], values[1], values[2]));
    }

    Ok(rows)
}

/// Reads a precomputed depth table.
///
/// The second column holds the depth value; empty fields and `NaN` read as
/// NaN.
///
/// # Errors
///
/// Returns an error if the table has fewer than two columns or a record is
/// malformed.
pub fn read_depth<R: Read>(reader: R) -> Result<Vec<DepthPoint>, ParseError> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = csv.headers().map_err(|e| ParseError::csv(0, &e))?.clone();
    let column = headers
        .get(1)
        .ok_or_else(|| ParseError::MissingColumn("depth value".to_string()))?
        .to_string();

    let mut points = Vec::new();
    for (i, result) in csv.records().enumerate() {
        let number = i as u64 + 1;
        let record = result.map_err(|e| ParseError::csv(number, &e))?;

        let timestamp = timestamp_field(&record, number)?;
        let text = field(&record, 1, number)?;
        let value = if text.is_empty() || text.eq_ignore_ascii_case("nan") {
            f64::NAN
        } else {
            float_field(text, &column, number)?
        };

        points.push(DepthPoint::new(timestamp, value));
    }

    Ok(points)
}

/// Reads a precomputed interval-signal file, gzip-aware.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable or malformed.
pub fn read_signals_file(path: &Path) -> Result<Vec<SignalRow>, LoadError> {
    load_file(path, read_signals)
}

/// Reads a precomputed depth file, gzip-aware.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable or malformed.
pub fn read_depth_file(path: &Path) -> Result<Vec<DepthPoint>, LoadError> {
    load_file(path, read_depth)
}
