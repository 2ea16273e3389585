//! Apache Parquet output format.

use arrow::array::{ArrayRef, Float64Array, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Utc};
use flowbeta_types::{DepthPoint, ReportRow, SignalRow};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::io::Write;
use std::sync::Arc;

use crate::{FormatError, Formatter};

const SIGNAL_COLUMNS: [&str; 3] = ["delta_midprice", "OFI", "TFI"];
const DEPTH_COLUMNS: [&str; 1] = ["avg_depth"];
const REPORT_COLUMNS: [&str; 2] = ["beta_coef", "avg_depth"];

fn parquet_error(err: impl std::fmt::Display) -> FormatError {
    FormatError::Parquet(err.to_string())
}

/// Parquet formatter.
///
/// Every table has a UTC microsecond `timestamp` column followed by
/// non-nullable `Float64` value columns; NaN is stored as NaN.
#[derive(Debug, Clone)]
pub struct ParquetFormatter {
    /// Row group size (number of rows per group).
    row_group_size: usize,
    /// Compression codec.
    compression: Compression,
}

impl Default for ParquetFormatter {
    fn default() -> Self {
        Self {
            row_group_size: 100_000,
            compression: Compression::SNAPPY,
        }
    }
}

impl ParquetFormatter {
    /// Creates a new Parquet formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the row group size.
    #[must_use]
    pub const fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Sets the compression codec.
    #[must_use]
    pub const fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Creates a schema with a timestamp column and the given value columns.
    fn schema(columns: &[&str]) -> SchemaRef {
        let mut fields = vec![Field::new(
            "timestamp",
            DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
            false,
        )];
        fields.extend(
            columns
                .iter()
                .map(|name| Field::new(*name, DataType::Float64, false)),
        );
        Arc::new(Schema::new(fields))
    }

    fn batch(
        schema: &SchemaRef,
        timestamps: impl Iterator<Item = DateTime<Utc>>,
        values: Vec<Vec<f64>>,
    ) -> Result<RecordBatch, FormatError> {
        let micros: Vec<_> = timestamps.map(|t| t.timestamp_micros()).collect();
        let mut columns: Vec<ArrayRef> =
            vec![Arc::new(TimestampMicrosecondArray::from(micros).with_timezone("UTC"))];
        columns.extend(
            values
                .into_iter()
                .map(|v| Arc::new(Float64Array::from(v)) as ArrayRef),
        );
        RecordBatch::try_new(Arc::clone(schema), columns).map_err(parquet_error)
    }

    /// Writes `records` in row-group sized chunks; `to_batch` converts one
    /// chunk.
    fn write_table<T, W, F>(
        &self,
        schema: &SchemaRef,
        records: &[T],
        writer: W,
        to_batch: F,
    ) -> Result<(), FormatError>
    where
        W: Write + Send,
        F: Fn(&[T]) -> Result<RecordBatch, FormatError>,
    {
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut arrow_writer =
            ArrowWriter::try_new(writer, Arc::clone(schema), Some(props)).map_err(parquet_error)?;

        for chunk in records.chunks(self.row_group_size.max(1)) {
            let batch = to_batch(chunk)?;
            arrow_writer.write(&batch).map_err(parquet_error)?;
        }

        arrow_writer.close().map_err(parquet_error)?;
        Ok(())
    }
}

impl Formatter for ParquetFormatter {
    fn write_signals<W: Write + Send>(
        &self,
        rows: &[SignalRow],
        writer: W,
    ) -> Result<(), FormatError> {
        let schema = Self::schema(&SIGNAL_COLUMNS);
        self.write_table(&schema, rows, writer, |chunk| {
            Self::batch(
                &schema,
                chunk.iter().map(|r| r.timestamp),
                vec![
                    chunk.iter().map(|r| r.delta_midprice).collect::<Vec<_>>(),
                    chunk.iter().map(|r| r.ofi).collect::<Vec<_>>(),
                    chunk.iter().map(|r| r.tfi).collect::<Vec<_>>(),
                ],
            )
        })
    }

    fn write_depth<W: Write + Send>(
        &self,
        points: &[DepthPoint],
        writer: W,
    ) -> Result<(), FormatError> {
        let schema = Self::schema(&DEPTH_COLUMNS);
        self.write_table(&schema, points, writer, |chunk| {
            Self::batch(
                &schema,
                chunk.iter().map(|p| p.timestamp),
                vec![chunk.iter().map(|p| p.avg_depth).collect::<Vec<_>>()],
            )
        })
    }

    fn write_report<W: Write + Send>(
        &self,
        rows: &[ReportRow],
        writer: W,
    ) -> Result<(), FormatError> {
        let schema = Self::schema(&REPORT_COLUMNS);
        self.write_table(&schema, rows, writer, |chunk| {
            Self::batch(
                &schema,
                chunk.iter().map(|r| r.timestamp),
                vec![
                    chunk.iter().map(|r| r.beta_coef).collect::<Vec<_>>(),
                    chunk.iter().map(|r| r.avg_depth).collect::<Vec<_>>(),
                ],
            )
        })
    }

    fn extension(&self) -> &str {
        "parquet"
    }
}
