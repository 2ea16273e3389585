//! Signals command implementation.
//!
//! This module builds the interval-signal table of a date range from the
//! daily quote and trade files and writes it to the selected format.

use crate::config::PipelineConfig;
use crate::display::{Format, day_progress, write_signals};
use anyhow::{Context, Result};
use flowbeta_lib::prelude::*;
use flowbeta_lib::grid_gaps;
use std::path::PathBuf;
use tracing::warn;

/// Build and write the interval signals of `[start, end]`.
pub(crate) fn signals(
    config: &PipelineConfig,
    start: &str,
    end: &str,
    output: Option<PathBuf>,
    format: Format,
    quiet: bool,
) -> Result<()> {
    let range = DateRange::parse(start, end).context("Invalid date range")?;
    let output = format.output_path(output, "signals");
    let source = FileTickSource::new(config.source.clone());
    let params = config.signal;

    let progress = day_progress(range.total_days(), &format!("signals {start} -> {end}"), quiet)?;

    // Days that fail are logged by the assembler and left out
    let mut rows: Vec<SignalRow> = Vec::new();
    let mut skipped_days = 0u64;
    for batch in signal_days(&source, range, params) {
        if batch.had_error() {
            skipped_days += 1;
        }
        rows.extend(batch.rows);
        progress.inc(1);
    }

    let finish_msg = if skipped_days > 0 {
        format!("Built {} rows ({skipped_days} days skipped due to errors)", rows.len())
    } else {
        format!("Built {} rows", rows.len())
    };
    progress.finish_with_message(finish_msg);

    if params.fill == GridFill::Sparse {
        let gaps = grid_gaps(&rows, params.interval);
        if !gaps.is_empty() {
            warn!(gaps = gaps.len(), first = %gaps[0], "interval signals have empty buckets");
        }
    }

    write_signals(&rows, &output, format)?;

    if !quiet {
        println!("Output written to: {}", output.display());
    }

    Ok(())
}
