//! Depth command implementation.

use crate::config::PipelineConfig;
use crate::display::{Format, day_progress, write_depth};
use anyhow::{Context, Result};
use flowbeta_lib::prelude::*;
use std::path::PathBuf;

/// Build and write the depth series of `[start, end]`.
pub(crate) fn depth(
    config: &PipelineConfig,
    start: &str,
    end: &str,
    output: Option<PathBuf>,
    format: Format,
    quiet: bool,
) -> Result<()> {
    let range = DateRange::parse(start, end).context("Invalid date range")?;
    let output = format.output_path(output, "depth");
    let source = FileTickSource::new(config.source.clone());

    let progress = day_progress(range.total_days(), &format!("depth {start} -> {end}"), quiet)?;

    let mut points: Vec<DepthPoint> = Vec::new();
    let mut skipped_days = 0u64;
    for batch in depth_days(&source, range, config.depth) {
        if batch.had_error() {
            skipped_days += 1;
        }
        points.extend(batch.rows);
        progress.inc(1);
    }

    let finish_msg = if skipped_days > 0 {
        format!("Built {} windows ({skipped_days} days skipped due to errors)", points.len())
    } else {
        format!("Built {} windows", points.len())
    };
    progress.finish_with_message(finish_msg);

    write_depth(&points, &output, format)?;

    if !quiet {
        println!("Output written to: {}", output.display());
    }

    Ok(())
}
