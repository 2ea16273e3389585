//! Report command implementation.
//!
//! This module regresses the precomputed interval signals window by window,
//! aligns the betas with the precomputed depth series and writes the
//! restricted report, optionally with its seasonality chart and profile.

use crate::config::PipelineConfig;
use crate::display::{Format, write_report};
use anyhow::{Context, Result};
use flowbeta_lib::prelude::*;
use flowbeta_lib::{read_depth_file, read_signals_file, write_svg};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Precomputed inputs and the reported range.
pub(crate) struct ReportInputs {
    pub(crate) signals: PathBuf,
    pub(crate) depth: PathBuf,
    pub(crate) start: String,
    pub(crate) end: String,
}

/// Destinations of the report and its seasonality outputs.
pub(crate) struct ReportOutputs {
    pub(crate) output: Option<PathBuf>,
    pub(crate) format: Format,
    pub(crate) chart: Option<PathBuf>,
    pub(crate) profile: Option<PathBuf>,
}

impl ReportOutputs {
    fn profile_path(&self) -> Option<PathBuf> {
        self.profile
            .clone()
            .or_else(|| self.chart.as_ref().map(|chart| chart.with_extension("csv")))
    }
}

/// Build and write the aligned report.
pub(crate) fn report(
    config: &PipelineConfig,
    inputs: &ReportInputs,
    outputs: &ReportOutputs,
    quiet: bool,
) -> Result<()> {
    let signals = read_signals_file(&inputs.signals)
        .with_context(|| format!("Failed to read signals {}", inputs.signals.display()))?;
    let depth = read_depth_file(&inputs.depth)
        .with_context(|| format!("Failed to read depth {}", inputs.depth.display()))?;

    let Some(rows) = finished_report(
        &signals,
        &depth,
        &inputs.start,
        &inputs.end,
        &config.regression,
        &config.report,
    )
    .context("Failed to build report")?
    else {
        // Reversed range, already logged
        return Ok(());
    };

    let output = outputs.format.output_path(outputs.output.clone(), "report");
    write_report(&rows, &output, outputs.format)?;
    if !quiet {
        println!("Output written to: {}", output.display());
    }

    let Some(profile_path) = outputs.profile_path() else {
        return Ok(());
    };
    let profile = SeasonalityProfile::from_report(&rows);

    if let Some(chart) = &outputs.chart {
        write_svg(&profile, chart)
            .with_context(|| format!("Failed to render chart {}", chart.display()))?;
        if !quiet {
            println!("Chart written to: {}", chart.display());
        }
    }

    let file = File::create(&profile_path)
        .with_context(|| format!("Failed to create {}", profile_path.display()))?;
    profile.write_csv(BufWriter::new(file))?;
    if !quiet {
        println!("Profile written to: {}", profile_path.display());
    }

    Ok(())
}
