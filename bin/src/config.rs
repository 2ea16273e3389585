//! JSON pipeline configuration.

use anyhow::{Context, Result};
use flowbeta_lib::{DepthParams, RegressionParams, ReportParams, SignalParams, SourceConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of every pipeline stage. Missing sections take their
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct PipelineConfig {
    pub(crate) source: SourceConfig,
    pub(crate) signal: SignalParams,
    pub(crate) depth: DepthParams,
    pub(crate) regression: RegressionParams,
    pub(crate) report: ReportParams,
}

impl PipelineConfig {
    /// Reads the configuration at `path`, or the defaults without one.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid config {}", path.display()))
    }
}
