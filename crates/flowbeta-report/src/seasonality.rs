//! Intraday half-hour profiles of normalized beta and depth.

use flowbeta_types::ReportRow;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;

use crate::ReportError;

/// Number of half-hour slots in a day.
pub const HALF_HOURS: usize = 48;

/// Returns the 48 half-hour labels of a day, `"00:00"` through `"23:30"`.
#[must_use]
pub fn half_hour_labels() -> Vec<String> {
    (0..24)
        .flat_map(|hour| [format!("{hour:02}:00"), format!("{hour:02}:30")])
        .collect()
}

/// Running mean that ignores NaN.
#[derive(Debug, Clone, Copy, Default)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: f64) {
        if !value.is_nan() {
            self.sum += value;
            self.count += 1;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn value(self) -> f64 {
        if self.count == 0 { f64::NAN } else { self.sum / self.count as f64 }
    }
}

/// One labelled row of a profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileRow {
    /// Time-of-day label.
    pub time: String,
    /// Normalized mean beta.
    pub beta: f64,
    /// Normalized mean depth.
    pub depth: f64,
}

/// Per-label means of beta and depth, each divided by its global mean.
///
/// Labels without any observation carry NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalityProfile {
    labels: Vec<String>,
    beta: Vec<f64>,
    depth: Vec<f64>,
}

impl SeasonalityProfile {
    /// Builds the profile of an aligned report.
    ///
    /// Rows are grouped by their `HH:MM` time of day. Global means run over
    /// every row of the report; rows off the half-hour grid count toward the
    /// global means only.
    #[must_use]
    pub fn from_report(rows: &[ReportRow]) -> Self {
        let labels = half_hour_labels();
        let index: HashMap<&str, usize> =
            labels.iter().enumerate().map(|(i, l)| (l.as_str(), i)).collect();

        let mut beta_means = vec![Mean::default(); labels.len()];
        let mut depth_means = vec![Mean::default(); labels.len()];
        let mut beta_global = Mean::default();
        let mut depth_global = Mean::default();

        for row in rows {
            beta_global.push(row.beta_coef);
            depth_global.push(row.avg_depth);

            let label = row.timestamp.format("%H:%M").to_string();
            if let Some(&i) = index.get(label.as_str()) {
                beta_means[i].push(row.beta_coef);
                depth_means[i].push(row.avg_depth);
            }
        }

        let beta_global = beta_global.value();
        let depth_global = depth_global.value();

        Self {
            beta: beta_means.into_iter().map(|m| m.value() / beta_global).collect(),
            depth: depth_means.into_iter().map(|m| m.value() / depth_global).collect(),
            labels,
        }
    }

    /// Returns the time-of-day labels.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the normalized beta profile.
    #[must_use]
    pub fn beta(&self) -> &[f64] {
        &self.beta
    }

    /// Returns the normalized depth profile.
    #[must_use]
    pub fn depth(&self) -> &[f64] {
        &self.depth
    }

    /// Returns the labelled rows of the profile.
    pub fn rows(&self) -> impl Iterator<Item = ProfileRow> + '_ {
        self.labels
            .iter()
            .zip(&self.beta)
            .zip(&self.depth)
            .map(|((time, &beta), &depth)| ProfileRow {
                time: time.clone(),
                beta,
                depth,
            })
    }

    /// Writes the profile as CSV with columns `time, beta, depth`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ReportError> {
        let mut csv = csv::Writer::from_writer(writer);
        for row in self.rows() {
            csv.serialize(row)?;
        }
        csv.flush()?;
        Ok(())
    }
}
