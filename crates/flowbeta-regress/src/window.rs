//! Per-window regression over an interval-signal series.

use chrono::{DateTime, Utc};
use flowbeta_types::{FlowError, Interval, Result, SignalRow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::{CovarianceType, ModelSpec, OlsFit};

/// What to do with a window that has fewer rows than model parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPolicy {
    /// Fail the whole pass.
    #[default]
    Abort,
    /// Leave the window out.
    Skip,
    /// Keep the window with no fit; its beta is NaN.
    FillNan,
}

/// Parameters of the windowed regression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegressionParams {
    /// Window width.
    pub window: Interval,
    /// Model fitted in every window.
    pub model: ModelSpec,
    /// Covariance estimator.
    pub covariance: CovarianceType,
    /// Handling of under-populated windows.
    pub policy: WindowPolicy,
}

impl Default for RegressionParams {
    fn default() -> Self {
        Self {
            window: Interval::WINDOW_DEFAULT,
            model: ModelSpec::default(),
            covariance: CovarianceType::default(),
            policy: WindowPolicy::Abort,
        }
    }
}

/// Fit result of one window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowFit {
    /// Window start.
    pub start: DateTime<Utc>,
    /// The fit, or `None` for a window kept under [`WindowPolicy::FillNan`].
    pub fit: Option<OlsFit>,
}

/// Windowed regression engine.
#[derive(Debug, Clone, Default)]
pub struct WindowedRegression {
    params: RegressionParams,
}

impl WindowedRegression {
    /// Creates an engine with the given parameters.
    #[must_use]
    pub const fn new(params: RegressionParams) -> Self {
        Self { params }
    }

    /// Returns the parameters.
    #[must_use]
    pub const fn params(&self) -> &RegressionParams {
        &self.params
    }

    /// Fits the model in every window from the first to the last observed
    /// one, in window order.
    ///
    /// Windows without rows count as under-populated.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InsufficientWindowData`] for the first
    /// under-populated window under [`WindowPolicy::Abort`], and any
    /// numerical failure of a fit.
    pub fn fit(&self, rows: &[SignalRow]) -> Result<Vec<WindowFit>> {
        let window = self.params.window;
        let mut groups: BTreeMap<DateTime<Utc>, Vec<SignalRow>> = BTreeMap::new();
        for row in rows {
            groups.entry(window.bucket_start(row.timestamp)).or_default().push(*row);
        }

        let (Some(&first), Some(&last)) = (groups.keys().next(), groups.keys().next_back()) else {
            return Ok(Vec::new());
        };

        let model = &self.params.model;
        let names = model.param_names();
        let n_params = model.n_params();
        let mut fits = Vec::new();

        for start in window.steps(first, last) {
            let slice = groups.get(&start).map_or(&[][..], Vec::as_slice);

            if slice.len() < n_params {
                let err = FlowError::InsufficientWindowData {
                    window: start,
                    rows: slice.len(),
                    params: n_params,
                };
                match self.params.policy {
                    WindowPolicy::Abort => return Err(err),
                    WindowPolicy::Skip => {
                        warn!(%start, rows = slice.len(), "skipping window: {err}");
                    }
                    WindowPolicy::FillNan => {
                        warn!(%start, rows = slice.len(), "no fit for window: {err}");
                        fits.push(WindowFit { start, fit: None });
                    }
                }
                continue;
            }

            let (x, y) = model.design(slice);
            let fit = OlsFit::fit(
                &x,
                &y,
                names.clone(),
                model.intercept,
                self.params.covariance,
            )?;
            debug!(%start, nobs = fit.nobs(), rsquared = fit.rsquared(), "fitted window");
            fits.push(WindowFit {
                start,
                fit: Some(fit),
            });
        }

        Ok(fits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{TimeDelta, TimeZone};

    fn at(minute: i64, second: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 11, 15, 0, 0, 0).unwrap()
            + TimeDelta::minutes(minute)
            + TimeDelta::seconds(second)
    }

    fn linear_rows(minute: i64, slope: f64, count: i64) -> Vec<SignalRow> {
        (0..count)
            .map(|i| {
                let ofi = (i % 7) as f64 - 3.0;
                SignalRow::new(at(minute, i * 10), 0.25 + slope * ofi, ofi, 0.0)
            })
            .collect()
    }

    #[test]
    fn test_fit_per_window() {
        let mut rows = linear_rows(0, 0.5, 20);
        rows.extend(linear_rows(30, -1.5, 20));

        let fits = WindowedRegression::default().fit(&rows).unwrap();
        assert_eq!(fits.len(), 2);
        assert_eq!(fits[0].start, at(0, 0));
        assert_eq!(fits[1].start, at(30, 0));

        let beta = fits[1].fit.as_ref().unwrap().param("OFI").unwrap();
        assert_relative_eq!(beta, -1.5, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_window_aborts_by_default() {
        let mut rows = linear_rows(0, 0.5, 20);
        rows.extend(linear_rows(60, 0.5, 20));

        let err = WindowedRegression::default().fit(&rows).unwrap_err();
        assert!(matches!(
            err,
            FlowError::InsufficientWindowData { rows: 0, params: 2, .. }
        ));
    }

    #[test]
    fn test_skip_and_fill_policies() {
        let mut rows = linear_rows(0, 0.5, 20);
        rows.extend(linear_rows(30, 0.5, 1));
        rows.extend(linear_rows(60, 0.5, 20));

        let skip = WindowedRegression::new(RegressionParams {
            policy: WindowPolicy::Skip,
            ..Default::default()
        });
        let fits = skip.fit(&rows).unwrap();
        assert_eq!(fits.len(), 2);
        assert_eq!(fits[1].start, at(60, 0));

        let fill = WindowedRegression::new(RegressionParams {
            policy: WindowPolicy::FillNan,
            ..Default::default()
        });
        let fits = fill.fit(&rows).unwrap();
        assert_eq!(fits.len(), 3);
        assert!(fits[1].fit.is_none());
    }

    #[test]
    fn test_empty_series() {
        assert!(WindowedRegression::default().fit(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_params_serde_defaults() {
        let params: RegressionParams = serde_json::from_str(r#"{"window":"1h"}"#).unwrap();
        assert_eq!(params.window, Interval::from_mins(60));
        assert_eq!(params.model, ModelSpec::ofi());
        assert_eq!(params.policy, WindowPolicy::Abort);
    }
}
