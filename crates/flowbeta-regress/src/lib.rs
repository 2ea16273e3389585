//! Windowed regression of price change on order flow for flowbeta.
//!
//! - [`ModelSpec`] - Response, predictors and intercept of a linear model
//! - [`OlsFit`] - Least squares fit with nonrobust, HC0 or HAC covariance
//! - [`WindowedRegression`] - One fit per coarse time window
//! - [`extract_betas`] - Slope series of a named predictor

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/flowbeta/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod beta;
mod model;
mod ols;
mod window;

pub use beta::extract_betas;
pub use model::{INTERCEPT, ModelParseError, ModelSpec, Variable};
pub use ols::{CovarianceType, HAC_MAXLAGS_DEFAULT, OlsFit};
pub use window::{RegressionParams, WindowFit, WindowPolicy, WindowedRegression};
