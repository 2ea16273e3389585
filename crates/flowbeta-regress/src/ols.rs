//! Ordinary least squares with robust covariance estimators.

use flowbeta_types::{FlowError, Result};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Relative cutoff below which singular values are treated as zero.
const RCOND: f64 = 1e-15;

/// Default lag count of the HAC estimator.
pub const HAC_MAXLAGS_DEFAULT: usize = 4;

/// Covariance estimator for fitted parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CovarianceType {
    /// Classical homoskedastic covariance, `s² (X'X)⁻¹`.
    NonRobust,
    /// White heteroskedasticity-consistent covariance.
    Hc0,
    /// Newey-West heteroskedasticity- and autocorrelation-consistent
    /// covariance with Bartlett weights.
    Hac {
        /// Number of autocorrelation lags accounted for.
        maxlags: usize,
    },
}

impl Default for CovarianceType {
    fn default() -> Self {
        Self::Hac {
            maxlags: HAC_MAXLAGS_DEFAULT,
        }
    }
}

impl std::fmt::Display for CovarianceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonRobust => f.write_str("nonrobust"),
            Self::Hc0 => f.write_str("HC0"),
            Self::Hac { maxlags } => write!(f, "HAC({maxlags})"),
        }
    }
}

/// Fitted linear model.
#[derive(Debug, Clone, PartialEq)]
pub struct OlsFit {
    names: Vec<String>,
    params: DVector<f64>,
    cov: DMatrix<f64>,
    nobs: usize,
    rank: usize,
    ssr: f64,
    rsquared: f64,
    cov_type: CovarianceType,
}

impl OlsFit {
    /// Fits `y = X b` by least squares.
    ///
    /// Parameters come from the SVD pseudo-inverse of `X`, so rank-deficient
    /// designs still yield point estimates. `names` labels the columns of
    /// `X`; `intercept` selects centered or uncentered R².
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Numeric`] if the decomposition fails.
    pub fn fit(
        x: &DMatrix<f64>,
        y: &DVector<f64>,
        names: Vec<String>,
        intercept: bool,
        cov_type: CovarianceType,
    ) -> Result<Self> {
        let nobs = x.nrows();
        let svd = x.clone().svd(true, true);
        let max_sv = svd.singular_values.max();
        let cutoff = RCOND * max_sv;
        let rank = svd.singular_values.iter().filter(|&&s| s > cutoff).count();

        let pinv = svd
            .pseudo_inverse(cutoff)
            .map_err(|e| FlowError::Numeric(e.to_string()))?;
        let params = &pinv * y;
        let resid = y - x * &params;
        let ssr = resid.norm_squared();

        let normalized_cov = &pinv * pinv.transpose();
        let cov = match cov_type {
            CovarianceType::NonRobust => {
                #[allow(clippy::cast_precision_loss)]
                let scale = ssr / nobs.saturating_sub(rank) as f64;
                normalized_cov * scale
            }
            CovarianceType::Hc0 => {
                let weighted = DMatrix::from_fn(pinv.nrows(), nobs, |i, j| {
                    pinv[(i, j)] * resid[j] * resid[j]
                });
                weighted * pinv.transpose()
            }
            CovarianceType::Hac { maxlags } => {
                let meat = hac_meat(x, &resid, maxlags);
                &normalized_cov * meat * &normalized_cov
            }
        };

        let tss = if intercept {
            let mean = y.mean();
            y.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        } else {
            y.norm_squared()
        };
        let rsquared = 1.0 - ssr / tss;

        Ok(Self {
            names,
            params,
            cov,
            nobs,
            rank,
            ssr,
            rsquared,
            cov_type,
        })
    }

    /// Returns the parameter names.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns the parameter estimates.
    #[must_use]
    pub fn params(&self) -> &[f64] {
        self.params.as_slice()
    }

    /// Returns the estimate of a named parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.params[i])
    }

    /// Returns the standard errors, the square roots of the covariance
    /// diagonal.
    #[must_use]
    pub fn bse(&self) -> Vec<f64> {
        self.cov.diagonal().iter().map(|v| v.sqrt()).collect()
    }

    /// Returns the parameter covariance matrix.
    #[must_use]
    pub const fn cov(&self) -> &DMatrix<f64> {
        &self.cov
    }

    /// Returns the number of observations.
    #[must_use]
    pub const fn nobs(&self) -> usize {
        self.nobs
    }

    /// Returns the numerical rank of the design.
    #[must_use]
    pub const fn rank(&self) -> usize {
        self.rank
    }

    /// Returns the sum of squared residuals.
    #[must_use]
    pub const fn ssr(&self) -> f64 {
        self.ssr
    }

    /// Returns the coefficient of determination.
    #[must_use]
    pub const fn rsquared(&self) -> f64 {
        self.rsquared
    }

    /// Returns the covariance estimator used.
    #[must_use]
    pub const fn covariance_type(&self) -> CovarianceType {
        self.cov_type
    }
}

/// Bartlett-weighted outer product of scores, `S = Σ w_l (Γ_l + Γ_lᵀ)`.
fn hac_meat(x: &DMatrix<f64>, resid: &DVector<f64>, maxlags: usize) -> DMatrix<f64> {
    let n = x.nrows();
    let k = x.ncols();
    let xu = DMatrix::from_fn(n, k, |i, j| x[(i, j)] * resid[i]);

    let mut meat = xu.transpose() * &xu;
    #[allow(clippy::cast_precision_loss)]
    let denom = (maxlags + 1) as f64;

    for lag in 1..=maxlags.min(n.saturating_sub(1)) {
        #[allow(clippy::cast_precision_loss)]
        let weight = 1.0 - lag as f64 / denom;
        let lead = xu.rows(lag, n - lag);
        let lagged = xu.rows(0, n - lag);
        let gamma = lead.transpose() * lagged;
        meat += (&gamma + gamma.transpose()) * weight;
    }

    meat
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn design(xs: &[f64]) -> DMatrix<f64> {
        DMatrix::from_fn(xs.len(), 2, |i, j| if j == 0 { 1.0 } else { xs[i] })
    }

    fn names() -> Vec<String> {
        vec!["Intercept".to_string(), "OFI".to_string()]
    }

    #[test]
    fn test_exact_line() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let y = DVector::from_iterator(4, xs.iter().map(|x| 2.0 + 0.5 * x));
        let fit = OlsFit::fit(&design(&xs), &y, names(), true, CovarianceType::NonRobust).unwrap();

        assert_relative_eq!(fit.params()[0], 2.0, epsilon = 1e-10);
        assert_relative_eq!(fit.param("OFI").unwrap(), 0.5, epsilon = 1e-10);
        assert_relative_eq!(fit.rsquared(), 1.0, epsilon = 1e-10);
        assert_eq!(fit.rank(), 2);
        assert!(fit.param("TFI").is_none());
    }

    #[test]
    fn test_nonrobust_standard_errors() {
        // y = [1, 3, 2, 5] on x = [0, 1, 2, 3]: slope 1.1, intercept 1.1,
        // residuals [-0.1, 0.8, -1.3, 0.6], ssr 2.7, s² = 1.35.
        let xs = [0.0, 1.0, 2.0, 3.0];
        let y = DVector::from_vec(vec![1.0, 3.0, 2.0, 5.0]);
        let fit = OlsFit::fit(&design(&xs), &y, names(), true, CovarianceType::NonRobust).unwrap();

        assert_relative_eq!(fit.params()[0], 1.1, epsilon = 1e-10);
        assert_relative_eq!(fit.params()[1], 1.1, epsilon = 1e-10);
        assert_relative_eq!(fit.ssr(), 2.7, epsilon = 1e-10);
        // (X'X)⁻¹ = [[0.7, -0.3], [-0.3, 0.2]]
        let bse = fit.bse();
        assert_relative_eq!(bse[0], (1.35_f64 * 0.7).sqrt(), epsilon = 1e-10);
        assert_relative_eq!(bse[1], (1.35_f64 * 0.2).sqrt(), epsilon = 1e-10);
    }

    #[test]
    fn test_hac_zero_lags_equals_hc0() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let y = DVector::from_vec(vec![0.3, 1.1, 1.7, 3.4, 3.9, 5.2]);
        let x = design(&xs);

        let hc0 = OlsFit::fit(&x, &y, names(), true, CovarianceType::Hc0).unwrap();
        let hac0 = OlsFit::fit(&x, &y, names(), true, CovarianceType::Hac { maxlags: 0 }).unwrap();

        for (a, b) in hc0.cov().iter().zip(hac0.cov().iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
        assert_eq!(hac0.covariance_type().to_string(), "HAC(0)");
    }

    #[test]
    fn test_hac_meat_single_lag() {
        // One regressor, xu = [1, 2, 3]; S = 14 + 0.5 * 2 * (2 + 6) = 22.
        let x = DMatrix::from_vec(3, 1, vec![1.0, 1.0, 1.0]);
        let resid = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        let meat = hac_meat(&x, &resid, 1);
        assert_relative_eq!(meat[(0, 0)], 22.0, epsilon = 1e-12);
    }

    #[test]
    fn test_hac_lags_beyond_sample() {
        let x = DMatrix::from_vec(2, 1, vec![1.0, 1.0]);
        let resid = DVector::from_vec(vec![1.0, -1.0]);
        // Only lag 1 exists: S = 2 + (1 - 1/11) * 2 * (-1).
        let meat = hac_meat(&x, &resid, 10);
        assert_relative_eq!(meat[(0, 0)], 2.0 - 2.0 * (10.0 / 11.0), epsilon = 1e-12);
    }

    #[test]
    fn test_rank_deficient_design() {
        // Constant predictor duplicates the intercept column.
        let x = DMatrix::from_fn(3, 2, |_, _| 1.0);
        let y = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        let fit = OlsFit::fit(&x, &y, names(), true, CovarianceType::default()).unwrap();

        assert_eq!(fit.rank(), 1);
        assert_relative_eq!(fit.params()[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(fit.params()[1], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_covariance_serde() {
        let json = serde_json::to_string(&CovarianceType::default()).unwrap();
        assert_eq!(json, r#"{"type":"hac","maxlags":4}"#);
        let parsed: CovarianceType = serde_json::from_str(r#"{"type":"nonrobust"}"#).unwrap();
        assert_eq!(parsed, CovarianceType::NonRobust);
    }
}
