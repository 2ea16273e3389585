//! Slope extraction from windowed fits.

use flowbeta_types::{BetaPoint, FlowError, Result};

use crate::{Variable, WindowFit};

/// Extracts the slope of `predictor` from every window, in window order.
///
/// Windows kept without a fit yield NaN.
///
/// # Errors
///
/// Returns [`FlowError::MissingPredictor`] if a fit has no parameter named
/// after `predictor`.
pub fn extract_betas(fits: &[WindowFit], predictor: Variable) -> Result<Vec<BetaPoint>> {
    let name = predictor.name();
    fits.iter()
        .map(|window| {
            let beta = match &window.fit {
                Some(fit) => fit
                    .param(name)
                    .ok_or_else(|| FlowError::MissingPredictor(name.to_string()))?,
                None => f64::NAN,
            };
            Ok(BetaPoint::new(window.start, beta))
        })
        .collect()
}
