//! Windowed regression feeding beta extraction.

use approx::assert_relative_eq;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use flowbeta_regress::{
    CovarianceType, ModelSpec, RegressionParams, Variable, WindowedRegression, extract_betas,
};
use flowbeta_types::{FlowError, Interval, SignalRow};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 11, 15, 0, 0, 0).unwrap()
}

/// Ten-second rows with a window-dependent OFI slope and a TFI term.
fn series(windows: u32) -> Vec<SignalRow> {
    let mut rows = Vec::new();
    for w in 0..windows {
        let slope = 0.1 * f64::from(w + 1);
        for i in 0..180_u32 {
            let ts = start() + TimeDelta::seconds(i64::from(w * 1800 + i * 10));
            let ofi = f64::from((i * 37 + w) % 11) - 5.0;
            let tfi = f64::from((i * 13) % 5) - 2.0;
            let noise = if i % 2 == 0 { 0.01 } else { -0.01 };
            rows.push(SignalRow::new(ts, slope * ofi + 0.3 * tfi + noise, ofi, tfi));
        }
    }
    rows
}

#[test]
fn test_betas_recover_window_slopes() {
    let rows = series(4);
    let engine = WindowedRegression::new(RegressionParams {
        model: ModelSpec::ofi_tfi(),
        ..Default::default()
    });

    let fits = engine.fit(&rows).unwrap();
    let betas = extract_betas(&fits, Variable::Ofi).unwrap();

    assert_eq!(betas.len(), 4);
    for (w, point) in betas.iter().enumerate() {
        assert_eq!(point.timestamp, start() + TimeDelta::minutes(30 * w as i64));
        assert_relative_eq!(point.beta, 0.1 * (w + 1) as f64, epsilon = 1e-2);
    }

    let fit = fits[0].fit.as_ref().unwrap();
    assert_eq!(fit.names(), ["Intercept", "OFI", "TFI"]);
    assert_eq!(fit.nobs(), 180);
    assert_eq!(fit.covariance_type(), CovarianceType::Hac { maxlags: 4 });
    assert!(fit.bse().iter().all(|se| se.is_finite() && *se >= 0.0));
    assert!(fit.rsquared() > 0.99);
}

#[test]
fn test_hourly_windows() {
    let rows = series(4);
    let engine = WindowedRegression::new(RegressionParams {
        window: Interval::from_mins(60),
        ..Default::default()
    });
    let fits = engine.fit(&rows).unwrap();
    assert_eq!(fits.len(), 2);
}

#[test]
fn test_missing_predictor_aborts_extraction() {
    let rows = series(1);
    let fits = WindowedRegression::default().fit(&rows).unwrap();
    assert!(matches!(
        extract_betas(&fits, Variable::Tfi),
        Err(FlowError::MissingPredictor(_))
    ));
}
