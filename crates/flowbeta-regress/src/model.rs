//! Structured regression model specification.

use flowbeta_types::SignalRow;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Name of the intercept parameter in fitted models.
pub const INTERCEPT: &str = "Intercept";

/// A column of the interval-signal table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variable {
    /// Mid-price change over the bucket.
    #[serde(rename = "delta_midprice")]
    DeltaMidprice,
    /// Order-flow imbalance.
    #[serde(rename = "OFI")]
    Ofi,
    /// Traded-flow imbalance.
    #[serde(rename = "TFI")]
    Tfi,
}

impl Variable {
    /// Returns the column name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DeltaMidprice => "delta_midprice",
            Self::Ofi => "OFI",
            Self::Tfi => "TFI",
        }
    }

    /// Reads this column from a row.
    #[must_use]
    pub const fn value(&self, row: &SignalRow) -> f64 {
        match self {
            Self::DeltaMidprice => row.delta_midprice,
            Self::Ofi => row.ofi,
            Self::Tfi => row.tfi,
        }
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variable {
    type Err = ModelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "delta_midprice" => Ok(Self::DeltaMidprice),
            "ofi" => Ok(Self::Ofi),
            "tfi" => Ok(Self::Tfi),
            _ => Err(ModelParseError::UnknownVariable(s.trim().to_string())),
        }
    }
}

/// Error returned when parsing a model formula.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelParseError {
    /// The formula has no `~` separator.
    #[error("Model formula '{0}' must have the form 'response ~ predictor + ...'")]
    MissingTilde(String),

    /// A term does not name a signal column.
    #[error("Unknown variable '{0}', expected delta_midprice, OFI or TFI")]
    UnknownVariable(String),

    /// The model has no parameters at all.
    #[error("Model has no predictors and no intercept")]
    Empty,
}

/// Response, ordered predictors and intercept flag of a linear model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Response variable.
    pub response: Variable,
    /// Predictor variables, in parameter order.
    pub predictors: Vec<Variable>,
    /// Whether an intercept leads the parameters.
    #[serde(default = "default_intercept")]
    pub intercept: bool,
}

const fn default_intercept() -> bool {
    true
}

impl ModelSpec {
    /// Creates a model with an intercept.
    #[must_use]
    pub const fn new(response: Variable, predictors: Vec<Variable>) -> Self {
        Self {
            response,
            predictors,
            intercept: true,
        }
    }

    /// `delta_midprice ~ OFI`.
    #[must_use]
    pub fn ofi() -> Self {
        Self::new(Variable::DeltaMidprice, vec![Variable::Ofi])
    }

    /// `delta_midprice ~ OFI + TFI`.
    #[must_use]
    pub fn ofi_tfi() -> Self {
        Self::new(Variable::DeltaMidprice, vec![Variable::Ofi, Variable::Tfi])
    }

    /// Drops the intercept.
    #[must_use]
    pub fn without_intercept(mut self) -> Self {
        self.intercept = false;
        self
    }

    /// Returns the number of model parameters.
    #[must_use]
    pub fn n_params(&self) -> usize {
        self.predictors.len() + usize::from(self.intercept)
    }

    /// Returns parameter names in order, intercept first.
    #[must_use]
    pub fn param_names(&self) -> Vec<String> {
        let intercept = self.intercept.then(|| INTERCEPT.to_string());
        intercept
            .into_iter()
            .chain(self.predictors.iter().map(|v| v.name().to_string()))
            .collect()
    }

    /// Builds the design matrix and response vector of a set of rows.
    #[must_use]
    pub fn design(&self, rows: &[SignalRow]) -> (DMatrix<f64>, DVector<f64>) {
        let offset = usize::from(self.intercept);
        let x = DMatrix::from_fn(rows.len(), self.n_params(), |i, j| {
            if j < offset {
                1.0
            } else {
                self.predictors[j - offset].value(&rows[i])
            }
        });
        let y = DVector::from_iterator(rows.len(), rows.iter().map(|r| self.response.value(r)));
        (x, y)
    }
}

impl Default for ModelSpec {
    fn default() -> Self {
        Self::ofi()
    }
}

impl std::fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ~ ", self.response)?;
        if self.predictors.is_empty() {
            f.write_str("1")?;
        }
        for (i, predictor) in self.predictors.iter().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            write!(f, "{predictor}")?;
        }
        if !self.intercept {
            f.write_str(" - 1")?;
        }
        Ok(())
    }
}

/// Splits a right-hand side into trimmed terms, each flagged when it was
/// preceded by `-`.
fn signed_terms(rhs: &str) -> Vec<(bool, &str)> {
    let mut terms = Vec::new();
    let mut negated = false;
    let mut start = 0;
    for (i, c) in rhs.char_indices() {
        if c == '+' || c == '-' {
            terms.push((negated, rhs[start..i].trim()));
            negated = c == '-';
            start = i + 1;
        }
    }
    terms.push((negated, rhs[start..].trim()));
    terms.retain(|(_, term)| !term.is_empty());
    terms
}

impl FromStr for ModelSpec {
    type Err = ModelParseError;

    /// Parses `response ~ a + b`, where a `0` term or a `- 1` term in any
    /// position removes the intercept and a `1` term is accepted and ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lhs, rhs) = s
            .split_once('~')
            .ok_or_else(|| ModelParseError::MissingTilde(s.to_string()))?;
        let response: Variable = lhs.parse()?;

        let mut intercept = true;
        let mut predictors = Vec::new();
        for (negated, term) in signed_terms(rhs) {
            match (negated, term) {
                (false, "1") => {}
                (false, "0") | (true, "1") => intercept = false,
                (false, _) => predictors.push(term.parse()?),
                (true, _) => return Err(ModelParseError::UnknownVariable(format!("-{term}"))),
            }
        }

        let spec = Self {
            response,
            predictors,
            intercept,
        };
        if spec.n_params() == 0 {
            return Err(ModelParseError::Empty);
        }
        Ok(spec)
    }
}
