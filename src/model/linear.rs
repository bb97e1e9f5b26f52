use serde::{Deserialize, Serialize};

use super::{check_width, ModelError, Regressor};

/// Ordinary linear regression: `intercept + Σ coefficient_i · x_i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub feature_names: Vec<String>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    pub(super) fn validate(&self) -> Result<(), ModelError> {
        if self.coefficients.len() != self.feature_names.len() {
            return Err(ModelError::InvalidArtifact(format!(
                "{} coefficients for {} features",
                self.coefficients.len(),
                self.feature_names.len()
            )));
        }
        if !self.intercept.is_finite() {
            return Err(ModelError::InvalidArtifact(
                "intercept is not finite".into(),
            ));
        }
        if let Some(i) = self.coefficients.iter().position(|c| !c.is_finite()) {
            return Err(ModelError::InvalidArtifact(format!(
                "coefficient for '{}' is not finite",
                self.feature_names[i]
            )));
        }
        Ok(())
    }
}

impl Regressor for LinearModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, row: &[f64]) -> Result<f64, ModelError> {
        check_width(row, self.coefficients.len())?;
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(row)
            .map(|(c, x)| c * x)
            .sum();
        Ok(self.intercept + dot)
    }

    fn kind(&self) -> &'static str {
        "linear"
    }
}
