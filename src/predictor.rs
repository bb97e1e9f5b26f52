//! Single inference call on an aligned feature vector.

use serde::Serialize;

use crate::features::FeatureVector;
use crate::model::{check_width, ModelError, Regressor};

/// Rounded survival estimate plus any alignment warnings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Predicted survival, in months, rounded to one decimal.
    pub months: f64,
    pub warnings: Vec<String>,
}

/// Round to one decimal place; exact halves go to the even digit.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Run the model once on `features`. Errors are not handled here.
pub fn predict(model: &dyn Regressor, features: &FeatureVector) -> Result<f64, ModelError> {
    check_width(features.values(), model.feature_names().len())?;
    if features.columns() != model.feature_names() {
        return Err(ModelError::SchemaMismatch {
            found: features.columns().to_vec(),
            expected: model.feature_names().to_vec(),
        });
    }
    let raw = model.predict(features.values())?;
    if !raw.is_finite() {
        return Err(ModelError::NonFinite);
    }
    Ok(round_to_tenth(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureLayout;
    use crate::model::LinearModel;

    fn model(intercept: f64) -> LinearModel {
        LinearModel {
            feature_names: vec!["Age".into(), "Stage".into()],
            intercept,
            coefficients: vec![0.1, 1.0],
        }
    }

    fn vector(names: &[&str], age: f64, stage: f64) -> FeatureVector {
        let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        FeatureLayout::new(&names)
            .reconcile([("Age", age), ("Stage", stage)])
            .vector
    }

    #[test]
    fn rounds_to_one_decimal() {
        assert_eq!(round_to_tenth(12.34), 12.3);
        assert_eq!(round_to_tenth(12.35000001), 12.4);
        assert_eq!(round_to_tenth(-3.25), -3.2);
        assert_eq!(round_to_tenth(7.0), 7.0);
    }

    #[test]
    fn exact_halves_round_to_even() {
        assert_eq!(round_to_tenth(0.25), 0.2);
        assert_eq!(round_to_tenth(0.35), 0.4);
        assert_eq!(round_to_tenth(56.25), 56.2);
        assert_eq!(round_to_tenth(56.75), 56.8);
    }

    #[test]
    fn predicts_rounded_value() {
        let m = model(20.0);
        let v = vector(&["Age", "Stage"], 33.3, 2.0);
        // 20 + 3.33 + 2 = 25.33
        assert_eq!(predict(&m, &v).unwrap(), 25.3);
    }

    #[test]
    fn same_input_same_output() {
        let m = model(20.0);
        let v = vector(&["Age", "Stage"], 47.0, 3.0);
        assert_eq!(predict(&m, &v).unwrap(), predict(&m, &v).unwrap());
    }

    #[test]
    fn width_mismatch_propagates() {
        let m = model(20.0);
        let v = vector(&["Age"], 47.0, 3.0);
        assert!(matches!(
            predict(&m, &v),
            Err(ModelError::ShapeMismatch { found: 1, expected: 2 })
        ));
    }

    #[test]
    fn reordered_columns_are_rejected() {
        let m = LinearModel {
            feature_names: vec!["Age".into(), "Stage".into()],
            intercept: 0.0,
            coefficients: vec![1.0, 100.0],
        };
        let v = vector(&["Stage", "Age"], 50.0, 2.0);
        match predict(&m, &v) {
            Err(ModelError::SchemaMismatch { found, expected }) => {
                assert_eq!(found, ["Stage", "Age"]);
                assert_eq!(expected, ["Age", "Stage"]);
            }
            other => panic!("expected schema mismatch, got {other:?}"),
        }
    }

    #[test]
    fn renamed_column_is_rejected() {
        let m = model(20.0);
        let v = vector(&["Age", "Grade"], 47.0, 3.0);
        assert!(matches!(
            predict(&m, &v),
            Err(ModelError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn non_finite_output_is_an_error() {
        let m = LinearModel {
            feature_names: vec!["Age".into()],
            intercept: f64::MAX,
            coefficients: vec![f64::MAX],
        };
        let v = vector(&["Age"], 10.0, 0.0);
        assert!(matches!(predict(&m, &v), Err(ModelError::NonFinite)));
    }
}
