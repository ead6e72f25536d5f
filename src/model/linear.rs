//! Logistic Regression backend

use serde::{Deserialize, Serialize};

use super::inference::{ensure_dimension, sigmoid, Classifier, ModelError};

/// Standardization applied before the linear term: `(x - mean) / scale`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub n_features: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_hash: Option<u32>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler: Option<Scaler>,
}

impl LogisticModel {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.n_features == 0 {
            return Err(ModelError::Corrupt("n_features must be positive".to_string()));
        }
        if self.coefficients.len() != self.n_features {
            return Err(ModelError::Corrupt(format!(
                "{} coefficients for {} features",
                self.coefficients.len(),
                self.n_features
            )));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|w| !w.is_finite()) {
            return Err(ModelError::Corrupt("non-finite model weights".to_string()));
        }
        if let Some(scaler) = &self.scaler {
            if scaler.mean.len() != self.n_features || scaler.scale.len() != self.n_features {
                return Err(ModelError::Corrupt("scaler length does not match n_features".to_string()));
            }
            if scaler.scale.iter().any(|s| *s == 0.0 || !s.is_finite())
                || scaler.mean.iter().any(|m| !m.is_finite())
            {
                return Err(ModelError::Corrupt("scaler has zero or non-finite entries".to_string()));
            }
        }
        Ok(())
    }

    /// Signed distance from the decision boundary
    pub fn decision_function(&self, features: &[f64]) -> Result<f64, ModelError> {
        ensure_dimension(self.n_features, features)?;

        let z = match &self.scaler {
            Some(scaler) => features
                .iter()
                .zip(&self.coefficients)
                .zip(scaler.mean.iter().zip(&scaler.scale))
                .map(|((x, w), (mean, scale))| w * (x - mean) / scale)
                .sum::<f64>(),
            None => features
                .iter()
                .zip(&self.coefficients)
                .map(|(x, w)| w * x)
                .sum::<f64>(),
        };

        Ok(z + self.intercept)
    }
}

impl Classifier for LogisticModel {
    fn classify(&self, features: &[f64]) -> Result<u8, ModelError> {
        Ok(if self.decision_function(features)? > 0.0 { 1 } else { 0 })
    }

    fn score(&self, features: &[f64]) -> Result<f64, ModelError> {
        Ok(sigmoid(self.decision_function(features)?))
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn kind(&self) -> &'static str {
        "logistic_regression"
    }

    fn name(&self) -> String {
        "Logistic Regression".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> LogisticModel {
        LogisticModel {
            n_features: 2,
            layout_hash: None,
            coefficients: vec![-1.5, 0.5],
            intercept: -2.0,
            scaler: None,
        }
    }

    #[test]
    fn test_score_is_sigmoid_of_decision() {
        let m = model();
        let x = [-2.0, 1.0];
        // -1.5 * -2 + 0.5 * 1 - 2 = 1.5
        assert!((m.decision_function(&x).unwrap() - 1.5).abs() < 1e-12);
        assert!((m.score(&x).unwrap() - sigmoid(1.5)).abs() < 1e-12);
        assert_eq!(m.classify(&x).unwrap(), 1);
        assert_eq!(m.classify(&[0.0, 0.0]).unwrap(), 0);
    }

    #[test]
    fn test_boundary_is_genuine() {
        let m = LogisticModel { intercept: 0.0, ..model() };
        assert_eq!(m.score(&[0.0, 0.0]).unwrap(), 0.5);
        assert_eq!(m.classify(&[0.0, 0.0]).unwrap(), 0);
    }

    #[test]
    fn test_scaler_applied() {
        let m = LogisticModel {
            scaler: Some(Scaler { mean: vec![1.0, 0.0], scale: vec![2.0, 1.0] }),
            ..model()
        };
        // -1.5 * (3 - 1) / 2 + 0 - 2 = -3.5
        assert!((m.decision_function(&[3.0, 0.0]).unwrap() + 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_validate() {
        assert!(model().validate().is_ok());

        let short = LogisticModel { coefficients: vec![1.0], ..model() };
        assert!(short.validate().is_err());

        let zero_scale = LogisticModel {
            scaler: Some(Scaler { mean: vec![0.0, 0.0], scale: vec![1.0, 0.0] }),
            ..model()
        };
        assert!(zero_scale.validate().is_err());
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = model().classify(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, ModelError::DimensionMismatch { expected: 2, actual: 3 }));
    }
}
