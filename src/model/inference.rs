//! Inference contract - the two-method classifier capability
//!
//! Every backend (native JSON forest, logistic regression, ONNX) implements
//! `Classifier`. The pipeline only ever sees `dyn Classifier`.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model artifact not found: {path}")]
    NotFound { path: String },

    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("model artifact {path} is not a valid model document: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("model artifact is corrupt: {0}")]
    Corrupt(String),

    #[error("feature layout mismatch: artifact was fit on layout {actual:08x}, this build uses {expected:08x}")]
    LayoutMismatch { expected: u32, actual: u32 },

    #[error("unsupported model artifact: {0}")]
    Unsupported(String),

    #[error("feature vector has {actual} values but the model expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("inference failed: {0}")]
    Inference(String),
}

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Binary classifier over a fixed-length numeric vector.
///
/// Implementations are read-only after construction; `classify` and `score`
/// must be side-effect free so one instance can serve many sessions.
pub trait Classifier: Send + Sync {
    /// Predicted label, 0 (genuine) or 1 (fraud)
    fn classify(&self, features: &[f64]) -> Result<u8, ModelError>;

    /// Probability of the positive class, in [0, 1]
    fn score(&self, features: &[f64]) -> Result<f64, ModelError>;

    /// Label and probability for one vector.
    ///
    /// The default asks `classify` then `score`; backends that produce both
    /// from one evaluation override it.
    fn predict(&self, features: &[f64]) -> Result<(u8, f64), ModelError> {
        Ok((self.classify(features)?, self.score(features)?))
    }

    /// Input dimensionality the model was trained with
    fn n_features(&self) -> usize;

    /// Backend identifier (`random_forest`, `logistic_regression`, `onnx`)
    fn kind(&self) -> &'static str;

    /// Human-readable model description
    fn name(&self) -> String;
}

/// Reject vectors whose length differs from the trained dimensionality
pub fn ensure_dimension(expected: usize, features: &[f64]) -> Result<(), ModelError> {
    if features.len() != expected {
        return Err(ModelError::DimensionMismatch {
            expected,
            actual: features.len(),
        });
    }
    Ok(())
}

// ============================================================================
// STATS
// ============================================================================

/// Inference counters for the status endpoint
#[derive(Debug, Default)]
pub struct InferenceStats {
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
    failure_count: AtomicU64,
}

impl InferenceStats {
    pub fn record(&self, latency_us: u64) {
        self.latency_sum_us.fetch_add(latency_us, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f64 / count as f64) / 1000.0 } else { 0.0 };

        StatsSnapshot {
            inference_count: count,
            failure_count: self.failure_count.load(Ordering::Relaxed),
            avg_latency_ms: avg,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub inference_count: u64,
    pub failure_count: u64,
    pub avg_latency_ms: f64,
}

// ============================================================================
// HELPERS
// ============================================================================

/// Numerically stable logistic function
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_dimension() {
        assert!(ensure_dimension(29, &[0.0; 29]).is_ok());

        let err = ensure_dimension(29, &[0.0; 28]).unwrap_err();
        assert!(matches!(err, ModelError::DimensionMismatch { expected: 29, actual: 28 }));
    }

    struct Fixed;

    impl Classifier for Fixed {
        fn classify(&self, _: &[f64]) -> Result<u8, ModelError> { Ok(1) }
        fn score(&self, _: &[f64]) -> Result<f64, ModelError> { Ok(0.75) }
        fn n_features(&self) -> usize { 1 }
        fn kind(&self) -> &'static str { "test" }
        fn name(&self) -> String { "Fixed".to_string() }
    }

    #[test]
    fn test_default_predict_pairs_label_and_score() {
        assert_eq!(Fixed.predict(&[0.0]).unwrap(), (1, 0.75));
    }

    #[test]
    fn test_sigmoid_bounds() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(800.0) <= 1.0);
        assert!(sigmoid(-800.0) >= 0.0);
        assert!(sigmoid(2.0) > 0.5);
        assert!(sigmoid(-2.0) < 0.5);
    }

    #[test]
    fn test_stats_average() {
        let stats = InferenceStats::default();
        assert_eq!(stats.snapshot().avg_latency_ms, 0.0);

        stats.record(1000);
        stats.record(3000);
        stats.record_failure();

        let snap = stats.snapshot();
        assert_eq!(snap.inference_count, 2);
        assert_eq!(snap.failure_count, 1);
        assert!((snap.avg_latency_ms - 2.0).abs() < 1e-9);
    }
}
