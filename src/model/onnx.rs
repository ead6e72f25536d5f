//! ONNX Runtime backend (feature `onnx`)
//!
//! Expects a binary classifier exported with the predicted label as the
//! first output and a `[1, 2]` probability tensor as the second (export with
//! the zipmap post-processing disabled). Input is a `[1, n]` f32 tensor.

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::{Value, ValueType};
use parking_lot::Mutex;

use crate::features::FEATURE_COUNT;
use super::inference::{ensure_dimension, Classifier, ModelError};

pub struct OnnxClassifier {
    /// `Session::run` needs exclusive access
    session: Mutex<Session>,
    label_output: String,
    proba_output: String,
    n_features: usize,
}

impl OnnxClassifier {
    pub fn from_bytes(model_bytes: &[u8]) -> Result<Self, ModelError> {
        tracing::info!("Loading ONNX model from memory ({} bytes)", model_bytes.len());

        let session = Session::builder()
            .map_err(|e| ModelError::Corrupt(format!("Session builder error: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ModelError::Corrupt(format!("Optimization error: {}", e)))?
            .commit_from_memory(model_bytes)
            .map_err(|e| ModelError::Corrupt(format!("Load from memory error: {}", e)))?;

        let mut names = session.outputs.iter().map(|o| o.name.clone());
        let label_output = names
            .next()
            .ok_or_else(|| ModelError::Corrupt("ONNX model defines no outputs".to_string()))?;
        let proba_output = names
            .next()
            .ok_or_else(|| ModelError::Corrupt("ONNX model has no probability output".to_string()))?;

        let n_features = input_width(&session).unwrap_or_else(|| {
            tracing::warn!("ONNX input width is not fixed; assuming {} features", FEATURE_COUNT);
            FEATURE_COUNT
        });

        Ok(Self {
            session: Mutex::new(session),
            label_output,
            proba_output,
            n_features,
        })
    }

    /// Run the graph once, returning `(label, p_fraud)`
    fn run(&self, features: &[f64]) -> Result<(u8, f64), ModelError> {
        ensure_dimension(self.n_features, features)?;

        let data: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let input_array = Array2::<f32>::from_shape_vec((1, features.len()), data)
            .map_err(|e| ModelError::Inference(format!("Array error: {}", e)))?;
        let input_tensor = Value::from_array(input_array)
            .map_err(|e| ModelError::Inference(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| ModelError::Inference(format!("Inference failed: {}", e)))?;

        let label = outputs
            .get(&self.label_output)
            .ok_or_else(|| ModelError::Inference("No label output".to_string()))?
            .try_extract_tensor::<i64>()
            .map_err(|e| ModelError::Inference(format!("Label extract error: {}", e)))?
            .1
            .first()
            .copied()
            .ok_or_else(|| ModelError::Inference("Empty label output".to_string()))?;

        let proba = outputs
            .get(&self.proba_output)
            .ok_or_else(|| ModelError::Inference("No probability output".to_string()))?
            .try_extract_tensor::<f32>()
            .map_err(|e| ModelError::Inference(format!("Probability extract error: {}", e)))?
            .1
            .get(1)
            .copied()
            .ok_or_else(|| ModelError::Inference("Probability output has no positive class".to_string()))?;

        Ok((if label == 1 { 1 } else { 0 }, f64::from(proba).clamp(0.0, 1.0)))
    }
}

/// Last dimension of the first input, when the graph fixes it
fn input_width(session: &Session) -> Option<usize> {
    match &session.inputs.first()?.input_type {
        ValueType::Tensor { shape, .. } => shape
            .last()
            .copied()
            .filter(|&dim| dim > 0)
            .and_then(|dim| usize::try_from(dim).ok()),
        _ => None,
    }
}

impl Classifier for OnnxClassifier {
    fn classify(&self, features: &[f64]) -> Result<u8, ModelError> {
        self.run(features).map(|(label, _)| label)
    }

    fn score(&self, features: &[f64]) -> Result<f64, ModelError> {
        self.run(features).map(|(_, proba)| proba)
    }

    fn predict(&self, features: &[f64]) -> Result<(u8, f64), ModelError> {
        self.run(features)
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn kind(&self) -> &'static str {
        "onnx"
    }

    fn name(&self) -> String {
        "ONNX Runtime (CPU)".to_string()
    }
}
