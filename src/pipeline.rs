//! Inference Pipeline - feature vector in, verdict out
//!
//! One synchronous call per user action. No retries, no partial results: a
//! model error propagates and no verdict is produced.

use serde::{Deserialize, Serialize};

use crate::features::FeatureVector;
use crate::model::{Classifier, ModelError, ModelHolder};
use crate::verdict::Verdict;

/// Verdict plus how it was produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    #[serde(flatten)]
    pub verdict: Verdict,
    pub model: String,
    pub inference_time_us: u64,
}

/// Classify and score `vector` against `model`
pub fn assess(model: &dyn Classifier, vector: &FeatureVector) -> Result<Verdict, ModelError> {
    let (label, probability) = model.predict(vector.as_slice())?;
    Ok(Verdict::new(label, probability))
}

/// Run the pipeline against the resident model
pub fn run(holder: &ModelHolder, vector: &FeatureVector) -> Result<Assessment, ModelError> {
    let (verdict, inference_time_us) = holder.with_model(|model| assess(model, vector))?;

    let model = holder
        .metadata()
        .map(|m| m.model_name.clone())
        .unwrap_or_default();

    tracing::debug!(
        label = verdict.label,
        probability = verdict.probability,
        inference_time_us,
        features = %vector.to_log_entry(),
        "Transaction assessed"
    );

    Ok(Assessment { verdict, model, inference_time_us })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use crate::features::{COMPONENT_COUNT, FEATURE_COUNT};
    use crate::model::forest::{DecisionTree, TreeNode};
    use crate::model::RandomForest;
    use crate::verdict::Category;

    /// Flags low V14 as fraud
    fn v14_forest() -> RandomForest {
        RandomForest {
            n_features: FEATURE_COUNT,
            layout_hash: None,
            trees: vec![DecisionTree {
                nodes: vec![
                    TreeNode::Split { feature: 13, threshold: -4.0, left: 1, right: 2 },
                    TreeNode::Leaf { value: [2.0, 8.0] },
                    TreeNode::Leaf { value: [99.0, 1.0] },
                ],
            }],
        }
    }

    /// Model whose label contradicts its probability
    struct Contrarian;

    impl Classifier for Contrarian {
        fn classify(&self, _: &[f64]) -> Result<u8, ModelError> { Ok(0) }
        fn score(&self, _: &[f64]) -> Result<f64, ModelError> { Ok(0.9) }
        fn n_features(&self) -> usize { FEATURE_COUNT }
        fn kind(&self) -> &'static str { "test" }
        fn name(&self) -> String { "Contrarian".to_string() }
    }

    /// Counts evaluations; answers both outputs from one pass
    #[derive(Default)]
    struct Counting {
        passes: AtomicUsize,
    }

    impl Classifier for Counting {
        fn classify(&self, f: &[f64]) -> Result<u8, ModelError> { self.predict(f).map(|(l, _)| l) }
        fn score(&self, f: &[f64]) -> Result<f64, ModelError> { self.predict(f).map(|(_, p)| p) }
        fn predict(&self, _: &[f64]) -> Result<(u8, f64), ModelError> {
            self.passes.fetch_add(1, Ordering::Relaxed);
            Ok((1, 0.7))
        }
        fn n_features(&self) -> usize { FEATURE_COUNT }
        fn kind(&self) -> &'static str { "test" }
        fn name(&self) -> String { "Counting".to_string() }
    }

    #[test]
    fn test_assess_evaluates_model_once() {
        let model = Counting::default();
        let verdict = assess(&model, &FeatureVector::from_inputs(&[0.0; COMPONENT_COUNT], 1.0)).unwrap();
        assert_eq!(verdict.category, Category::Fraudulent);
        assert_eq!(verdict.probability, 0.7);
        assert_eq!(model.passes.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_assess_genuine_and_fraud() {
        let model = v14_forest();

        let genuine = assess(&model, &FeatureVector::from_inputs(&[0.0; COMPONENT_COUNT], 100.0)).unwrap();
        assert_eq!(genuine.category, Category::Genuine);
        assert!((genuine.probability - 0.01).abs() < 1e-12);

        let mut components = [0.0; COMPONENT_COUNT];
        components[13] = -6.0;
        let fraud = assess(&model, &FeatureVector::from_inputs(&components, 100.0)).unwrap();
        assert_eq!(fraud.category, Category::Fraudulent);
        assert!((fraud.probability - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_assess_is_idempotent() {
        let model = v14_forest();
        let vector = FeatureVector::from_inputs(&[0.3; COMPONENT_COUNT], 0.0);
        assert_eq!(assess(&model, &vector).unwrap(), assess(&model, &vector).unwrap());
    }

    #[test]
    fn test_short_vector_yields_no_verdict() {
        let model = v14_forest();
        let vector = FeatureVector::from_parts(&[0.0; 27], 100.0);
        let err = assess(&model, &vector).unwrap_err();
        assert!(matches!(err, ModelError::DimensionMismatch { expected: 29, actual: 28 }));
    }

    #[test]
    fn test_label_is_trusted() {
        let verdict = assess(&Contrarian, &FeatureVector::from_inputs(&[0.0; COMPONENT_COUNT], 1.0)).unwrap();
        assert_eq!(verdict.category, Category::Genuine);
        assert_eq!(verdict.probability, 0.9);
    }

    #[test]
    fn test_run_uses_resident_model() {
        let holder = ModelHolder::with_classifier(Arc::new(v14_forest()));
        let vector = FeatureVector::from_inputs(&[0.0; COMPONENT_COUNT], 100.0);

        let assessment = run(&holder, &vector).unwrap();
        assert_eq!(assessment.model, "Random Forest (1 trees)");
        assert_eq!(holder.status().stats.inference_count, 1);

        let err = run(&holder, &FeatureVector::from_parts(&[0.0; 27], 1.0)).unwrap_err();
        assert!(matches!(err, ModelError::DimensionMismatch { .. }));
        assert_eq!(holder.status().stats.failure_count, 1);
    }
}
