//! Model artifact loading
//!
//! `load_model(path)` reads the artifact once, fingerprints it and builds the
//! backend matching its format. Nothing here is cached; see `holder`.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::features::layout::{layout_hash, FEATURE_COUNT};
use super::forest::RandomForest;
use super::inference::{Classifier, ModelError};
use super::linear::LogisticModel;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// JSON artifact document, tagged by `kind`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    RandomForest(RandomForest),
    LogisticRegression(LogisticModel),
}

impl ModelArtifact {
    fn layout_hash(&self) -> Option<u32> {
        match self {
            Self::RandomForest(m) => m.layout_hash,
            Self::LogisticRegression(m) => m.layout_hash,
        }
    }

    /// Validate structure and layout, then hand back the backend
    pub fn into_classifier(self) -> Result<Arc<dyn Classifier>, ModelError> {
        if let Some(actual) = self.layout_hash() {
            let expected = layout_hash();
            if actual != expected {
                return Err(ModelError::LayoutMismatch { expected, actual });
            }
        }

        match self {
            Self::RandomForest(m) => {
                m.validate()?;
                Ok(Arc::new(m))
            }
            Self::LogisticRegression(m) => {
                m.validate()?;
                Ok(Arc::new(m))
            }
        }
    }
}

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub model_type: String,
    pub model_name: String,
    pub features: usize,
    /// SHA-256 of the artifact bytes
    pub checksum: Option<String>,
    pub size_bytes: u64,
    pub loaded_at: DateTime<Utc>,
}

impl ModelMetadata {
    /// Metadata for a classifier that was not read from disk
    pub fn in_memory(classifier: &dyn Classifier) -> Self {
        Self {
            model_path: "<memory>".to_string(),
            model_type: classifier.kind().to_string(),
            model_name: classifier.name(),
            features: classifier.n_features(),
            checksum: None,
            size_bytes: 0,
            loaded_at: Utc::now(),
        }
    }
}

/// A resident model and where it came from
#[derive(Clone)]
pub struct LoadedModel {
    pub classifier: Arc<dyn Classifier>,
    pub metadata: ModelMetadata,
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// LOADING
// ============================================================================

/// SHA-256 hex digest
pub fn checksum(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Parse a JSON artifact from memory
pub fn classifier_from_json(bytes: &[u8], origin: &str) -> Result<Arc<dyn Classifier>, ModelError> {
    let artifact: ModelArtifact = serde_json::from_slice(bytes).map_err(|source| ModelError::Parse {
        path: origin.to_string(),
        source,
    })?;
    artifact.into_classifier()
}

/// Load a model artifact from disk
pub fn load_model(path: &Path) -> Result<LoadedModel, ModelError> {
    let shown = path.display().to_string();
    tracing::info!("Loading model artifact from: {}", shown);

    if !path.exists() {
        return Err(ModelError::NotFound { path: shown });
    }

    let bytes = std::fs::read(path).map_err(|source| ModelError::Io {
        path: shown.clone(),
        source,
    })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let classifier: Arc<dyn Classifier> = match extension.as_str() {
        "json" => classifier_from_json(&bytes, &shown)?,
        "onnx" => load_onnx(&bytes)?,
        other => {
            return Err(ModelError::Unsupported(format!(
                "{shown}: unknown artifact extension {other:?} (expected .json or .onnx)"
            )));
        }
    };

    let metadata = ModelMetadata {
        model_path: shown,
        model_type: classifier.kind().to_string(),
        model_name: classifier.name(),
        features: classifier.n_features(),
        checksum: Some(checksum(&bytes)),
        size_bytes: bytes.len() as u64,
        loaded_at: Utc::now(),
    };

    tracing::info!(
        model_type = %metadata.model_type,
        features = metadata.features,
        checksum = metadata.checksum.as_deref().unwrap_or(""),
        "Model loaded: {}",
        metadata.model_name
    );

    Ok(LoadedModel { classifier, metadata })
}

/// Refuse a model whose input width differs from the form's feature count
pub fn check_feature_count(loaded: &LoadedModel) -> Result<(), ModelError> {
    let actual = loaded.classifier.n_features();
    if actual != FEATURE_COUNT {
        return Err(ModelError::DimensionMismatch { expected: FEATURE_COUNT, actual });
    }
    Ok(())
}

#[cfg(feature = "onnx")]
fn load_onnx(bytes: &[u8]) -> Result<Arc<dyn Classifier>, ModelError> {
    Ok(Arc::new(super::onnx::OnnxClassifier::from_bytes(bytes)?))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(_bytes: &[u8]) -> Result<Arc<dyn Classifier>, ModelError> {
    Err(ModelError::Unsupported(
        "ONNX artifacts require building with the `onnx` feature".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const STUMP: &str = r#"{
        "kind": "random_forest",
        "n_features": 2,
        "trees": [{"nodes": [
            {"feature": 0, "threshold": 0.0, "left": 1, "right": 2},
            {"value": [1, 3]},
            {"value": [9, 1]}
        ]}]
    }"#;

    fn write_artifact(name: &str, contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_json_forest() {
        let (_dir, path) = write_artifact("model.json", STUMP);
        let loaded = load_model(&path).unwrap();

        assert_eq!(loaded.metadata.model_type, "random_forest");
        assert_eq!(loaded.metadata.features, 2);
        assert_eq!(loaded.metadata.checksum.as_deref(), Some(checksum(STUMP.as_bytes()).as_str()));
        assert_eq!(loaded.classifier.score(&[-1.0, 0.0]).unwrap(), 0.75);
    }

    #[test]
    fn test_load_logistic() {
        let (_dir, path) = write_artifact(
            "model.JSON",
            r#"{"kind": "logistic_regression", "n_features": 1, "coefficients": [2.0], "intercept": 0.0}"#,
        );
        let loaded = load_model(&path).unwrap();
        assert_eq!(loaded.classifier.kind(), "logistic_regression");
        assert_eq!(loaded.classifier.classify(&[1.0]).unwrap(), 1);
    }

    #[test]
    fn test_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_model(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ModelError::NotFound { .. }));
    }

    #[test]
    fn test_corrupt_artifact() {
        let (_dir, path) = write_artifact("model.json", "{\"kind\": \"random_forest\", \"n_fea");
        assert!(matches!(load_model(&path).unwrap_err(), ModelError::Parse { .. }));

        let (_dir, path) = write_artifact("model.json", r#"{"kind": "svm", "n_features": 2}"#);
        assert!(matches!(load_model(&path).unwrap_err(), ModelError::Parse { .. }));

        let (_dir, path) = write_artifact(
            "model.json",
            r#"{"kind": "random_forest", "n_features": 2, "trees": []}"#,
        );
        assert!(matches!(load_model(&path).unwrap_err(), ModelError::Corrupt(_)));
    }

    #[test]
    fn test_layout_hash_checked() {
        let doc = format!(
            r#"{{"kind": "logistic_regression", "n_features": 1, "layout_hash": {}, "coefficients": [1.0], "intercept": 0.0}}"#,
            layout_hash().wrapping_add(1)
        );
        let (_dir, path) = write_artifact("model.json", &doc);
        assert!(matches!(load_model(&path).unwrap_err(), ModelError::LayoutMismatch { .. }));

        let doc = format!(
            r#"{{"kind": "logistic_regression", "n_features": 1, "layout_hash": {}, "coefficients": [1.0], "intercept": 0.0}}"#,
            layout_hash()
        );
        let (_dir, path) = write_artifact("model.json", &doc);
        assert!(load_model(&path).is_ok());
    }

    #[test]
    fn test_unknown_extension() {
        let (_dir, path) = write_artifact("credit_fraud_model.pkl", STUMP);
        assert!(matches!(load_model(&path).unwrap_err(), ModelError::Unsupported(_)));
    }

    #[test]
    fn test_feature_count_checked() {
        let (_dir, path) = write_artifact("model.json", STUMP);
        let loaded = load_model(&path).unwrap();
        let err = check_feature_count(&loaded).unwrap_err();
        assert!(matches!(err, ModelError::DimensionMismatch { expected: 29, actual: 2 }));

        let bundled = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("models/credit_fraud_model.json");
        assert!(check_feature_count(&load_model(&bundled).unwrap()).is_ok());
    }

    #[test]
    fn test_in_memory_metadata() {
        let classifier = classifier_from_json(STUMP.as_bytes(), "<test>").unwrap();
        let meta = ModelMetadata::in_memory(classifier.as_ref());
        assert_eq!(meta.model_path, "<memory>");
        assert_eq!(meta.model_name, "Random Forest (1 trees)");
        assert!(meta.checksum.is_none());
    }
}
