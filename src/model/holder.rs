//! Model Holder - load once, serve for the process lifetime
//!
//! The artifact is read on the first `get` and kept resident afterwards.
//! Initialization has a single writer (`OnceCell::get_or_try_init`); every
//! later caller only reads. A failed load caches nothing.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use super::artifact::{load_model, LoadedModel, ModelMetadata};
use super::inference::{Classifier, InferenceStats, ModelError, StatsSnapshot};

pub struct ModelHolder {
    path: PathBuf,
    cell: OnceCell<LoadedModel>,
    stats: InferenceStats,
}

/// Engine Status for the status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub model_loaded: bool,
    pub model: Option<ModelMetadata>,
    pub artifact_path: String,
    #[serde(flatten)]
    pub stats: StatsSnapshot,
}

impl ModelHolder {
    /// Holder for the artifact at `path`; nothing is read yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
            stats: InferenceStats::default(),
        }
    }

    /// Holder that is already populated with an in-memory classifier
    pub fn with_classifier(classifier: Arc<dyn Classifier>) -> Self {
        let metadata = ModelMetadata::in_memory(classifier.as_ref());
        Self {
            path: PathBuf::from(&metadata.model_path),
            cell: OnceCell::with_value(LoadedModel { classifier, metadata }),
            stats: InferenceStats::default(),
        }
    }

    /// Resident model, loading it on first use
    pub fn get(&self) -> Result<&LoadedModel, ModelError> {
        self.cell.get_or_try_init(|| load_model(&self.path))
    }

    pub fn classifier(&self) -> Result<Arc<dyn Classifier>, ModelError> {
        self.get().map(|loaded| Arc::clone(&loaded.classifier))
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn metadata(&self) -> Option<&ModelMetadata> {
        self.cell.get().map(|loaded| &loaded.metadata)
    }

    /// Run `f` against the resident model, timing it for the stats
    pub fn with_model<T>(
        &self,
        f: impl FnOnce(&dyn Classifier) -> Result<T, ModelError>,
    ) -> Result<(T, u64), ModelError> {
        let classifier = self.classifier()?;

        let start_time = Instant::now();
        let result = f(classifier.as_ref());
        let elapsed = start_time.elapsed().as_micros() as u64;

        match result {
            Ok(value) => {
                self.stats.record(elapsed);
                Ok((value, elapsed))
            }
            Err(e) => {
                self.stats.record_failure();
                Err(e)
            }
        }
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            model_loaded: self.is_loaded(),
            model: self.metadata().cloned(),
            artifact_path: self.path.display().to_string(),
            stats: self.stats.snapshot(),
        }
    }
}
