//! Model Module - Classifier backends and the resident model holder
//!
//! Backends implement `Classifier`; the pipeline never depends on a concrete
//! model type, so swapping the artifact swaps the model.

pub mod inference;
pub mod forest;
pub mod linear;
pub mod artifact;
pub mod holder;
#[cfg(feature = "onnx")]
pub mod onnx;

// Re-export common types
pub use inference::{Classifier, ModelError, StatsSnapshot};
pub use artifact::{check_feature_count, load_model, LoadedModel, ModelArtifact, ModelMetadata};
pub use holder::{EngineStatus, ModelHolder};
pub use forest::RandomForest;
pub use linear::LogisticModel;
