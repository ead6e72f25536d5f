//! Feature Vector - Core data structure for model input
//!
//! Versioned feature vector carrying the layout metadata it was built
//! against. The values are kept in `FEATURE_LAYOUT` order.

use serde::{Deserialize, Serialize};
use super::layout::{COMPONENT_COUNT, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION, layout_hash};

/// Versioned Feature Vector with layout metadata
///
/// A vector assembled from the form always holds `FEATURE_COUNT` values.
/// Vectors built from raw API payloads can be shorter or longer; the model
/// rejects those with a dimensionality error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout
    pub layout_hash: u32,
    /// Feature values in order defined by FEATURE_LAYOUT
    pub values: Vec<f64>,
}

impl FeatureVector {
    /// Build from the 28 anonymized components followed by the amount
    pub fn from_inputs(components: &[f64; COMPONENT_COUNT], amount: f64) -> Self {
        let mut values = Vec::with_capacity(FEATURE_COUNT);
        values.extend_from_slice(components);
        values.push(amount);
        Self::from_values(values)
    }

    /// Build from an arbitrary component slice (length is not checked here)
    pub fn from_parts(components: &[f64], amount: f64) -> Self {
        let mut values = Vec::with_capacity(components.len() + 1);
        values.extend_from_slice(components);
        values.push(amount);
        Self::from_values(values)
    }

    /// Wrap raw values with the current layout metadata
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Get feature by index
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Named values for structured logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "named_values": FEATURE_LAYOUT.iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.to_string(), serde_json::Value::from(*value)))
                .collect::<serde_json::Map<_, _>>(),
        })
    }
}
