//! Random Forest backend
//!
//! Trees are stored as flat node arrays with the root at index 0, the layout
//! produced when exporting a fitted tree ensemble node by node. Children
//! always come after their parent, which bounds every traversal.

use serde::{Deserialize, Serialize};

use super::inference::{ensure_dimension, Classifier, ModelError};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Class weights `[genuine, fraud]`
        value: [f64; 2],
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_hash: Option<u32>,
    pub trees: Vec<DecisionTree>,
}

// ============================================================================
// VALIDATION
// ============================================================================

impl DecisionTree {
    fn validate(&self, tree_idx: usize, n_features: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::Corrupt(format!("tree {tree_idx} has no nodes")));
        }

        let len = self.nodes.len();
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split { feature, threshold, left, right } => {
                    if *feature >= n_features {
                        return Err(ModelError::Corrupt(format!(
                            "tree {tree_idx} node {idx} splits on feature {feature} (model has {n_features})"
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(ModelError::Corrupt(format!(
                            "tree {tree_idx} node {idx} has a non-finite threshold"
                        )));
                    }
                    for child in [*left, *right] {
                        if child <= idx || child >= len {
                            return Err(ModelError::Corrupt(format!(
                                "tree {tree_idx} node {idx} points to invalid child {child}"
                            )));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    let valid = value.iter().all(|w| w.is_finite() && *w >= 0.0)
                        && value.iter().sum::<f64>() > 0.0;
                    if !valid {
                        return Err(ModelError::Corrupt(format!(
                            "tree {tree_idx} leaf {idx} has invalid class weights {value:?}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl RandomForest {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.n_features == 0 {
            return Err(ModelError::Corrupt("n_features must be positive".to_string()));
        }
        if self.trees.is_empty() {
            return Err(ModelError::Corrupt("forest has no trees".to_string()));
        }
        for (idx, tree) in self.trees.iter().enumerate() {
            tree.validate(idx, self.n_features)?;
        }
        Ok(())
    }

    /// Class distribution `[p_genuine, p_fraud]` averaged over all trees
    pub fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], ModelError> {
        ensure_dimension(self.n_features, features)?;

        let mut sums = [0.0f64; 2];
        for tree in &self.trees {
            let [neg, pos] = tree.leaf_value(features);
            let total = neg + pos;
            sums[0] += neg / total;
            sums[1] += pos / total;
        }

        let n = self.trees.len() as f64;
        Ok([sums[0] / n, sums[1] / n])
    }
}

impl DecisionTree {
    fn leaf_value(&self, features: &[f64]) -> [f64; 2] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split { feature, threshold, left, right } => {
                    // Splits were fit on f32 inputs
                    let x = features[*feature] as f32 as f64;
                    idx = if x <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

// ============================================================================
// CLASSIFIER
// ============================================================================

impl Classifier for RandomForest {
    fn classify(&self, features: &[f64]) -> Result<u8, ModelError> {
        let [neg, pos] = self.predict_proba(features)?;
        // arg-max; ties go to the first class
        Ok(if pos > neg { 1 } else { 0 })
    }

    fn score(&self, features: &[f64]) -> Result<f64, ModelError> {
        let [_, pos] = self.predict_proba(features)?;
        Ok(pos.clamp(0.0, 1.0))
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn kind(&self) -> &'static str {
        "random_forest"
    }

    fn name(&self) -> String {
        format!("Random Forest ({} trees)", self.trees.len())
    }
}
