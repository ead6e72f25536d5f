//! Features Module - Transaction feature schema
//!
//! Layout of the 29 model inputs, the versioned vector built from them, and
//! the input-layer checks applied before anything reaches the model.

pub mod layout;
pub mod vector;
pub mod input;

// Re-export common types
pub use layout::{LayoutInfo, AMOUNT_INDEX, COMPONENT_COUNT, FEATURE_COUNT, FEATURE_LAYOUT};
pub use vector::FeatureVector;
pub use input::{InputError, TransactionInput};
