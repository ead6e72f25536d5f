//! Transaction Input - what the form (or the JSON API) collects
//!
//! Input-layer constraints live here: every value must be a finite number
//! and the amount cannot be negative. Nothing that fails these checks is
//! handed to the model.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::layout::{feature_name, COMPONENT_COUNT};
use super::vector::FeatureVector;

// ============================================================================
// FORM DEFAULTS
// ============================================================================

/// Default value of every anonymized component field
pub const COMPONENT_DEFAULT: f64 = 0.0;

/// Display precision of the component fields
pub const COMPONENT_PRECISION: usize = 4;

/// Default transaction amount
pub const AMOUNT_DEFAULT: f64 = 100.0;

/// Step of the amount field
pub const AMOUNT_STEP: f64 = 10.0;

/// Lower bound of the amount field
pub const AMOUNT_MIN: f64 = 0.0;

/// Form field name of the amount
pub const AMOUNT_FIELD: &str = "amount";

/// Form field name of component `index` (0-based), e.g. `v1`
pub fn component_field(index: usize) -> String {
    format!("v{}", index + 1)
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("{field} must be a number, got {value:?}")]
    NotANumber { field: String, value: String },

    #[error("{0}")]
    Invalid(#[from] validator::ValidationErrors),
}

// ============================================================================
// TRANSACTION INPUT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_finite"))]
pub struct TransactionInput {
    /// Anonymized components V1..V28, in layout order
    pub components: Vec<f64>,

    /// Transaction amount ($)
    #[validate(range(min = 0.0, message = "Transaction amount cannot be negative"))]
    pub amount: f64,
}

fn validate_finite(input: &TransactionInput) -> Result<(), ValidationError> {
    let all_finite = input.components.iter().all(|v| v.is_finite()) && input.amount.is_finite();
    if all_finite {
        Ok(())
    } else {
        let mut err = ValidationError::new("non_finite");
        err.message = Some("Feature values must be finite numbers".into());
        Err(err)
    }
}

impl Default for TransactionInput {
    fn default() -> Self {
        Self {
            components: vec![COMPONENT_DEFAULT; COMPONENT_COUNT],
            amount: AMOUNT_DEFAULT,
        }
    }
}

impl TransactionInput {
    /// Parse URL-encoded form fields (`v1`..`v28`, `amount`).
    ///
    /// A field the browser did not send keeps its widget default. Blank
    /// values count as missing.
    pub fn from_form(fields: &HashMap<String, String>) -> Result<Self, InputError> {
        let mut input = Self::default();

        for (index, slot) in input.components.iter_mut().enumerate() {
            let name = component_field(index);
            if let Some(value) = parse_field(fields, &name)? {
                *slot = value;
            }
        }
        if let Some(amount) = parse_field(fields, AMOUNT_FIELD)? {
            input.amount = amount;
        }

        input.validate()?;
        Ok(input)
    }

    /// Best-effort read of the same fields, for re-rendering a rejected form.
    ///
    /// Every field that parses to a finite number is kept as submitted, even
    /// if it breaks a range rule. Anything else shows its widget default.
    pub fn from_form_lossy(fields: &HashMap<String, String>) -> Self {
        let lenient = |name: &str| {
            fields
                .get(name)
                .and_then(|raw| raw.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
        };

        let mut input = Self::default();
        for (index, slot) in input.components.iter_mut().enumerate() {
            if let Some(value) = lenient(&component_field(index)) {
                *slot = value;
            }
        }
        if let Some(amount) = lenient(AMOUNT_FIELD) {
            input.amount = amount;
        }
        input
    }

    /// Assemble the model input in layout order
    pub fn to_vector(&self) -> FeatureVector {
        FeatureVector::from_parts(&self.components, self.amount)
    }

    /// Component value for display, falling back to the default
    pub fn component(&self, index: usize) -> f64 {
        self.components.get(index).copied().unwrap_or(COMPONENT_DEFAULT)
    }

    /// Layout label of a component (`V1`..`V28`)
    pub fn component_label(index: usize) -> &'static str {
        feature_name(index).unwrap_or("?")
    }
}

fn parse_field(fields: &HashMap<String, String>, name: &str) -> Result<Option<f64>, InputError> {
    let Some(raw) = fields.get(name) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| InputError::NotANumber {
            field: name.to_string(),
            value: raw.clone(),
        })
}
