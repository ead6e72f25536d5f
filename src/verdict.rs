//! Verdict - display mapping of a (label, probability) pair
//!
//! The label alone picks the category; the probability is shown as-is and
//! never second-guessed against the label.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Fraudulent,
    Genuine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "High Risk")]
    High,
    #[serde(rename = "Low Risk")]
    Low,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High Risk",
            Self::Low => "Low Risk",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub label: u8,
    pub category: Category,
    /// Positive-class probability reported by the model
    pub probability: f64,
    pub risk: RiskLevel,
}

impl Verdict {
    pub fn new(label: u8, probability: f64) -> Self {
        let (category, risk) = if label == 1 {
            (Category::Fraudulent, RiskLevel::High)
        } else {
            (Category::Genuine, RiskLevel::Low)
        };

        Self { label, category, probability, risk }
    }

    pub fn is_fraud(&self) -> bool {
        self.category == Category::Fraudulent
    }

    pub fn headline(&self) -> &'static str {
        match self.category {
            Category::Fraudulent => "Fraudulent Transaction Detected",
            Category::Genuine => "Genuine Transaction",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self.category {
            Category::Fraudulent => "Recommend blocking this transaction",
            Category::Genuine => "Transaction appears safe",
        }
    }

    /// Probability as a percentage with one decimal, e.g. `12.5%`
    pub fn probability_percent(&self) -> String {
        format!("{:.1}%", self.probability * 100.0)
    }
}
