use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Closed interval of plausible values for a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Both bounds inclusive. NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "between {} and {}", self.min, self.max)
    }
}

/// Three-level risk bucket for the self-assessment percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Bucket a percentage: below 25 is low, below 50 medium, otherwise high.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage < 25.0 {
            Self::Low
        } else if percentage < 50.0 {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Medium => "Medium Risk",
            Self::High => "High Risk",
        }
    }

    pub fn recommendations(&self) -> &'static [&'static str] {
        match self {
            Self::Low => &["Continue healthy habits", "Monitor any symptom changes"],
            Self::Medium => &[
                "Consult a doctor within 2-4 weeks",
                "Start regular physical activity",
            ],
            Self::High => &[
                "See a neurologist immediately",
                "Early treatment is most effective",
            ],
        }
    }
}
