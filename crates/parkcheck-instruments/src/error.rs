use thiserror::Error;

use crate::clinical::FieldId;
use crate::scoring::ValueRange;

/// Rejection of a clinical data form submission.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{label} must be a number", label = .field.label())]
    InvalidNumberFormat { field: FieldId },

    #[error(
        "{label} must be {range}{unit}",
        label = .field.label(),
        unit = .field.unit_suffix()
    )]
    OutOfRange { field: FieldId, range: ValueRange },
}

impl ValidationError {
    pub fn field(&self) -> FieldId {
        match self {
            Self::InvalidNumberFormat { field } | Self::OutOfRange { field, .. } => *field,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssessmentError {
    #[error("please answer all questions to see your result (missing: {})", format_missing(.missing))]
    IncompleteAssessment { missing: Vec<usize> },

    #[error("unknown question number: {0}")]
    UnknownQuestion(usize),

    #[error("question {question} has no option {option}")]
    InvalidOption { question: usize, option: String },
}

fn format_missing(missing: &[usize]) -> String {
    missing
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
