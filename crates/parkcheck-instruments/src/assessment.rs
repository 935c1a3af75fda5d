//! Parkinson's self check: seven symptom questions, four options each.
//!
//! Option weights are positional. The first option of every question
//! weighs 0 and the fourth weighs 3, whatever the wording, so two
//! questions that share an option label can never disagree on its weight.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::AssessmentError;
use crate::scoring::RiskTier;

pub const QUESTION_COUNT: usize = 7;
pub const OPTIONS_PER_QUESTION: usize = 4;
/// Highest possible total: every question at its last option.
pub const MAX_SCORE: u8 = (QUESTION_COUNT * (OPTIONS_PER_QUESTION - 1)) as u8;

pub const DISCLAIMER: &str =
    "This self-assessment is not a diagnosis. Always consult a doctor if unsure.";

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Question {
    /// 1-based question number.
    pub number: usize,
    pub text: String,
    /// Option labels in weight order.
    pub options: Vec<String>,
}

impl Question {
    /// Index of `label` among this question's options.
    pub fn option_index(&self, label: &str) -> Option<usize> {
        self.options.iter().position(|o| o == label)
    }
}

/// The questionnaire in presentation order.
pub fn questions() -> &'static [Question] {
    static QUESTIONS: LazyLock<Vec<Question>> = LazyLock::new(|| {
        const FREQUENCY: [&str; 4] = ["Never", "Sometimes", "Often", "Always"];

        let items: [(&str, [&str; 4]); QUESTION_COUNT] = [
            ("Do you have hand shaking/tremors?", FREQUENCY),
            ("Do you have balance problems?", FREQUENCY),
            ("Do you move slower than before?", FREQUENCY),
            ("Do you feel body stiffness?", FREQUENCY),
            (
                "Has your voice become softer?",
                ["No change", "Little soft", "Very soft", "Hard to hear"],
            ),
            (
                "Has your handwriting become smaller?",
                ["Same size", "Little smaller", "Much smaller", "Very tiny"],
            ),
            ("Do you feel sad or worried often?", FREQUENCY),
        ];

        items
            .iter()
            .enumerate()
            .map(|(i, (text, options))| Question {
                number: i + 1,
                text: text.to_string(),
                options: options.iter().map(|o| o.to_string()).collect(),
            })
            .collect()
    });
    &QUESTIONS
}

/// Look up a question by its 1-based number.
pub fn question(number: usize) -> Result<&'static Question, AssessmentError> {
    number
        .checked_sub(1)
        .and_then(|i| questions().get(i))
        .ok_or(AssessmentError::UnknownQuestion(number))
}

/// Answers selected so far, one optional option index per question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Answers {
    selected: [Option<u8>; QUESTION_COUNT],
}

impl Answers {
    /// Build a complete answer set from option indexes in question order.
    pub fn from_indexes(indexes: [usize; QUESTION_COUNT]) -> Result<Self, AssessmentError> {
        let mut answers = Self::default();
        for (i, option) in indexes.into_iter().enumerate() {
            answers.select(i + 1, option)?;
        }
        Ok(answers)
    }

    /// Select option `option` (0-based) for question `number` (1-based).
    pub fn select(&mut self, number: usize, option: usize) -> Result<(), AssessmentError> {
        let q = question(number)?;
        if option >= q.options.len() {
            return Err(AssessmentError::InvalidOption {
                question: number,
                option: option.to_string(),
            });
        }
        self.selected[number - 1] = Some(option as u8);
        Ok(())
    }

    /// Select an option by its label, resolved against that question's own
    /// options.
    pub fn select_label(&mut self, number: usize, label: &str) -> Result<(), AssessmentError> {
        let q = question(number)?;
        let option = q
            .option_index(label)
            .ok_or_else(|| AssessmentError::InvalidOption {
                question: number,
                option: label.to_string(),
            })?;
        self.selected[number - 1] = Some(option as u8);
        Ok(())
    }

    /// Selected option index for question `number`, if answered.
    pub fn get(&self, number: usize) -> Option<usize> {
        number
            .checked_sub(1)
            .and_then(|i| self.selected.get(i).copied().flatten())
            .map(usize::from)
    }

    /// 1-based numbers of unanswered questions.
    pub fn missing(&self) -> Vec<usize> {
        self.selected
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_none())
            .map(|(i, _)| i + 1)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.selected.iter().all(Option::is_some)
    }

    /// Forget every answer ("take test again").
    pub fn clear(&mut self) {
        self.selected = [None; QUESTION_COUNT];
    }
}

/// Outcome of a completed self-assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AssessmentResult {
    pub total: u8,
    pub max_score: u8,
    /// `100 * total / max_score`, unrounded.
    pub percentage: f64,
    /// Percentage rounded to a whole number for display.
    pub display_percentage: u8,
    pub tier: RiskTier,
    pub tier_name: String,
    pub recommendations: Vec<String>,
    pub disclaimer: String,
}

/// Score a complete answer set.
///
/// Fails with [`AssessmentError::IncompleteAssessment`] if any question is
/// unanswered.
pub fn score(answers: &Answers) -> Result<AssessmentResult, AssessmentError> {
    let missing = answers.missing();
    if !missing.is_empty() {
        return Err(AssessmentError::IncompleteAssessment { missing });
    }

    let total: u8 = answers.selected.iter().flatten().sum();
    let percentage = 100.0 * f64::from(total) / f64::from(MAX_SCORE);
    let tier = RiskTier::from_percentage(percentage);

    Ok(AssessmentResult {
        total,
        max_score: MAX_SCORE,
        percentage,
        display_percentage: percentage.round() as u8,
        tier,
        tier_name: tier.name().to_string(),
        recommendations: tier
            .recommendations()
            .iter()
            .map(|r| r.to_string())
            .collect(),
        disclaimer: DISCLAIMER.to_string(),
    })
}
