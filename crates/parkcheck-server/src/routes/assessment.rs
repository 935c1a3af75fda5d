use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use parkcheck_instruments::assessment::{
    self, AssessmentResult, Answers, DISCLAIMER, MAX_SCORE, QUESTION_COUNT, Question,
};
use parkcheck_instruments::error::AssessmentError;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct Questionnaire {
    questions: &'static [Question],
    max_score: u8,
    disclaimer: &'static str,
}

#[derive(Serialize)]
pub struct AnswerStatus {
    /// Selected option index per question, `null` when unanswered.
    answers: Vec<Option<usize>>,
    missing: Vec<usize>,
    complete: bool,
}

impl From<&Answers> for AnswerStatus {
    fn from(answers: &Answers) -> Self {
        Self {
            answers: (1..=QUESTION_COUNT).map(|n| answers.get(n)).collect(),
            missing: answers.missing(),
            complete: answers.is_complete(),
        }
    }
}

/// An answer given either by option index or by option label.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Selection {
    Index { option: usize },
    Label { label: String },
}

impl Selection {
    fn apply(&self, answers: &mut Answers, question: usize) -> Result<(), AssessmentError> {
        match self {
            Selection::Index { option } => answers.select(question, *option),
            Selection::Label { label } => answers.select_label(question, label),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CompleteRequest {
    /// Optional full answer set in question order; replaces the session's
    /// answers before scoring.
    #[serde(default)]
    answers: Option<Vec<Option<Selection>>>,
}

pub async fn get_questionnaire() -> Json<Questionnaire> {
    Json(Questionnaire {
        questions: assessment::questions(),
        max_score: MAX_SCORE,
        disclaimer: DISCLAIMER,
    })
}

pub async fn get_answers(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnswerStatus>, ApiError> {
    let handle = state.session(id).await?;
    let session = handle.lock().await;
    Ok(Json(AnswerStatus::from(&session.answers)))
}

pub async fn select_answer(
    State(state): State<AppState>,
    Path((id, question)): Path<(Uuid, usize)>,
    Json(selection): Json<Selection>,
) -> Result<Json<AnswerStatus>, ApiError> {
    let handle = state.session(id).await?;
    let mut session = handle.lock().await;
    selection.apply(&mut session.answers, question)?;
    Ok(Json(AnswerStatus::from(&session.answers)))
}

pub async fn complete_assessment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CompleteRequest>,
) -> Result<Json<AssessmentResult>, ApiError> {
    let handle = state.session(id).await?;
    let mut session = handle.lock().await;

    if let Some(selections) = req.answers {
        if selections.len() != QUESTION_COUNT {
            return Err(ApiError::BadRequest(format!(
                "expected {QUESTION_COUNT} answers, got {}",
                selections.len()
            )));
        }
        let mut answers = Answers::default();
        for (i, selection) in selections.iter().enumerate() {
            if let Some(selection) = selection {
                selection.apply(&mut answers, i + 1)?;
            }
        }
        session.answers = answers;
    }

    let result = assessment::score(&session.answers)?;
    tracing::info!(
        session = %id,
        total = result.total,
        tier = ?result.tier,
        "self-assessment scored"
    );
    Ok(Json(result))
}

/// Take the test again: forget every answer.
pub async fn reset_answers(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnswerStatus>, ApiError> {
    let handle = state.session(id).await?;
    let mut session = handle.lock().await;
    session.answers.clear();
    Ok(Json(AnswerStatus::from(&session.answers)))
}
