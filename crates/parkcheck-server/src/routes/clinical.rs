use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;
use uuid::Uuid;

use parkcheck_core::models::label::Label;
use parkcheck_core::models::reading::ClinicalForm;
use parkcheck_instruments::clinical::{self, FieldSpec};
use parkcheck_model::error::ModelError;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ClinicalResult {
    label: Label,
    class: u8,
    message: String,
}

pub async fn list_fields() -> Json<Vec<FieldSpec>> {
    Json(clinical::field_specs())
}

pub async fn get_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClinicalForm>, ApiError> {
    let handle = state.session(id).await?;
    let session = handle.lock().await;
    Ok(Json(session.form.clone()))
}

/// Store the submitted form, validate it and classify the reading.
///
/// The form is kept in the session even when it is rejected so the user
/// can correct it.
pub async fn submit_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<ClinicalForm>,
) -> Result<Json<ClinicalResult>, ApiError> {
    let handle = state.session(id).await?;
    let mut session = handle.lock().await;
    session.form = form;

    if !state.classifier.is_available() {
        return Err(ModelError::Unavailable.into());
    }

    let reading = clinical::validate(&session.form)?;
    let label = state.classifier.classify(&reading)?;
    tracing::info!(session = %id, label = label.as_class(), "clinical reading classified");

    Ok(Json(ClinicalResult {
        label,
        class: label.as_class(),
        message: label.message().to_string(),
    }))
}

pub async fn clear_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClinicalForm>, ApiError> {
    let handle = state.session(id).await?;
    let mut session = handle.lock().await;
    session.form.clear();
    Ok(Json(session.form.clone()))
}
