//! JSON prediction endpoint.
//!
//! `POST /api/predict` takes the same fields as the HTML form and returns
//! the rounded survival estimate, or a structured validation error.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{PatientForm, PatientRecord};
use crate::predictor::Prediction;

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction_id: Uuid,
    pub predicted_months: f64,
    pub warnings: Vec<String>,
    pub predicted_at: String,
}

/// Validate a submission and run it through the loaded model.
pub(crate) fn run_prediction(ctx: &ApiContext, form: &PatientForm) -> Result<Prediction, ApiError> {
    let record = PatientRecord::try_from(form)?;
    let prediction = ctx.model.predict_record(&record)?;
    Ok(prediction)
}

/// `POST /api/predict`: predict survival for one patient.
pub async fn predict(
    State(ctx): State<ApiContext>,
    payload: Result<Json<PatientForm>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(form) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let prediction = run_prediction(&ctx, &form)?;

    let prediction_id = Uuid::new_v4();
    tracing::info!(
        %prediction_id,
        months = prediction.months,
        warnings = prediction.warnings.len(),
        "Prediction served"
    );

    Ok(Json(PredictResponse {
        prediction_id,
        predicted_months: prediction.months,
        warnings: prediction.warnings,
        predicted_at: chrono::Utc::now().to_rfc3339(),
    }))
}
