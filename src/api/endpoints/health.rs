//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub model_kind: &'static str,
    pub feature_count: usize,
}

/// `GET /api/health`: liveness plus a summary of the loaded model.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        model_kind: ctx.model.kind(),
        feature_count: ctx.model.layout().width(),
    })
}
