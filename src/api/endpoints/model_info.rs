//! Model schema endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;
use crate::features::AlignmentPolicy;

#[derive(Serialize)]
pub struct ModelInfoResponse {
    pub kind: &'static str,
    pub feature_names: Vec<String>,
    pub unmapped_columns: Vec<String>,
    pub policy: AlignmentPolicy,
    pub loaded_at: String,
}

/// `GET /api/model`: training columns the loaded model expects.
pub async fn describe(State(ctx): State<ApiContext>) -> Json<ModelInfoResponse> {
    let layout = ctx.model.layout();
    Json(ModelInfoResponse {
        kind: ctx.model.kind(),
        feature_names: layout.columns().to_vec(),
        unmapped_columns: layout.unmapped_columns().to_vec(),
        policy: ctx.model.policy(),
        loaded_at: ctx.model.loaded_at().to_rfc3339(),
    })
}
