//! Prediction router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! The HTML form lives at `/`, the JSON API is nested under `/api/`.
//!
//! Middleware stack (outermost → innermost):
//! 1. Cache-Control: no-store → 2. Access logger

use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the full application router around a loaded model.
pub fn prediction_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/predict", post(endpoints::predict::predict))
        .route("/health", get(endpoints::health::check))
        .route("/model", get(endpoints::model_info::describe));

    Router::new()
        .route(
            "/",
            get(endpoints::form::show).post(endpoints::form::submit),
        )
        .nest("/api", api)
        .with_state(ctx)
        // Middleware stack (innermost first, outermost last):
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        // Predictions are patient-specific; never let a proxy keep them
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}
