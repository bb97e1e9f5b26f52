//! HTML form endpoints.
//!
//! - `GET /`: empty form with every dropdown option
//! - `POST /`: re-rendered form with the prediction, or with field errors

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;

use crate::api::endpoints::predict::run_prediction;
use crate::api::error::ApiError;
use crate::api::render::{render_form_page, FormView};
use crate::api::types::ApiContext;
use crate::models::PatientForm;

const INTERNAL_NOTICE: &str = "The prediction could not be computed. Please try again later.";

/// `GET /`: blank prediction form.
pub async fn show() -> Html<String> {
    Html(render_form_page(&FormView::default()))
}

/// `POST /`: predict and re-render the form with the submitted values.
pub async fn submit(State(ctx): State<ApiContext>, Form(form): Form<PatientForm>) -> Response {
    match run_prediction(&ctx, &form) {
        Ok(prediction) => {
            tracing::info!(
                months = prediction.months,
                warnings = prediction.warnings.len(),
                "Form prediction served"
            );
            let html = render_form_page(&FormView {
                form: Some(&form),
                prediction: Some(&prediction),
                ..FormView::default()
            });
            Html(html).into_response()
        }
        Err(ApiError::Validation(errors)) => {
            tracing::debug!(rejected = errors.len(), "Form submission rejected");
            let html = render_form_page(&FormView {
                form: Some(&form),
                errors: &errors,
                ..FormView::default()
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response()
        }
        Err(err) => {
            let status = err.status();
            if status.is_server_error() {
                tracing::error!(error = %err, "Form prediction failed");
            }
            let notice = match err {
                ApiError::Internal(_) => INTERNAL_NOTICE.to_string(),
                other => other.public_message(),
            };
            let html = render_form_page(&FormView {
                form: Some(&form),
                notice: Some(&notice),
                ..FormView::default()
            });
            (status, Html(html)).into_response()
        }
    }
}
