//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::features::{source_field, AlignError};
use crate::model::{ModelError, PredictError};
use crate::models::{FieldError, ValidationError};

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation failed: {} field(s) rejected", .0.len())]
    Validation(Vec<FieldError>),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the client.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Validation(_) => "Some fields are invalid".to_string(),
            ApiError::BadRequest(detail) => detail.clone(),
            ApiError::Internal(_) => "An internal error occurred".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.public_message();
        let (code, fields) = match self {
            ApiError::Validation(fields) => ("VALIDATION_FAILED", Some(fields)),
            ApiError::BadRequest(_) => ("BAD_REQUEST", None),
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "API internal error");
                ("INTERNAL", None)
            }
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code,
                message,
                fields,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Fields(fields) => ApiError::Validation(fields),
        }
    }
}

impl From<AlignError> for ApiError {
    fn from(err: AlignError) -> Self {
        match err {
            AlignError::Unmatched(columns) => ApiError::Validation(
                columns
                    .iter()
                    .map(|column| {
                        FieldError::new(
                            source_field(column).unwrap_or("features"),
                            format!("is not supported by the loaded model ('{column}')"),
                        )
                    })
                    .collect(),
            ),
        }
    }
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::Alignment(e) => e.into(),
            PredictError::Model(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn validation_returns_422_with_fields() {
        let err = ApiError::Validation(vec![FieldError::new("Age", "must be a number, got 'x'")]);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "VALIDATION_FAILED");
        assert_eq!(json["error"]["fields"][0]["field"], "Age");
        assert_eq!(
            json["error"]["fields"][0]["message"],
            "must be a number, got 'x'"
        );
    }

    #[tokio::test]
    async fn bad_request_returns_400_without_fields() {
        let response = ApiError::BadRequest("Malformed JSON".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert!(json["error"].get("fields").is_none());
    }

    #[tokio::test]
    async fn internal_returns_500() {
        let response = ApiError::Internal("something broke".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        // Internal errors hide details from client
        assert_eq!(json["error"]["message"], "An internal error occurred");
    }

    #[test]
    fn alignment_error_maps_to_form_field() {
        let err: ApiError =
            AlignError::Unmatched(vec!["Cancer_Type_Prostate".into(), "Smoker_Yes".into()]).into();
        match err {
            ApiError::Validation(fields) => {
                assert_eq!(fields[0].field, "Cancer_Type");
                assert!(fields[0].message.contains("Cancer_Type_Prostate"));
                assert_eq!(fields[1].field, "features");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn model_error_is_internal() {
        let err: ApiError = ModelError::NonFinite.into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
