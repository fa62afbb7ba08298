use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::AnalysisError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("An analysis is already in progress for this session")]
    Busy,

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        AppError::Analysis(AnalysisError::InvalidInput(message.into()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Busy => (StatusCode::CONFLICT, "ANALYSIS_IN_PROGRESS", self.to_string()),
            AppError::Analysis(e) => analysis_error_parts(e),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// Maps a pipeline failure to a single user-facing message.
fn analysis_error_parts(e: &AnalysisError) -> (StatusCode, &'static str, String) {
    if e.is_validation() {
        tracing::error!("Analysis result failed validation: {e}");
        return validation_parts(e);
    }

    match e {
        AnalysisError::InvalidInput(msg) => {
            (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg.clone())
        }
        AnalysisError::Extraction(_) => {
            tracing::warn!("Extraction failed: {e}");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EXTRACTION_ERROR",
                format!("{e}. Check that your PDF contains selectable text."),
            )
        }
        AnalysisError::EmptyResponse | AnalysisError::UnparsableResponse => {
            tracing::error!("Model reply rejected: {e}");
            (
                StatusCode::BAD_GATEWAY,
                "MODEL_RESPONSE_ERROR",
                format!("Analysis failed: {e}. Please try again."),
            )
        }
        AnalysisError::Model(inner) => {
            tracing::error!("Model error: {inner}");
            (
                StatusCode::BAD_GATEWAY,
                "MODEL_ERROR",
                "The analysis service could not be reached. Please try again.".to_string(),
            )
        }
        AnalysisError::Configuration(msg) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "CONFIGURATION_ERROR",
            msg.clone(),
        ),
        AnalysisError::MalformedJson(_)
        | AnalysisError::MissingField(_)
        | AnalysisError::ScoreFormat { .. }
        | AnalysisError::ScoreRange { .. } => validation_parts(e),
    }
}

fn validation_parts(e: &AnalysisError) -> (StatusCode, &'static str, String) {
    (
        StatusCode::BAD_GATEWAY,
        "ANALYSIS_VALIDATION_FAILED",
        format!("Error processing ATS results: {e}"),
    )
}
