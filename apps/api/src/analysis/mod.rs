// Resume analysis engine.
// Implements: document extraction, prompt building, model reply recovery,
// result validation, action plan derivation, score rules and the pipeline
// that ties them together. All model calls go through llm_client.

use thiserror::Error;

use crate::llm_client::LlmError;

pub mod action_plan;
pub mod extract;
pub mod handlers;
pub mod model;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod scoring;
pub mod validator;

/// Every way an analysis can fail below the HTTP layer.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Error extracting PDF text: {0}")]
    Extraction(String),

    #[error("Empty response received from the model")]
    EmptyResponse,

    #[error("Could not extract a valid JSON response from the model reply")]
    UnparsableResponse,

    #[error("Model request failed: {0}")]
    Model(LlmError),

    #[error("Malformed JSON: {0}")]
    MalformedJson(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("{field} has no numeric score: '{value}'")]
    ScoreFormat { field: String, value: String },

    #[error("{field} must be between 0-100, got {value}")]
    ScoreRange { field: String, value: String },

    #[error("{0}")]
    Configuration(String),
}

impl AnalysisError {
    /// True for the failures raised by the result validator.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AnalysisError::MalformedJson(_)
                | AnalysisError::MissingField(_)
                | AnalysisError::ScoreFormat { .. }
                | AnalysisError::ScoreRange { .. }
        )
    }
}

impl From<LlmError> for AnalysisError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::EmptyContent => AnalysisError::EmptyResponse,
            other => AnalysisError::Model(other),
        }
    }
}
