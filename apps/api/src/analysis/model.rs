//! Model Client step of the pipeline: one call, then reply shape recovery.

use serde_json::Value;
use tracing::{info, warn};

use super::AnalysisError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{recover_json_region, ModelClient};

/// Sends the prompt once and returns text expected to hold one JSON object.
pub async fn request_analysis(
    client: &dyn ModelClient,
    prompt: &str,
) -> Result<String, AnalysisError> {
    info!("Requesting analysis from model {}", client.model_name());
    let reply = client.generate(prompt, JSON_ONLY_SYSTEM).await?;
    recover_reply(reply)
}

/// Returns the reply as-is when it is strict JSON, otherwise the recovered
/// object region.
pub fn recover_reply(reply: String) -> Result<String, AnalysisError> {
    if reply.trim().is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }

    if serde_json::from_str::<Value>(&reply).is_ok() {
        return Ok(reply);
    }

    match recover_json_region(&reply) {
        Some(region) => {
            warn!(
                "Model reply was not strict JSON; recovered a {}-byte object region",
                region.len()
            );
            Ok(region.to_string())
        }
        None => Err(AnalysisError::UnparsableResponse),
    }
}
