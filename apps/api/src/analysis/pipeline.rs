//! Analysis pipeline.
//!
//! Flow: extract PDF text → build prompt → model call → validate reply →
//!       typed result → action plan.
//!
//! Any failure aborts the whole analysis; nothing partial is returned.

use bytes::Bytes;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::action_plan::derive_action_plan;
use super::extract::extract_pdf_text;
use super::model::request_analysis;
use super::models::{Analysis, AnalysisResult};
use super::prompts::build_prompt;
use super::scoring::display_score;
use super::validator::validate;
use super::AnalysisError;
use crate::llm_client::ModelClient;

/// Runs the full pipeline over an uploaded resume PDF.
pub async fn analyze_document(
    model: &dyn ModelClient,
    document: Bytes,
    job_description: &str,
) -> Result<Analysis, AnalysisError> {
    // Checked before extraction so a missing JD never costs a PDF parse.
    if job_description.trim().is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Please provide a job description.".to_string(),
        ));
    }

    info!("Extracting text from {}-byte resume", document.len());
    let resume_text = tokio::task::spawn_blocking(move || extract_pdf_text(&document))
        .await
        .map_err(|e| AnalysisError::Extraction(format!("extraction task failed: {e}")))??;
    info!("Extracted {} characters of resume text", resume_text.len());

    analyze_text(model, &resume_text, job_description).await
}

/// Runs the pipeline from already-extracted resume text.
pub async fn analyze_text(
    model: &dyn ModelClient,
    resume_text: &str,
    job_description: &str,
) -> Result<Analysis, AnalysisError> {
    let prompt = build_prompt(resume_text, job_description)?;

    let reply = request_analysis(model, &prompt).await?;

    let raw = validate(reply.as_str())?;
    let result = AnalysisResult::from_value(&raw);
    let action_plan = derive_action_plan(raw.clone())?;

    info!(
        "Analysis complete: jd_match={} ats_score={} missing_keywords={}",
        display_score(&result.jd_match),
        display_score(&result.ats_score),
        result.missing_keywords.len()
    );

    Ok(Analysis {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        raw,
        result,
        action_plan,
    })
}
