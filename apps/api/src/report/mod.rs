pub mod document;
pub mod metrics;
pub mod pdf;
pub mod view;

use chrono::NaiveDateTime;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::models::Analysis;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const JSON_FALLBACK_FILENAME: &str = "ats_analysis.json";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// A rendered download: bytes plus the headers needed to serve them.
#[derive(Debug, Clone)]
pub struct ReportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// `ATS_Analysis_Report_YYYYMMDD_HHMM.pdf`
pub fn report_filename(at: NaiveDateTime) -> String {
    format!("ATS_Analysis_Report_{}.pdf", at.format("%Y%m%d_%H%M"))
}

/// Pretty-printed validated result, as offered when PDF rendering fails.
pub fn json_export(raw: &Value) -> Result<ReportFile, ReportError> {
    let bytes = serde_json::to_vec_pretty(raw)?;
    Ok(ReportFile {
        filename: JSON_FALLBACK_FILENAME.to_string(),
        content_type: JSON_CONTENT_TYPE,
        bytes,
    })
}

/// Renders the printable report for `analysis`, falling back to the JSON
/// export when PDF generation fails.
///
/// Blocking: call from `spawn_blocking`.
pub fn export_report(analysis: &Analysis, at: NaiveDateTime) -> Result<ReportFile, ReportError> {
    let blocks = document::build_report(&analysis.result, Some(&analysis.action_plan), at);

    match pdf::render_pdf(&blocks) {
        Ok(bytes) => {
            info!(analysis_id = %analysis.id, size = bytes.len(), "Rendered PDF report");
            Ok(ReportFile {
                filename: report_filename(at),
                content_type: PDF_CONTENT_TYPE,
                bytes,
            })
        }
        Err(e) => {
            warn!(analysis_id = %analysis.id, error = %e, "PDF report failed, serving JSON export");
            json_export(&analysis.raw)
        }
    }
}
