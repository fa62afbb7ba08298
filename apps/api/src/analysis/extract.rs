//! Plain text from a resume PDF.
//!
//! Text is extracted per page with `pdf-extract`; blank pages are skipped and
//! the rest joined with single spaces. Scanned (image-only) PDFs have no
//! extractable characters and are rejected.
//!
//! Extraction is CPU-bound: callers run it inside `tokio::task::spawn_blocking`.

use tracing::debug;

use super::AnalysisError;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// True when the bytes carry the PDF header.
pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Extracts the text of every page and joins the non-blank ones.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, AnalysisError> {
    if !looks_like_pdf(bytes) {
        return Err(AnalysisError::Extraction(
            "the uploaded file is not a PDF document".to_string(),
        ));
    }

    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| AnalysisError::Extraction(e.to_string()))?;

    debug!("Extracted text from {} PDF page(s)", pages.len());
    join_pages(pages)
}

/// Joins page texts with single spaces, skipping pages with no text.
pub fn join_pages(pages: Vec<String>) -> Result<String, AnalysisError> {
    if pages.is_empty() {
        return Err(AnalysisError::Extraction("PDF file is empty".to_string()));
    }

    let text = pages
        .into_iter()
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if text.is_empty() {
        return Err(AnalysisError::Extraction(
            "No text could be extracted from the PDF".to_string(),
        ));
    }

    Ok(text)
}
