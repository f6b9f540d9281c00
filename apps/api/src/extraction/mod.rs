//! PDF text extraction.
//!
//! Produces the plain resume text that the ATS route scores. Runs on the
//! blocking pool because `pdf-extract` is synchronous and CPU-bound.

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

pub const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// The document parsed but carries no text layer (scanned or image-only).
    #[error("No text found in PDF. The PDF might be image-based or corrupted.")]
    NoText,

    /// The document could not be parsed. The cause is kept for logging only.
    #[error("Failed to parse PDF. Please try again with a different file.")]
    Unreadable(String),
}

/// True when `mime` names a PDF. Parameters (`; charset=...`) and case are ignored.
pub fn is_pdf_mime(mime: &str) -> bool {
    mime.split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case(PDF_MIME))
        .unwrap_or(false)
}

/// Extracts the concatenated page text of a PDF held in memory.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
        warn!("PDF parsing error: {e}");
        ExtractionError::Unreadable(e.to_string())
    })?;

    let text = text.trim();
    if text.is_empty() {
        return Err(ExtractionError::NoText);
    }

    debug!("Extracted {} characters of resume text", text.len());
    Ok(text.to_string())
}

/// Runs [`extract_pdf_text`] on the blocking pool.
/// A panic inside the PDF library surfaces as `Unreadable` instead of tearing down the caller.
pub async fn extract_in_background(bytes: Bytes) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
        .await
        .unwrap_or_else(|join_err| {
            warn!("PDF extraction task failed: {join_err}");
            Err(ExtractionError::Unreadable(join_err.to_string()))
        })
}
