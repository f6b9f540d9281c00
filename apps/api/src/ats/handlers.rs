//! Axum route handlers for the ATS API.

use axum::{
    extract::{
        multipart::{Multipart, MultipartError, MultipartRejection},
        rejection::JsonRejection,
        State,
    },
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::ats::report::AtsReport;
use crate::ats::scorer::{require_resume_text, score_resume, today, RESUME_TEXT_REQUIRED};
use crate::ats::scraper::parse_ats_result;
use crate::errors::AppError;
use crate::extraction::{extract_in_background, is_pdf_mime};
use crate::models::analysis::{AnalysisRequest, AnalysisResponse, ParsedAnalysis};
use crate::state::AppState;

/// Multipart field carrying the uploaded resume.
pub const RESUME_FIELD: &str = "resume";
pub const PDF_ONLY_MESSAGE: &str = "Please upload a PDF file only.";

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AtsReportResponse {
    pub result: String,
    pub analysis: ParsedAnalysis,
    pub report: AtsReport,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub resume_text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/ats/ats-score
///
/// Relays the model's reply as `{ result }`. Never parses it.
pub async fn handle_ats_score(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let resume_text = resume_text_from(payload)?;
    let result = score_resume(&resume_text, state.generator.as_ref(), today()).await?;
    Ok(Json(AnalysisResponse { result }))
}

/// POST /api/ats/ats-report
///
/// Same call as `/ats-score`, with the scraped structure and its
/// presentation summary alongside the raw reply.
pub async fn handle_ats_report(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AtsReportResponse>, AppError> {
    let resume_text = resume_text_from(payload)?;
    let result = score_resume(&resume_text, state.generator.as_ref(), today()).await?;

    let analysis = parse_ats_result(&result);
    let report = AtsReport::from_analysis(&analysis);
    Ok(Json(AtsReportResponse {
        result,
        analysis,
        report,
    }))
}

/// POST /api/ats/extract
///
/// Accepts a `resume` PDF part and returns its text layer. Non-PDF parts are
/// rejected before any extraction is attempted.
pub async fn handle_extract(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractResponse>, AppError> {
    let mut multipart = multipart.map_err(|rejection| {
        warn!("Rejected upload body: {}", rejection.body_text());
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    })?;

    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !is_pdf_mime(&content_type) {
            debug!("Rejected upload with content type '{content_type}'");
            return Err(AppError::UnsupportedMediaType(PDF_ONLY_MESSAGE.to_string()));
        }

        let bytes = field.bytes().await.map_err(upload_error)?;
        let resume_text = extract_in_background(bytes).await?;
        return Ok(Json(ExtractResponse { resume_text }));
    }

    Err(AppError::Validation(format!(
        "A PDF file is required in the '{RESUME_FIELD}' field"
    )))
}

/// Malformed parts stay 400; an upload over the body limit becomes 413.
fn upload_error(err: MultipartError) -> AppError {
    warn!("Failed to read upload: {err}");
    AppError::Rejected {
        status: err.status(),
        message: err.body_text(),
    }
}

/// A body that is not JSON, or whose `resumeText` is not a string, is
/// answered like a missing field. An oversized body keeps its 413.
fn resume_text_from(
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<String, AppError> {
    match payload {
        Ok(Json(request)) => require_resume_text(request.resume_text),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            warn!("Rejected oversized ATS request body: {}", rejection.body_text());
            Err(AppError::Rejected {
                status: StatusCode::PAYLOAD_TOO_LARGE,
                message: rejection.body_text(),
            })
        }
        Err(rejection) => {
            warn!(
                "Rejected ATS request body ({}): {}",
                rejection.status(),
                rejection.body_text()
            );
            Err(AppError::Validation(RESUME_TEXT_REQUIRED.to_string()))
        }
    }
}
