//! ATS scorer — builds the prompt and relays the model's reply unmodified.

use chrono::{Local, NaiveDate};
use tracing::{info, instrument};

use crate::ats::prompts::build_ats_prompt;
use crate::errors::AppError;
use crate::llm_client::TextGenerator;

pub const RESUME_TEXT_REQUIRED: &str = "Resume text is required";

/// Returns the resume text unchanged, or the validation error the route answers with.
/// Whitespace-only input counts as absent.
pub fn require_resume_text(resume_text: Option<String>) -> Result<String, AppError> {
    match resume_text {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(AppError::Validation(RESUME_TEXT_REQUIRED.to_string())),
    }
}

/// Scores `resume_text` as of `today`. Any generator failure becomes
/// `AppError::Upstream`; there is no retry and no partial result.
#[instrument(skip_all, fields(model = generator.model(), resume_chars = resume_text.len()))]
pub async fn score_resume(
    resume_text: &str,
    generator: &dyn TextGenerator,
    today: NaiveDate,
) -> Result<String, AppError> {
    let prompt = build_ats_prompt(resume_text, today);
    let output = generator
        .generate(&prompt)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    info!("ATS analysis generated ({} chars)", output.len());
    Ok(output)
}

/// The server's local calendar date, which the prompt treats as "today".
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
