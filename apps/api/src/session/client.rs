//! HTTP client for the ATS endpoint, as used by the analysis flow.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::models::analysis::{AnalysisRequest, AnalysisResponse};

pub const ATS_SCORE_PATH: &str = "/api/ats/ats-score";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Whatever answers "score this resume text" for the session flow.
#[async_trait]
pub trait AtsBackend: Send + Sync {
    async fn score(&self, resume_text: &str) -> Result<AnalysisResponse, ClientError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct AtsApiClient {
    client: Client,
    base_url: String,
}

impl AtsApiClient {
    /// No request timeout is set: the server bounds the model call itself.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AtsBackend for AtsApiClient {
    async fn score(&self, resume_text: &str) -> Result<AnalysisResponse, ClientError> {
        let request = AnalysisRequest {
            resume_text: Some(resume_text.to_string()),
        };

        let response = self
            .client
            .post(format!("{}{}", self.base_url, ATS_SCORE_PATH))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}
