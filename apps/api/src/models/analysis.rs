use serde::{Deserialize, Serialize};

/// Body of `POST /api/ats/ats-score`. `resumeText` is optional on the wire so
/// that a missing field is reported as a validation error, not a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(default)]
    pub resume_text: Option<String>,
}

/// The model's reply, relayed verbatim. No structure is guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub result: String,
}

/// One issue or suggestion recovered from the model's reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisItem {
    pub title: String,
    pub description: String,
}

/// Structure scraped out of an [`AnalysisResponse`]. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAnalysis {
    /// Expected in 0..=100 but not enforced; 0 when no score line was found.
    pub score: u32,
    pub issues: Vec<AnalysisItem>,
    pub suggestions: Vec<AnalysisItem>,
}
