use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
/// Requests share nothing mutable; each ATS call is independent.
#[derive(Clone)]
pub struct AppState {
    /// Model gateway. `GeminiClient` in production, swapped for a mock in tests.
    pub generator: Arc<dyn TextGenerator>,
    pub config: Config,
}
