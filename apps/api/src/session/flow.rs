//! Async drivers that walk an [`AtsSession`] through extraction and analysis.
//!
//! The session sits behind a `tokio::sync::Mutex` that is never held across
//! an await on I/O or a timer, so `close` can run while a step is in flight.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::extraction::extract_in_background;
use crate::models::analysis::AnalysisResponse;
use crate::session::client::AtsBackend;
use crate::session::{AtsSession, SessionError};

pub type SharedSession = Arc<Mutex<AtsSession>>;

/// Cosmetic delays between stages. They carry no semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Before leaving the "parsing" stage of the analysis.
    pub parse_delay: Duration,
    /// Between a completed analysis and showing the results.
    pub reveal_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            parse_delay: Duration::from_millis(1500),
            reveal_delay: Duration::from_millis(1000),
        }
    }
}

impl Pacing {
    pub fn immediate() -> Self {
        Self {
            parse_delay: Duration::ZERO,
            reveal_delay: Duration::ZERO,
        }
    }
}

pub fn new_session() -> SharedSession {
    Arc::new(Mutex::new(AtsSession::new()))
}

/// Extracts the selected file's text and records the outcome in the session.
pub async fn extract_selected(session: &SharedSession) -> Result<(), SessionError> {
    let (ticket, bytes) = session.lock().await.begin_parsing()?;
    debug!("Extracting {} bytes of PDF", bytes.len());

    let outcome = extract_in_background(bytes).await;
    session.lock().await.finish_parsing(ticket, outcome)
}

/// Runs one analysis end to end and returns the response once it is shown.
/// Returns `SessionError::Cancelled` if the session was closed meanwhile.
pub async fn run_analysis(
    session: &SharedSession,
    backend: &dyn AtsBackend,
    pacing: Pacing,
) -> Result<AnalysisResponse, SessionError> {
    let ticket = session.lock().await.start_analysis()?;

    tokio::time::sleep(pacing.parse_delay).await;
    let resume_text = session.lock().await.enter_analyzing_stage(ticket)?;

    info!("Submitting {} characters for ATS analysis", resume_text.len());
    let outcome = backend
        .score(&resume_text)
        .await
        .map_err(|e| e.to_string());
    session.lock().await.finish_analysis(ticket, outcome)?;

    tokio::time::sleep(pacing.reveal_delay).await;
    session.lock().await.show_results(ticket)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::testing::text_pdf;
    use crate::extraction::{ExtractionError, PDF_MIME};
    use crate::session::client::ClientError;
    use crate::session::{AnalysisStage, SelectedFile, SessionState};
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubBackend {
        reply: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl StubBackend {
        fn new(reply: Option<&'static str>) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AtsBackend for StubBackend {
        async fn score(&self, _resume_text: &str) -> Result<AnalysisResponse, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Some(text) => Ok(AnalysisResponse {
                    result: text.to_string(),
                }),
                None => Err(ClientError::Api {
                    status: 500,
                    message: "Failed to generate ATS score.".into(),
                }),
            }
        }
    }

    async fn parsed_session(text: &str) -> SharedSession {
        let session = new_session();
        {
            let mut guard = session.lock().await;
            guard
                .select_file(SelectedFile {
                    name: "resume.pdf".into(),
                    mime: PDF_MIME.into(),
                    bytes: Bytes::from_static(b"%PDF-1.7"),
                })
                .unwrap();
            let (ticket, _) = guard.begin_parsing().unwrap();
            guard.finish_parsing(ticket, Ok(text.to_string())).unwrap();
        }
        session
    }

    #[tokio::test]
    async fn test_extract_selected_enables_analysis() {
        let session = new_session();
        session
            .lock()
            .await
            .select_file(SelectedFile {
                name: "resume.pdf".into(),
                mime: PDF_MIME.into(),
                bytes: Bytes::from(text_pdf("Jane Doe")),
            })
            .unwrap();

        extract_selected(&session).await.unwrap();
        let backend = StubBackend::new(Some("ATS Score: 70/100"));
        let response = run_analysis(&session, &backend, Pacing::immediate())
            .await
            .unwrap();
        assert_eq!(response.result, "ATS Score: 70/100");
    }

    #[tokio::test]
    async fn test_extract_selected_records_failure() {
        let session = new_session();
        session
            .lock()
            .await
            .select_file(SelectedFile {
                name: "scan.pdf".into(),
                mime: PDF_MIME.into(),
                bytes: Bytes::from_static(b"not a pdf at all"),
            })
            .unwrap();

        let err = extract_selected(&session).await.unwrap_err();
        assert!(matches!(err, SessionError::Extraction(ExtractionError::Unreadable(_))));
        assert!(matches!(
            session.lock().await.state(),
            SessionState::Parsed { outcome: Err(_), .. }
        ));
    }

    #[tokio::test]
    async fn test_run_analysis_immediate() {
        let session = parsed_session("Jane Doe").await;
        let backend = StubBackend::new(Some("ATS Score: 77/100"));
        let response = run_analysis(&session, &backend, Pacing::immediate())
            .await
            .unwrap();
        assert_eq!(response.result, "ATS Score: 77/100");
        assert!(matches!(
            session.lock().await.state(),
            SessionState::ResultsShown { .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_stages() {
        let session = parsed_session("Jane Doe").await;
        let backend = Arc::new(StubBackend::new(Some("ATS Score: 77/100")));

        let task = {
            let session = session.clone();
            let backend = backend.clone();
            tokio::spawn(async move { run_analysis(&session, backend.as_ref(), Pacing::default()).await })
        };

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(matches!(
            session.lock().await.state(),
            SessionState::Analyzing { stage: AnalysisStage::Parsing, .. }
        ));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(matches!(
            session.lock().await.state(),
            SessionState::Analyzing { stage: AnalysisStage::Complete, .. }
        ));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);

        let response = task.await.unwrap().unwrap();
        assert_eq!(response.result, "ATS Score: 77/100");
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_during_pacing_discards_analysis() {
        let session = parsed_session("Jane Doe").await;
        let backend = Arc::new(StubBackend::new(Some("ATS Score: 77/100")));

        let task = {
            let session = session.clone();
            let backend = backend.clone();
            tokio::spawn(async move { run_analysis(&session, backend.as_ref(), Pacing::default()).await })
        };

        tokio::time::sleep(Duration::from_millis(500)).await;
        session.lock().await.close();

        assert_eq!(task.await.unwrap(), Err(SessionError::Cancelled));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert_eq!(session.lock().await.state(), &SessionState::Idle);
    }

    #[tokio::test]
    async fn test_backend_failure_returns_to_parsed() {
        let session = parsed_session("Jane Doe").await;
        let backend = StubBackend::new(None);
        let err = run_analysis(&session, &backend, Pacing::immediate())
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Analysis(_)));
        assert!(matches!(
            session.lock().await.state(),
            SessionState::Parsed { outcome: Ok(_), .. }
        ));
    }
}
