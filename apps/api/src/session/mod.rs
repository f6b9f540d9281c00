//! Upload & analysis session — the state machine behind the ATS check flow.
//!
//! ```text
//! Idle -> FileSelected -> Parsing -> Parsed(ok | err)
//!      -> Analyzing(parsing) -> Analyzing(analyzing) -> Analyzing(complete)
//!      -> ResultsShown
//! ```
//!
//! Asynchronous steps hold a [`Ticket`]. `close` and `remove_file` return to
//! `Idle` and invalidate every outstanding ticket, so late completions are discarded
//! rather than applied to a fresh session. In-flight work is not aborted.

pub mod client;
pub mod flow;

use std::path::Path;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::extraction::{is_pdf_mime, ExtractionError, PDF_MIME};
use crate::models::analysis::AnalysisResponse;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Bytes,
}

impl SelectedFile {
    /// Derives the MIME type from the file extension, the way a browser file picker does.
    pub fn from_path(path: &Path, bytes: Bytes) -> Self {
        let mime = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => PDF_MIME,
            Some(ext) if ext.eq_ignore_ascii_case("doc") => "application/msword",
            Some(ext) if ext.eq_ignore_ascii_case("docx") => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Some(ext) if ext.eq_ignore_ascii_case("txt") => "text/plain",
            _ => "application/octet-stream",
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            name,
            mime: mime.to_string(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStage {
    Parsing,
    Analyzing,
    Complete,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    FileSelected {
        file: SelectedFile,
    },
    Parsing {
        file: SelectedFile,
    },
    Parsed {
        file: SelectedFile,
        outcome: Result<String, ExtractionError>,
    },
    Analyzing {
        file: SelectedFile,
        resume_text: String,
        stage: AnalysisStage,
        /// Set once the stage reaches `Complete`.
        result: Option<AnalysisResponse>,
    },
    ResultsShown {
        analysis: AnalysisResponse,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Please upload a PDF file only.")]
    NotPdf { mime: String },

    #[error("Please upload and wait for resume parsing to complete.")]
    NotReady,

    #[error("Another upload or analysis is already in progress")]
    Busy,

    #[error("The session was closed before this step completed")]
    Cancelled,

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("Failed to analyze resume. Please try again.")]
    Analysis(String),
}

/// Proof that an asynchronous step belongs to the current session generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct AtsSession {
    state: SessionState,
    generation: u64,
}

impl Default for AtsSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AtsSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            generation: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    fn ticket(&self) -> Ticket {
        Ticket(self.generation)
    }

    fn check(&self, ticket: Ticket) -> Result<(), SessionError> {
        if ticket.0 == self.generation {
            Ok(())
        } else {
            Err(SessionError::Cancelled)
        }
    }

    /// Accepts a dropped or picked file. Non-PDF files are refused and leave
    /// the state untouched; a new PDF replaces any previous selection.
    pub fn select_file(&mut self, file: SelectedFile) -> Result<(), SessionError> {
        if !is_pdf_mime(&file.mime) {
            return Err(SessionError::NotPdf { mime: file.mime });
        }
        if matches!(
            self.state,
            SessionState::Parsing { .. } | SessionState::Analyzing { .. }
        ) {
            return Err(SessionError::Busy);
        }

        debug!("Selected '{}' ({} bytes)", file.name, file.bytes.len());
        self.state = SessionState::FileSelected { file };
        Ok(())
    }

    /// Moves the selected file into extraction and hands back its bytes.
    pub fn begin_parsing(&mut self) -> Result<(Ticket, Bytes), SessionError> {
        let file = match &self.state {
            SessionState::FileSelected { file } => file.clone(),
            _ => return Err(SessionError::NotReady),
        };
        let bytes = file.bytes.clone();
        self.state = SessionState::Parsing { file };
        Ok((self.ticket(), bytes))
    }

    /// Records the extraction outcome. A failure is kept in the state and
    /// also returned, so the caller can show it inline.
    pub fn finish_parsing(
        &mut self,
        ticket: Ticket,
        outcome: Result<String, ExtractionError>,
    ) -> Result<(), SessionError> {
        self.check(ticket)?;
        let file = match &self.state {
            SessionState::Parsing { file } => file.clone(),
            _ => return Err(SessionError::Cancelled),
        };

        let failure = outcome.as_ref().err().cloned();
        self.state = SessionState::Parsed { file, outcome };
        match failure {
            Some(err) => Err(SessionError::Extraction(err)),
            None => Ok(()),
        }
    }

    /// Drops the current file. Not allowed mid-analysis. An extraction still
    /// running for the dropped file loses its ticket.
    #[allow(dead_code)]
    pub fn remove_file(&mut self) -> Result<(), SessionError> {
        if matches!(self.state, SessionState::Analyzing { .. }) {
            return Err(SessionError::Busy);
        }
        self.generation += 1;
        self.state = SessionState::Idle;
        Ok(())
    }

    /// Starts the analysis. Requires a successful, non-empty extraction.
    pub fn start_analysis(&mut self) -> Result<Ticket, SessionError> {
        let (file, resume_text) = match &self.state {
            SessionState::Parsed {
                file,
                outcome: Ok(text),
            } if !text.is_empty() => (file.clone(), text.clone()),
            _ => return Err(SessionError::NotReady),
        };

        self.state = SessionState::Analyzing {
            file,
            resume_text,
            stage: AnalysisStage::Parsing,
            result: None,
        };
        Ok(self.ticket())
    }

    /// Advances to the network stage and returns the text to submit.
    pub fn enter_analyzing_stage(&mut self, ticket: Ticket) -> Result<String, SessionError> {
        self.check(ticket)?;
        match &mut self.state {
            SessionState::Analyzing {
                resume_text, stage, ..
            } if *stage == AnalysisStage::Parsing => {
                *stage = AnalysisStage::Analyzing;
                Ok(resume_text.clone())
            }
            _ => Err(SessionError::Cancelled),
        }
    }

    /// Records the server's answer. On failure the session falls back to the
    /// parsed state so the user can retry without re-uploading.
    pub fn finish_analysis(
        &mut self,
        ticket: Ticket,
        outcome: Result<AnalysisResponse, String>,
    ) -> Result<(), SessionError> {
        self.check(ticket)?;
        let SessionState::Analyzing {
            file,
            resume_text,
            stage: AnalysisStage::Analyzing,
            ..
        } = &self.state
        else {
            return Err(SessionError::Cancelled);
        };

        match outcome {
            Ok(response) => {
                self.state = SessionState::Analyzing {
                    file: file.clone(),
                    resume_text: resume_text.clone(),
                    stage: AnalysisStage::Complete,
                    result: Some(response),
                };
                Ok(())
            }
            Err(message) => {
                self.state = SessionState::Parsed {
                    file: file.clone(),
                    outcome: Ok(resume_text.clone()),
                };
                Err(SessionError::Analysis(message))
            }
        }
    }

    /// Leaves the completed analysis for the results view.
    pub fn show_results(&mut self, ticket: Ticket) -> Result<AnalysisResponse, SessionError> {
        self.check(ticket)?;
        let analysis = match &self.state {
            SessionState::Analyzing {
                stage: AnalysisStage::Complete,
                result: Some(result),
                ..
            } => result.clone(),
            _ => return Err(SessionError::Cancelled),
        };
        self.state = SessionState::ResultsShown {
            analysis: analysis.clone(),
        };
        Ok(analysis)
    }

    /// Unconditional reset. Outstanding tickets become stale.
    pub fn close(&mut self) {
        self.generation += 1;
        self.state = SessionState::Idle;
    }
}
