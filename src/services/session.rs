//! One user session: the text buffer plus the extraction and analysis workflows.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::dispatcher::{execute, AnalysisCompletion, AnalysisDispatcher, Resolution};
use super::extraction::{ExtractionCoordinator, ExtractionError};
use super::state::StateHandle;
use super::validation::{can_submit, WordGauge};
use crate::client::{AnalysisRequest, TransportError, VerificationBackend};
use crate::config::Config;
use crate::models::{AnalysisKind, DocumentFile, TextBuffer, WorkflowState};

/// Controller tying the workflow components to a single text buffer.
pub struct Session<B: ?Sized> {
    backend: Arc<B>,
    buffer: TextBuffer,
    state: StateHandle,
    dispatcher: AnalysisDispatcher,
    extraction: ExtractionCoordinator<B>,
    timeout: Duration,
}

impl<B: VerificationBackend + ?Sized + 'static> Session<B> {
    pub fn new(backend: Arc<B>, config: &Config) -> Self {
        Self::with_timings(
            backend,
            config.service.timeout(),
            config.session.progress_hold(),
        )
    }

    pub fn with_timings(backend: Arc<B>, timeout: Duration, progress_hold: Duration) -> Self {
        let state = StateHandle::new();
        Self {
            extraction: ExtractionCoordinator::new(
                Arc::clone(&backend),
                state.clone(),
                progress_hold,
                timeout,
            ),
            dispatcher: AnalysisDispatcher::new(state.clone()),
            backend,
            buffer: TextBuffer::new(),
            state,
            timeout,
        }
    }

    pub fn text(&self) -> &str {
        self.buffer.as_str()
    }

    /// Replace the text buffer. Refused while an operation is in flight.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        if self.state.inspect(|s| s.is_busy()) {
            debug!("Text edit refused while {}", self.state.inspect(|s| s.name()));
            return false;
        }
        self.buffer.replace(text);
        true
    }

    pub fn word_gauge(&self) -> WordGauge {
        WordGauge::for_text(self.buffer.as_str())
    }

    /// Whether an analysis may be started right now.
    pub fn can_submit(&self) -> bool {
        let gauge = self.word_gauge();
        can_submit(
            self.buffer.as_str(),
            gauge.count,
            self.state.inspect(|s| s.is_busy()),
        )
    }

    pub fn state(&self) -> WorkflowState {
        self.state.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<WorkflowState> {
        self.state.subscribe()
    }

    /// Extraction progress; 0 means the indicator is hidden.
    pub fn progress(&self) -> watch::Receiver<u8> {
        self.extraction.progress()
    }

    /// Extract the text of `document` into the buffer.
    pub async fn upload(&mut self, document: &DocumentFile) -> Result<String, ExtractionError> {
        if self.state.inspect(|s| s.is_busy()) {
            let err = ExtractionError::Busy;
            warn!("{}", err.notification());
            return Err(err);
        }
        self.extraction.extract(document, &mut self.buffer).await
    }

    /// Issue an analysis of the current text, or `None` if the gate refuses.
    pub fn start_analysis(&mut self, kind: AnalysisKind) -> Option<AnalysisRequest> {
        self.dispatcher.start(kind, self.buffer.as_str())
    }

    /// Run `request` on the runtime, bounded by the session timeout.
    pub fn execute(&self, request: AnalysisRequest) -> JoinHandle<AnalysisCompletion> {
        tokio::spawn(execute(Arc::clone(&self.backend), request, self.timeout))
    }

    pub fn resolve(&mut self, completion: AnalysisCompletion) -> Resolution {
        self.dispatcher.resolve(completion)
    }

    /// Start, execute and resolve one analysis. `None` if the gate refused.
    pub async fn run_analysis(&mut self, kind: AnalysisKind) -> Option<Resolution> {
        let request = self.start_analysis(kind)?;
        let (request_id, kind) = (request.id, request.kind);

        let completion = match self.execute(request).await {
            Ok(completion) => completion,
            Err(e) => AnalysisCompletion {
                request_id,
                kind,
                outcome: Err(TransportError::Connection(format!(
                    "analysis task failed: {}",
                    e
                ))),
            },
        };
        Some(self.resolve(completion))
    }

    /// Stop waiting for the in-flight analysis.
    pub fn abandon(&mut self) -> bool {
        self.dispatcher.abandon()
    }
}
