//! Document upload round trip and its progress signal.
//!
//! Progress checkpoints: 10 once the document passed the upload constraint,
//! 50 when the request is sent, 80 when the response arrived and 100 once the
//! sanitized text has been committed. A successful run holds 100 briefly before
//! dropping back to 0; a failed run resets to 0 immediately.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::state::StateHandle;
use crate::client::{TransportError, VerificationBackend};
use crate::models::{
    DocumentFile, Notification, Stage, TextBuffer, UploadConstraint, WorkflowState,
};
use crate::utils::sanitize;

/// Errors that can occur while extracting text from a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0} (only PDF documents are accepted)")]
    UnsupportedType(String),

    #[error("File too large: {size} bytes (maximum is {max} bytes)")]
    TooLarge { size: u64, max: u64 },

    #[error("{0}")]
    TransportFailure(#[from] TransportError),

    #[error("Could not extract text from the document")]
    NoText,

    #[error("Another operation is still in progress")]
    Busy,
}

impl ExtractionError {
    /// The user-facing notification for this failure.
    pub fn notification(&self) -> Notification {
        Notification {
            stage: Stage::Extraction,
            message: self.to_string(),
        }
    }
}

/// Runs one extraction at a time and commits its result to the text buffer.
pub struct ExtractionCoordinator<B: ?Sized> {
    backend: Arc<B>,
    constraint: UploadConstraint,
    state: StateHandle,
    progress: Arc<watch::Sender<u8>>,
    /// Bumped per extraction so a pending reset never clears a newer run.
    generation: Arc<AtomicU64>,
    hold: Duration,
    timeout: Duration,
}

impl<B: VerificationBackend + ?Sized + 'static> ExtractionCoordinator<B> {
    pub fn new(backend: Arc<B>, state: StateHandle, hold: Duration, timeout: Duration) -> Self {
        let (progress, _rx) = watch::channel(0);
        Self {
            backend,
            constraint: UploadConstraint::default(),
            state,
            progress: Arc::new(progress),
            generation: Arc::new(AtomicU64::new(0)),
            hold,
            timeout,
        }
    }

    /// Observe the progress indicator (0 means hidden).
    pub fn progress(&self) -> watch::Receiver<u8> {
        self.progress.subscribe()
    }

    /// Check the upload constraint. No side effects.
    pub fn check(&self, document: &DocumentFile) -> Result<(), ExtractionError> {
        if !self.constraint.allows_type(&document.mime_type) {
            return Err(ExtractionError::UnsupportedType(document.mime_type.clone()));
        }
        if !self.constraint.allows_size(document.size()) {
            return Err(ExtractionError::TooLarge {
                size: document.size(),
                max: self.constraint.max_bytes(),
            });
        }
        Ok(())
    }

    /// Extract, sanitize and commit the text of `document` into `buffer`.
    ///
    /// The buffer is only touched on success.
    pub async fn extract(
        &self,
        document: &DocumentFile,
        buffer: &mut TextBuffer,
    ) -> Result<String, ExtractionError> {
        if let Err(e) = self.check(document) {
            warn!("Rejected {}: {}", document.name, e);
            return Err(e);
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.report(10);

        match self.fetch(document).await {
            Ok(text) => {
                buffer.replace(text.clone());
                self.report(100);
                // Let subscribers render the finished bar before settling.
                tokio::task::yield_now().await;
                self.state.transition(WorkflowState::Idle);
                self.schedule_reset(generation);
                info!(
                    "Extracted {} characters from {}",
                    text.len(),
                    document.name
                );
                Ok(text)
            }
            Err(e) => {
                self.progress.send_replace(0);
                self.state.transition(WorkflowState::Idle);
                warn!("Extraction of {} failed: {}", document.name, e);
                Err(e)
            }
        }
    }

    async fn fetch(&self, document: &DocumentFile) -> Result<String, ExtractionError> {
        self.report(50);
        let reply = tokio::time::timeout(self.timeout, self.backend.extract_text(document))
            .await
            .map_err(|_| TransportError::Timeout(self.timeout))??;
        self.report(80);

        self.state.transition(WorkflowState::Validating);
        if let Some(pages) = reply.page_count {
            debug!("{} has {} pages", document.name, pages);
        }
        let raw = reply.text.unwrap_or_default();
        let text = sanitize(&raw);
        if text.is_empty() {
            return Err(ExtractionError::NoText);
        }
        Ok(text)
    }

    fn report(&self, progress: u8) {
        self.progress.send_replace(progress);
        self.state
            .transition(WorkflowState::Extracting { progress });
    }

    fn schedule_reset(&self, generation: u64) {
        let progress = Arc::clone(&self.progress);
        let current = Arc::clone(&self.generation);
        let hold = self.hold;
        tokio::spawn(async move {
            tokio::time::sleep(hold).await;
            if current.load(Ordering::SeqCst) == generation {
                progress.send_replace(0);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{AnalysisRequest, ExtractionReply};
    use crate::models::MAX_UPLOAD_BYTES;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    struct FixedExtractor {
        reply: Result<ExtractionReply, TransportError>,
        calls: AtomicUsize,
    }

    impl FixedExtractor {
        fn new(reply: Result<ExtractionReply, TransportError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
            })
        }

        fn text(text: &str) -> Arc<Self> {
            Self::new(Ok(ExtractionReply {
                text: Some(text.to_string()),
                page_count: Some(1),
            }))
        }
    }

    #[async_trait]
    impl VerificationBackend for FixedExtractor {
        async fn extract_text(
            &self,
            _document: &DocumentFile,
        ) -> Result<ExtractionReply, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }

        async fn analyze(
            &self,
            _request: &AnalysisRequest,
        ) -> Result<serde_json::Value, TransportError> {
            unreachable!("extraction tests never analyze")
        }
    }

    fn coordinator(backend: Arc<FixedExtractor>) -> ExtractionCoordinator<FixedExtractor> {
        ExtractionCoordinator::new(
            backend,
            StateHandle::new(),
            Duration::from_secs(1),
            Duration::from_secs(30),
        )
    }

    fn pdf(size: usize) -> DocumentFile {
        DocumentFile::new("paper.pdf", "application/pdf", vec![b'x'; size])
    }

    #[tokio::test]
    async fn test_rejects_non_pdf_without_network() {
        let backend = FixedExtractor::text("unused");
        let coordinator = coordinator(backend.clone());
        let mut buffer = TextBuffer::from("keep me");

        let doc = DocumentFile::new("notes.txt", "text/plain", b"hello".to_vec());
        let err = coordinator.extract(&doc, &mut buffer).await.unwrap_err();

        assert_eq!(err, ExtractionError::UnsupportedType("text/plain".to_string()));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert_eq!(buffer.as_str(), "keep me");
        assert_eq!(*coordinator.progress().borrow(), 0);
    }

    #[tokio::test]
    async fn test_rejects_oversized_without_network() {
        let backend = FixedExtractor::text("unused");
        let coordinator = coordinator(backend.clone());
        let mut buffer = TextBuffer::new();

        let err = coordinator
            .extract(&pdf(15 * 1024 * 1024), &mut buffer)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ExtractionError::TooLarge {
                size: 15 * 1024 * 1024,
                max: MAX_UPLOAD_BYTES
            }
        );
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_commits_sanitized_text_and_holds_progress() {
        let backend = FixedExtractor::text("\u{2022} Intro\u{1F4C4}\n\nBody   text");
        let coordinator = coordinator(backend.clone());
        let progress = coordinator.progress();
        let mut buffer = TextBuffer::new();

        let text = coordinator.extract(&pdf(64), &mut buffer).await.unwrap();

        assert_eq!(text, "- Intro Body text");
        assert_eq!(buffer.as_str(), "- Intro Body text");
        assert_eq!(*progress.borrow(), 100);
        assert_eq!(coordinator.state.current(), WorkflowState::Idle);

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(*progress.borrow(), 0);
    }

    #[tokio::test]
    async fn test_success_publishes_full_progress_before_idle() {
        let backend = FixedExtractor::text("Some body text");
        let coordinator = coordinator(backend);
        let mut states = coordinator.state.subscribe();
        let collector = tokio::spawn(async move {
            let mut seen = Vec::new();
            while states.changed().await.is_ok() {
                let state = states.borrow_and_update().clone();
                let done = state == WorkflowState::Idle;
                seen.push(state);
                if done {
                    break;
                }
            }
            seen
        });

        let mut buffer = TextBuffer::new();
        coordinator.extract(&pdf(10), &mut buffer).await.unwrap();
        let seen = collector.await.unwrap();

        assert_eq!(
            seen[seen.len() - 2..],
            [WorkflowState::Extracting { progress: 100 }, WorkflowState::Idle]
        );
    }

    #[tokio::test]
    async fn test_no_text_leaves_buffer_unchanged() {
        for reply in [
            ExtractionReply::default(),
            ExtractionReply {
                text: Some("   ".to_string()),
                page_count: Some(2),
            },
            ExtractionReply {
                text: Some("\u{4E2D}\u{6587}".to_string()),
                page_count: Some(1),
            },
        ] {
            let backend = FixedExtractor::new(Ok(reply));
            let coordinator = coordinator(backend);
            let mut buffer = TextBuffer::from("previous text");

            let err = coordinator.extract(&pdf(10), &mut buffer).await.unwrap_err();
            assert_eq!(err, ExtractionError::NoText);
            assert_eq!(buffer.as_str(), "previous text");
            assert_eq!(*coordinator.progress().borrow(), 0);
        }
    }

    #[tokio::test]
    async fn test_transport_failure_resets_progress() {
        let backend = FixedExtractor::new(Err(TransportError::Status {
            status: 500,
            message: "Error processing PDF".to_string(),
        }));
        let coordinator = coordinator(backend.clone());
        let mut buffer = TextBuffer::from("untouched");

        let err = coordinator.extract(&pdf(10), &mut buffer).await.unwrap_err();
        assert!(matches!(err, ExtractionError::TransportFailure(_)));
        assert_eq!(
            err.notification().to_string(),
            "Document extraction failed: HTTP 500: Error processing PDF"
        );
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert_eq!(buffer.as_str(), "untouched");
        assert_eq!(*coordinator.progress().borrow(), 0);
        assert_eq!(coordinator.state.current(), WorkflowState::Idle);
    }
}
