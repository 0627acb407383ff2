//! Single-flight analysis dispatch with stale-response suppression.
//!
//! Every request gets a fresh [`RequestId`]. A response is applied only while
//! the workflow is still analyzing its kind and its id is the latest issued for
//! that kind; anything else is dropped.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};

use super::binder::{bind, BindError};
use super::state::StateHandle;
use super::validation::{can_submit, word_count};
use crate::client::{AnalysisRequest, RequestId, TransportError, VerificationBackend};
use crate::models::{AnalysisKind, AnalysisResult, Notification, Stage, WorkflowState};

/// Errors that end an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("{0}")]
    TransportFailure(#[from] TransportError),

    #[error("Malformed response: field `{0}` missing or invalid")]
    MalformedResponse(String),

    #[error("{0}")]
    Rejected(String),
}

impl From<BindError> for AnalysisError {
    fn from(e: BindError) -> Self {
        match e {
            BindError::MalformedResponse(field) => AnalysisError::MalformedResponse(field),
            BindError::Rejected(message) => AnalysisError::Rejected(message),
        }
    }
}

/// Raw outcome of one executed request, tagged with what it answers.
#[derive(Debug, Clone)]
pub struct AnalysisCompletion {
    pub request_id: RequestId,
    pub kind: AnalysisKind,
    pub outcome: Result<serde_json::Value, TransportError>,
}

/// What happened when a completion was handed back to the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Completed(AnalysisResult),
    Failed(Notification),
    /// Superseded or abandoned; the state was left untouched.
    Stale,
}

/// Perform the network call for `request`, bounded by `limit`.
pub async fn execute<B>(backend: Arc<B>, request: AnalysisRequest, limit: Duration) -> AnalysisCompletion
where
    B: VerificationBackend + ?Sized,
{
    let start = Instant::now();
    let outcome = match tokio::time::timeout(limit, backend.analyze(&request)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(TransportError::Timeout(limit)),
    };
    debug!(
        "{} request {} finished in {}ms",
        request.kind.as_str(),
        request.id,
        start.elapsed().as_millis()
    );

    AnalysisCompletion {
        request_id: request.id,
        kind: request.kind,
        outcome,
    }
}

/// Issues analysis requests and applies their responses to the workflow state.
pub struct AnalysisDispatcher {
    state: StateHandle,
    next_id: u64,
    latest: HashMap<AnalysisKind, RequestId>,
}

impl AnalysisDispatcher {
    pub fn new(state: StateHandle) -> Self {
        Self {
            state,
            next_id: 0,
            latest: HashMap::new(),
        }
    }

    /// Latest id issued for `kind`, if any.
    pub fn latest(&self, kind: AnalysisKind) -> Option<RequestId> {
        self.latest.get(&kind).copied()
    }

    /// Begin an analysis of `text`.
    ///
    /// Returns `None` without side effects when the gate refuses: blank text,
    /// too many words, or another operation in flight. Otherwise the previous
    /// result is discarded and the returned request must be executed.
    pub fn start(&mut self, kind: AnalysisKind, text: &str) -> Option<AnalysisRequest> {
        let busy = self.state.inspect(|s| s.is_busy());
        if busy {
            debug!(
                "Ignoring {} request while {}",
                kind.as_str(),
                self.state.inspect(|s| s.name())
            );
            return None;
        }

        let words = word_count(text);
        if !can_submit(text, words, false) {
            debug!("Refusing {} request for {} words", kind.as_str(), words);
            return None;
        }

        self.next_id += 1;
        let id = RequestId(self.next_id);
        self.latest.insert(kind, id);
        self.state.transition(WorkflowState::Analyzing { kind });
        info!("Starting {} request {} ({} words)", kind.as_str(), id, words);

        Some(AnalysisRequest {
            id,
            kind,
            text: text.to_string(),
        })
    }

    /// Apply a completion if it is still current.
    pub fn resolve(&mut self, completion: AnalysisCompletion) -> Resolution {
        let kind = completion.kind;
        let in_flight = self
            .state
            .inspect(|s| matches!(s, WorkflowState::Analyzing { kind: k } if *k == kind));
        if !in_flight || self.latest(kind) != Some(completion.request_id) {
            debug!(
                "Discarding stale {} response {}",
                kind.as_str(),
                completion.request_id
            );
            return Resolution::Stale;
        }

        let bound = completion
            .outcome
            .map_err(AnalysisError::from)
            .and_then(|body| bind(kind, &body).map_err(AnalysisError::from));

        match bound {
            Ok(result) => {
                info!("{} request {} complete", kind.as_str(), completion.request_id);
                self.state.transition(WorkflowState::Complete {
                    result: result.clone(),
                });
                Resolution::Completed(result)
            }
            Err(e) => {
                let notification = Notification {
                    stage: Stage::Analysis(kind),
                    message: e.to_string(),
                };
                warn!("{}", notification);
                // Observers see the failure; the session then rests at Idle.
                self.state.transition(WorkflowState::Failed {
                    stage: notification.stage,
                    message: notification.message.clone(),
                });
                self.state.transition(WorkflowState::Idle);
                Resolution::Failed(notification)
            }
        }
    }

    /// Stop waiting for the in-flight analysis; its response will be discarded.
    pub fn abandon(&mut self) -> bool {
        let WorkflowState::Analyzing { kind } = self.state.current() else {
            return false;
        };
        info!("Abandoned {} request", kind.as_str());
        self.state.transition(WorkflowState::Idle);
        true
    }
}
