//! Shared, replace-only handle on the session's workflow state.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::models::WorkflowState;

/// Publishes every workflow transition to any number of renderers.
///
/// States are replaced wholesale so a reader never observes a half-updated value.
#[derive(Clone)]
pub struct StateHandle {
    tx: Arc<watch::Sender<WorkflowState>>,
}

impl StateHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(WorkflowState::Idle);
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> WorkflowState {
        self.tx.borrow().clone()
    }

    /// Inspect the current state without cloning it.
    pub fn inspect<R>(&self, f: impl FnOnce(&WorkflowState) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub fn transition(&self, next: WorkflowState) {
        let previous = self.tx.send_replace(next);
        debug!(
            "Workflow {} -> {}",
            previous.name(),
            self.inspect(|s| s.name())
        );
    }

    pub fn subscribe(&self) -> watch::Receiver<WorkflowState> {
        self.tx.subscribe()
    }
}

impl Default for StateHandle {
    fn default() -> Self {
        Self::new()
    }
}
