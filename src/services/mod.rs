//! Workflow logic for verifying a piece of text.
//!
//! Nothing in here renders anything; the CLI (or any other surface) drives a
//! [`Session`] and observes its state through watch channels.

pub mod binder;
pub mod dispatcher;
pub mod extraction;
pub mod session;
pub mod state;
pub mod validation;

pub use binder::{bind, BindError};
pub use dispatcher::{execute, AnalysisCompletion, AnalysisDispatcher, AnalysisError, Resolution};
pub use extraction::{ExtractionCoordinator, ExtractionError};
pub use session::Session;
pub use state::StateHandle;
pub use validation::{can_submit, word_count, Severity, WordGauge, WORD_LIMIT};
