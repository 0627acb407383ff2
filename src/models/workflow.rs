//! Workflow state shared between the session controller and its renderers.

use std::fmt;

use super::analysis::{AnalysisKind, AnalysisResult};

/// Which operation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extraction,
    Analysis(AnalysisKind),
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Extraction => write!(f, "Document extraction"),
            Stage::Analysis(kind) => write!(f, "{}", kind.label()),
        }
    }
}

/// The single authoritative status of a session.
///
/// A new value is published on every transition; nothing mutates a state in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    /// Checking extracted document text before it is committed.
    Validating,
    Extracting {
        progress: u8,
    },
    Analyzing {
        kind: AnalysisKind,
    },
    /// The result variant determines the kind, so the two cannot disagree.
    Complete {
        result: AnalysisResult,
    },
    Failed {
        stage: Stage,
        message: String,
    },
}

impl WorkflowState {
    pub fn is_analyzing(&self) -> bool {
        matches!(self, Self::Analyzing { .. })
    }

    pub fn is_extracting(&self) -> bool {
        matches!(self, Self::Validating | Self::Extracting { .. })
    }

    /// True while any remote operation is outstanding.
    pub fn is_busy(&self) -> bool {
        self.is_analyzing() || self.is_extracting()
    }

    /// The analysis currently selected or in flight, `None` at rest.
    pub fn selected_kind(&self) -> Option<AnalysisKind> {
        match self {
            Self::Analyzing { kind } => Some(*kind),
            Self::Complete { result } => Some(result.kind()),
            Self::Failed {
                stage: Stage::Analysis(kind),
                ..
            } => Some(*kind),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            Self::Complete { result } => Some(result),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Extracting { .. } => "extracting",
            Self::Analyzing { .. } => "analyzing",
            Self::Complete { .. } => "complete",
            Self::Failed { .. } => "failed",
        }
    }
}

/// A user-facing message about one failed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub stage: Stage,
    pub message: String,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.message)
    }
}
