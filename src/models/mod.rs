//! Data models for the verification workflow.

mod analysis;
mod document;
mod text;
mod workflow;

pub use analysis::{
    AiBreakdown, AiResult, AiRisk, AnalysisKind, AnalysisResult, Confidence, PlagiarismResult,
    RiskLevel, SimilaritySource, StatisticalFeatures, HIGH_RISK_THRESHOLD, MODERATE_RISK_THRESHOLD,
};
pub use document::{DocumentFile, UploadConstraint, MAX_UPLOAD_BYTES};
pub use text::TextBuffer;
pub use workflow::{Notification, Stage, WorkflowState};
