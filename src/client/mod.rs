//! Transport seam between the workflow and the remote verification services.
//!
//! The workflow only depends on [`VerificationBackend`]; [`HttpBackend`] is the
//! production implementation and tests substitute their own.

mod http;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use http::HttpBackend;

use crate::models::{AnalysisKind, DocumentFile};

/// Errors from talking to a remote service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unreadable response body: {0}")]
    Body(String),

    #[error("Invalid client configuration: {0}")]
    Client(String),
}

/// Monotonically increasing id assigned to each analysis request at issue time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An analysis request tagged with the kind and id it was issued under.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub id: RequestId,
    pub kind: AnalysisKind,
    pub text: String,
}

/// JSON body sent to an analysis service.
#[derive(Debug, Serialize)]
pub struct AnalysisPayload<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed: Option<bool>,
}

impl AnalysisRequest {
    /// AI detection always asks for the detailed breakdown; plagiarism sends only the text.
    pub fn payload(&self) -> AnalysisPayload<'_> {
        let detailed = match self.kind {
            AnalysisKind::AiDetection => Some(true),
            AnalysisKind::Plagiarism => None,
        };
        AnalysisPayload {
            text: &self.text,
            detailed,
        }
    }
}

/// Response of the document extraction service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExtractionReply {
    /// Raw extracted text; absent or blank means nothing could be extracted.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub page_count: Option<u32>,
}

/// The three remote collaborators of the workflow.
#[async_trait]
pub trait VerificationBackend: Send + Sync {
    /// Upload a document and return the raw extracted text.
    async fn extract_text(&self, document: &DocumentFile)
        -> Result<ExtractionReply, TransportError>;

    /// Run one analysis and return the raw response body.
    async fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> Result<serde_json::Value, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(kind: AnalysisKind) -> AnalysisRequest {
        AnalysisRequest {
            id: RequestId(7),
            kind,
            text: "The quick brown fox".to_string(),
        }
    }

    #[test]
    fn test_ai_payload_requests_breakdown() {
        let body = serde_json::to_value(request(AnalysisKind::AiDetection).payload()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"text": "The quick brown fox", "detailed": true})
        );
    }

    #[test]
    fn test_plagiarism_payload_is_text_only() {
        let body = serde_json::to_value(request(AnalysisKind::Plagiarism).payload()).unwrap();
        assert_eq!(body, serde_json::json!({"text": "The quick brown fox"}));
    }

    #[test]
    fn test_extraction_reply_fields_optional() {
        let reply: ExtractionReply = serde_json::from_str(r#"{"page_count": 3}"#).unwrap();
        assert_eq!(reply.text, None);
        assert_eq!(reply.page_count, Some(3));
    }

    #[test]
    fn test_timeout_display() {
        let err = TransportError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "Request timed out after 30s");
        assert_eq!(RequestId(4).to_string(), "#4");
    }
}
