//! reqwest implementation of the verification backend.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use tracing::debug;

use super::{AnalysisRequest, ExtractionReply, TransportError, VerificationBackend};
use crate::config::ServiceConfig;
use crate::models::{AnalysisKind, DocumentFile};

/// Longest slice of an error body echoed back in a notification.
const MAX_ERROR_CHARS: usize = 200;

/// HTTP client for the extraction and analysis services.
#[derive(Clone)]
pub struct HttpBackend {
    config: ServiceConfig,
    client: Client,
}

impl HttpBackend {
    /// Create a new backend for the given service configuration.
    pub fn new(config: ServiceConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn analysis_url(&self, kind: AnalysisKind) -> String {
        match kind {
            AnalysisKind::AiDetection => self.config.endpoint(&self.config.ai_detection_path),
            AnalysisKind::Plagiarism => self.config.endpoint(&self.config.plagiarism_path),
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout(self.config.timeout())
        } else {
            TransportError::Connection(e.to_string())
        }
    }

    /// Read a JSON body, turning non-2xx statuses into transport failures.
    async fn read_json(&self, resp: Response) -> Result<serde_json::Value, TransportError> {
        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| TransportError::Body(e.to_string()))
    }
}

/// Prefer the service's `{"error": "..."}` message, else a prefix of the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().chars().take(MAX_ERROR_CHARS).collect())
}

#[async_trait]
impl VerificationBackend for HttpBackend {
    async fn extract_text(
        &self,
        document: &DocumentFile,
    ) -> Result<ExtractionReply, TransportError> {
        let url = self.config.endpoint(&self.config.extract_path);
        let part = Part::bytes(document.content.clone())
            .file_name(document.name.clone())
            .mime_str(&document.mime_type)
            .map_err(|e| TransportError::Client(e.to_string()))?;
        let form = Form::new().part("pdf", part);

        debug!("Uploading {} ({} bytes) to {}", document.name, document.size(), url);
        let start = Instant::now();
        let resp = self
            .authorize(self.client.post(&url).multipart(form))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let body = self.read_json(resp).await?;
        debug!("Extraction responded in {}ms", start.elapsed().as_millis());

        serde_json::from_value(body).map_err(|e| TransportError::Body(e.to_string()))
    }

    async fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> Result<serde_json::Value, TransportError> {
        let url = self.analysis_url(request.kind);

        debug!("Sending {} request {} to {}", request.kind.as_str(), request.id, url);
        let start = Instant::now();
        let resp = self
            .authorize(self.client.post(&url).json(&request.payload()))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let body = self.read_json(resp).await?;
        debug!(
            "{} request {} responded in {}ms",
            request.kind.as_str(),
            request.id,
            start.elapsed().as_millis()
        );
        Ok(body)
    }
}
