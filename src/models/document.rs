//! Uploaded documents and the policy they must satisfy before extraction.

use std::path::Path;

use crate::utils::{detect_mime_type, mime_matches, PDF_MIME};

/// Largest document accepted for extraction (10 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 10_485_760;

/// Immutable upload policy checked before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadConstraint {
    max_bytes: u64,
    allowed_mime_types: &'static [&'static str],
}

impl UploadConstraint {
    pub const fn new() -> Self {
        Self {
            max_bytes: MAX_UPLOAD_BYTES,
            allowed_mime_types: &[PDF_MIME],
        }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn allows_type(&self, mime: &str) -> bool {
        self.allowed_mime_types
            .iter()
            .any(|allowed| mime_matches(mime, allowed))
    }

    pub fn allows_size(&self, size: u64) -> bool {
        size <= self.max_bytes
    }
}

impl Default for UploadConstraint {
    fn default() -> Self {
        Self::new()
    }
}

/// A document selected for text extraction.
#[derive(Debug, Clone)]
pub struct DocumentFile {
    /// File name sent with the multipart upload.
    pub name: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

impl DocumentFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            content,
        }
    }

    /// Read a document from disk, detecting its MIME type.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let content = tokio::fs::read(path).await?;
        let mime_type = detect_mime_type(path, &content);
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document.pdf")
            .to_string();

        Ok(Self {
            name,
            mime_type,
            content,
        })
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}
