//! MIME type detection for local documents.

use std::path::Path;

/// MIME type of PDF documents.
pub const PDF_MIME: &str = "application/pdf";

/// Detect the MIME type of a file from its content, falling back to the extension.
pub fn detect_mime_type(path: &Path, content: &[u8]) -> String {
    infer::get(content)
        .map(|t| t.mime_type().to_string())
        .unwrap_or_else(|| {
            mime_guess::from_path(path)
                .first_or_octet_stream()
                .to_string()
        })
}

/// Compare MIME types ignoring case and any parameters (`; charset=...`).
pub fn mime_matches(mime: &str, expected: &str) -> bool {
    let essence = mime.split(';').next().unwrap_or("").trim();
    essence.eq_ignore_ascii_case(expected)
}
