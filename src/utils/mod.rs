//! Shared utility functions.
//!
//! - `sanitize`: lossy normalization of extracted text
//! - `mime`: MIME type detection for uploads

mod mime;
mod sanitize;

pub use mime::{detect_mime_type, mime_matches, PDF_MIME};
pub use sanitize::sanitize;
