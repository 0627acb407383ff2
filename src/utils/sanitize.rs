//! Lossy normalization of extracted document text.
//!
//! Extraction output is noisy (emoji, mixed scripts) while the
//! analysis services expect plain Latin prose. The pipeline below is applied
//! in order; later stages assume the earlier ones already ran.

use std::sync::OnceLock;

use regex::Regex;

/// Common pictographs, miscellaneous symbols and dingbats.
fn pictographs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[\x{1F300}-\x{1F9FF}\x{2600}-\x{26FF}\x{2700}-\x{27BF}]")
            .expect("valid pictograph pattern")
    })
}

/// Everything outside Basic Latin, Latin-1 Supplement, Latin Extended-A and
/// Latin Extended Additional, plus non-whitespace control characters.
///
/// The bullet glyph is let through so the next stage can turn it into a hyphen.
fn non_latin() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[^\t\n\x0B\x0C\r\x20-\x7E\x{A0}-\x{17F}\x{1E00}-\x{1EFF}\x{2022}]")
            .expect("valid latin pattern")
    })
}

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"))
}

/// Normalize raw extracted text into a clean Latin string.
///
/// Pure and total: the worst case is an empty string. Idempotent.
pub fn sanitize(raw: &str) -> String {
    let text = pictographs().replace_all(raw, "");
    let text = non_latin().replace_all(&text, "");
    let text = text.replace('\u{2022}', "-");
    let text = whitespace_runs().replace_all(&text, " ");
    text.trim().to_string()
}
