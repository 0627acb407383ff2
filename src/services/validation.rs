//! Word counting and the submission gate.

/// Hard ceiling on words per submission.
pub const WORD_LIMIT: usize = 2000;

/// Count whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Whether an analysis may be submitted for `text`.
///
/// Requires non-blank text, at most [`WORD_LIMIT`] words and nothing in flight.
pub fn can_submit(text: &str, word_count: usize, busy: bool) -> bool {
    !text.trim().is_empty() && word_count <= WORD_LIMIT && !busy
}

/// How the word gauge should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Within the limit; informational only.
    Info,
    /// Over the limit; submissions are refused.
    Exceeded,
}

/// Current word count against the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordGauge {
    pub count: usize,
    pub limit: usize,
}

impl WordGauge {
    pub fn for_text(text: &str) -> Self {
        Self {
            count: word_count(text),
            limit: WORD_LIMIT,
        }
    }

    pub fn severity(&self) -> Severity {
        if self.count > self.limit {
            Severity::Exceeded
        } else {
            Severity::Info
        }
    }

    pub fn ratio(&self) -> f64 {
        self.count as f64 / self.limit as f64
    }
}

impl std::fmt::Display for WordGauge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} / {} words",
            group_thousands(self.count),
            group_thousands(self.limit)
        )
    }
}

fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::sanitize;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   \n\t "), 0);
        assert_eq!(word_count("The quick brown fox"), 4);
        assert_eq!(word_count("  spaced\n\nout\twords  "), 3);
    }

    #[test]
    fn test_sanitizer_can_remove_tokens() {
        let raw = "Hello \u{1F600} \u{4E16}\u{754C} world";
        assert_eq!(word_count(raw), 4);
        assert_eq!(word_count(&sanitize(raw)), 2);
    }

    #[test]
    fn test_can_submit_gate() {
        assert!(can_submit("some text", 2, false));
        assert!(!can_submit("   ", 0, false));
        assert!(!can_submit("some text", 2, true));

        let at_limit = words(WORD_LIMIT);
        assert!(can_submit(&at_limit, word_count(&at_limit), false));

        let over = words(WORD_LIMIT + 1);
        assert!(!can_submit(&over, word_count(&over), false));
    }

    #[test]
    fn test_gauge_severity_and_display() {
        let gauge = WordGauge::for_text("The quick brown fox");
        assert_eq!(gauge.severity(), Severity::Info);
        assert_eq!(gauge.to_string(), "4 / 2,000 words");

        let over = WordGauge::for_text(&words(2001));
        assert_eq!(over.severity(), Severity::Exceeded);
        assert_eq!(over.to_string(), "2,001 / 2,000 words");
        assert!(over.ratio() > 1.0);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }
}
