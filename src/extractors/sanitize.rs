//! Text sanitizing for extracted fragments
//!
//! Removes "most voted" annotations so a card never hints at the community
//! answer, collapses whitespace and, in ASCII mode, drops non-portable
//! characters.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static MOST_VOTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bmost\s+voted\b").unwrap());
static WHITESPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

/// How non-ASCII characters are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SanitizeMode {
    /// Drop every non-ASCII character (no transliteration)
    #[default]
    Ascii,
    /// Keep all characters
    Unicode,
}

/// Sanitize with the default ASCII mode
pub fn sanitize(raw: &str) -> String {
    sanitize_with(raw, SanitizeMode::Ascii)
}

/// Sanitize a raw text fragment
pub fn sanitize_with(raw: &str, mode: SanitizeMode) -> String {
    if raw.is_empty() {
        return String::new();
    }

    // Filter first so dropped characters can neither hide a word boundary
    // nor leave a double space behind.
    let portable: String = match mode {
        SanitizeMode::Ascii => raw.chars().filter(char::is_ascii).collect(),
        SanitizeMode::Unicode => raw.to_string(),
    };

    let without_votes = MOST_VOTED_RE.replace_all(portable.trim(), "");
    WHITESPACE_RUN_RE
        .replace_all(&without_votes, " ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_removes_most_voted() {
        assert_eq!(sanitize("B. Use Amazon SQS Most Voted"), "B. Use Amazon SQS");
        assert_eq!(sanitize("MOST   VOTED A. Enable MFA"), "A. Enable MFA");
        assert_eq!(sanitize("most\nvoted"), "");

        let cleaned = sanitize("C. Rotate keys mOsT vOtEd daily");
        assert!(!cleaned.to_lowercase().contains("most voted"));
        assert_eq!(cleaned, "C. Rotate keys daily");
    }

    #[test]
    fn test_sanitize_keeps_partial_words() {
        assert_eq!(sanitize("almost voted mostly"), "almost voted mostly");
    }

    #[test]
    fn test_sanitize_collapses_whitespace() {
        assert_eq!(sanitize("  A company   has\n\t an app  "), "A company has an app");
        assert_eq!(sanitize("   "), "");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_sanitize_drops_non_ascii() {
        assert_eq!(sanitize("Caf\u{e9} \u{2014} na\u{ef}ve"), "Caf nave");
        assert_eq!(sanitize("Voted \u{2705} most voted\u{e9}"), "Voted");
    }

    #[test]
    fn test_unicode_mode_keeps_characters() {
        assert_eq!(
            sanitize_with("  日本語の  問題 Most Voted ", SanitizeMode::Unicode),
            "日本語の 問題"
        );
    }
}
