//! Leading answer-label normalization
//!
//! Source pages often repeat the choice letter inside the answer text
//! ("A. A. Create a Lambda function"). The display letter is derived from the
//! answer's position, so any embedded prefix is dropped.

use std::sync::LazyLock;

use regex::Regex;

// Anchored at the start only; "see option A. above" must survive.
static LEADING_LABELS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[A-Z]\.\s+)+").unwrap());

/// Remove one or more leading "X. " labels
pub fn strip_leading_labels(text: &str) -> String {
    LEADING_LABELS_RE.replace(text, "").into_owned()
}
