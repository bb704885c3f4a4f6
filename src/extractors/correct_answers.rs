//! Correct-answer detection
//!
//! Pages mark correct answers in one of two markup families: a class on the
//! answer item itself, or a separate reveal region holding either a community
//! vote bar ("AC 94%") or a `correct-answer` span. Strategies run in a fixed
//! order and the first one producing letters wins.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};
use tracing::debug;

use super::sanitize::{sanitize_with, SanitizeMode};
use super::selectors::{select_first, stripped_text, CardSelectors};
use crate::exam::letter_index;

static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,\s]+").unwrap());
static CONCATENATED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{2,}$").unwrap());

/// A correct-answer detection approach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Answer items carrying a correctness class
    ClassMarker,
    /// Vote bar or correct-answer span inside the reveal region
    RevealMarkup,
}

impl Strategy {
    /// Precedence order
    pub const ALL: [Strategy; 2] = [Strategy::ClassMarker, Strategy::RevealMarkup];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::ClassMarker => "class-marker",
            Strategy::RevealMarkup => "reveal-markup",
        }
    }

    /// Raw letters suggested by this strategy, not yet range-checked
    pub fn detect(self, card: ElementRef<'_>, selectors: &CardSelectors, mode: SanitizeMode) -> Vec<char> {
        match self {
            Strategy::ClassMarker => detect_class_marker(card, selectors),
            Strategy::RevealMarkup => detect_reveal_markup(card, selectors, mode),
        }
    }
}

/// Letters of the correct answers of `card`.
///
/// Letters without a matching answer item are discarded. An empty set means
/// nothing was detectable, which is not an error.
pub fn resolve_correct_answers(
    card: ElementRef<'_>,
    selectors: &CardSelectors,
    mode: SanitizeMode,
) -> BTreeSet<char> {
    let answer_count = card.select(&selectors.answer_item).count();

    for strategy in Strategy::ALL {
        let letters: BTreeSet<char> = strategy
            .detect(card, selectors, mode)
            .into_iter()
            .filter(|letter| {
                let in_range = letter_index(*letter).is_some_and(|i| i < answer_count);
                if !in_range {
                    debug!(%letter, answer_count, strategy = strategy.name(), "discarding out-of-range letter");
                }
                in_range
            })
            .collect();

        if !letters.is_empty() {
            debug!(strategy = strategy.name(), ?letters, "correct answers detected");
            return letters;
        }
    }

    BTreeSet::new()
}

fn detect_class_marker(card: ElementRef<'_>, selectors: &CardSelectors) -> Vec<char> {
    let marker = selectors.correct_class_marker.as_str();
    if marker.is_empty() {
        return Vec::new();
    }

    card.select(&selectors.answer_item)
        .filter(|item| item.value().classes().any(|class| class.contains(marker)))
        .filter_map(|item| leading_letter(&stripped_text(item)))
        .collect()
}

/// "D. D. Configure ..." -> 'D'
fn leading_letter(text: &str) -> Option<char> {
    let (head, _) = text.split_once('.')?;
    single_letter(head)
}

fn single_letter(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_uppercase() => Some(c),
        _ => None,
    }
}

fn detect_reveal_markup(card: ElementRef<'_>, selectors: &CardSelectors, mode: SanitizeMode) -> Vec<char> {
    let Some(reveal) = select_first(card, &selectors.answer_reveal) else {
        return Vec::new();
    };

    let combined = if let Some(bar) = find_in_reveal(reveal, &selectors.vote_bar) {
        // "AC 94%" -> "AC"
        let raw = sanitize_with(&bar.text().collect::<String>(), mode);
        raw.split_whitespace().next().unwrap_or_default().to_string()
    } else if let Some(span) = find_in_reveal(reveal, &selectors.correct_answer_span) {
        sanitize_with(&span.text().collect::<String>(), mode)
    } else {
        return Vec::new();
    };

    split_letters(&combined)
}

/// Search the reveal node, then the elements split out of it.
///
/// The HTML parser closes a `<p>` reveal paragraph before any block child
/// (the vote bar `<div>`), moving that child out to a following sibling. The
/// split content ends at the next `<p>`, which is either the empty element
/// left by the stray `</p>` or unrelated content.
fn find_in_reveal<'a>(reveal: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    select_first(reveal, selector).or_else(|| {
        reveal
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .take_while(|sibling| sibling.value().name() != "p")
            .find_map(|sibling| {
                if selector.matches(&sibling) {
                    Some(sibling)
                } else {
                    select_first(sibling, selector)
                }
            })
    })
}

/// Split a combined answer string ("AC", "A, C", "b d") into letters
pub fn split_letters(combined: &str) -> Vec<char> {
    let tokens: Vec<String> = SEPARATOR_RE
        .split(combined)
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect();

    if let [only] = tokens.as_slice() {
        if CONCATENATED_RE.is_match(only) {
            return only.chars().collect();
        }
    }

    tokens.iter().filter_map(|t| single_letter(t)).collect()
}
