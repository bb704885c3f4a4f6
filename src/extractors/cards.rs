//! Question card parsing
//!
//! Finds every question card in a document and turns it into a [`Card`]:
//! question number, question fragments, answers and correct letters.

use std::path::Path;

use scraper::{ElementRef, Html};
use tracing::{debug, warn};

use super::correct_answers::resolve_correct_answers;
use super::fragments::extract_fragments;
use super::labels::strip_leading_labels;
use super::sanitize::SanitizeMode;
use super::selectors::{select_first, stripped_text, CardSelectors};
use crate::config::ExtractConfig;
use crate::error::Result;
use crate::exam::{Answer, Card, Fragment};

const UNKNOWN_QUESTION_NUMBER: &str = "0";

/// Card parser with its selectors compiled once
#[derive(Debug, Clone)]
pub struct CardParser {
    selectors: CardSelectors,
    mode: SanitizeMode,
}

impl CardParser {
    pub fn new(selectors: CardSelectors, mode: SanitizeMode) -> Self {
        Self { selectors, mode }
    }

    pub fn from_config(config: &ExtractConfig) -> Result<Self> {
        Ok(Self::new(
            CardSelectors::compile(&config.selectors)?,
            config.sanitize_mode,
        ))
    }

    /// All cards of `document` in document order
    pub fn parse_cards(&self, document: &Html, base_path: &Path) -> Vec<Card> {
        document
            .select(&self.selectors.card)
            .map(|card| self.parse_card(card, base_path))
            .collect()
    }

    pub fn parse_card(&self, card: ElementRef<'_>, base_path: &Path) -> Card {
        let question_number = self.question_number(card);

        let question_parts = extract_fragments(
            select_first(card, &self.selectors.question_body),
            base_path,
            self.mode,
        );

        let answers: Vec<Answer> = card
            .select(&self.selectors.answer_item)
            .map(|item| self.parse_answer(item, base_path))
            .collect();

        let correct_answers = resolve_correct_answers(card, &self.selectors, self.mode);
        if correct_answers.is_empty() {
            warn!(question = %question_number, "no correct answer detected");
        }

        debug!(
            question = %question_number,
            parts = question_parts.len(),
            answers = answers.len(),
            "parsed card"
        );

        Card {
            question_number,
            question_parts,
            answers,
            correct_answers,
        }
    }

    /// "Question #29Topic 1" -> "29Topic"
    fn question_number(&self, card: ElementRef<'_>) -> String {
        let Some(header) = select_first(card, &self.selectors.header) else {
            return UNKNOWN_QUESTION_NUMBER.to_string();
        };

        let raw = stripped_text(header);
        let number = match raw.split_whitespace().nth(1) {
            Some(second) => second.trim_start_matches('#').to_string(),
            None => raw,
        };

        if number.is_empty() {
            UNKNOWN_QUESTION_NUMBER.to_string()
        } else {
            number
        }
    }

    /// Answer text is merged into one label-free fragment ahead of any images
    fn parse_answer(&self, item: ElementRef<'_>, base_path: &Path) -> Answer {
        let (texts, images): (Vec<Fragment>, Vec<Fragment>) =
            extract_fragments(Some(item), base_path, self.mode)
                .into_iter()
                .partition(|f| matches!(f, Fragment::Text(_)));

        let joined = texts
            .iter()
            .filter_map(Fragment::as_text)
            .collect::<Vec<_>>()
            .join(" ");
        let text = strip_leading_labels(&joined);

        let mut fragments = Vec::with_capacity(images.len() + 1);
        if !text.is_empty() {
            fragments.push(Fragment::Text(text));
        }
        fragments.extend(images);

        Answer::new(fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn parse(html: &str) -> Vec<Card> {
        let parser = CardParser::from_config(&ExtractConfig::default()).unwrap();
        parser.parse_cards(&Html::parse_document(html), Path::new("pages"))
    }

    fn card_with_header(header: &str) -> String {
        format!(
            r#"<div class="card exam-question-card">
                <div class="card-header text-white bg-primary">{header}</div>
                <div class="card-body"><p class="card-text">Q</p></div>
            </div>"#
        )
    }

    #[test]
    fn test_question_number() {
        let cards = parse(&card_with_header("Question #29Topic 1"));
        assert_eq!(cards[0].question_number, "29Topic");

        let cards = parse(&card_with_header("Question #7 <span>Topic 2</span>"));
        assert_eq!(cards[0].question_number, "7Topic");

        let cards = parse(&card_with_header("Question"));
        assert_eq!(cards[0].question_number, "Question");

        let cards = parse(&card_with_header("Question #"));
        assert_eq!(cards[0].question_number, "0");

        let cards = parse(&card_with_header("   "));
        assert_eq!(cards[0].question_number, "0");
    }

    #[test]
    fn test_missing_header_and_body() {
        let cards = parse(r#"<div class="card exam-question-card"><ul></ul></div>"#);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].question_number, "0");
        assert!(cards[0].question_parts.is_empty());
        assert!(cards[0].answers.is_empty());
        assert!(cards[0].correct_answers.is_empty());
    }

    #[test]
    fn test_answer_text_merged_before_images() {
        let html = r#"
        <div class="card exam-question-card">
            <div class="card-body">
                <p class="card-text">Which diagram is correct?</p>
                <ul>
                    <li class="multi-choice-item">
                        <span class="multi-choice-letter">A.</span>
                        A. <img src="img/a.png"> The first layout
                    </li>
                    <li class="multi-choice-item"><img src="img/b.png"></li>
                </ul>
            </div>
        </div>
        "#;
        let cards = parse(html);
        let answers = &cards[0].answers;

        assert_eq!(
            answers[0].fragments,
            vec![
                Fragment::text("The first layout"),
                Fragment::pending_image("pages/img/a.png"),
            ]
        );
        assert_eq!(answers[1].fragments, vec![Fragment::pending_image("pages/img/b.png")]);
    }

    #[test]
    fn test_question_body_skips_reveal_paragraph() {
        let html = r#"
        <div class="card exam-question-card">
            <div class="card-body">
                <p class="card-text question-answer bg-light white-text">
                    Suggested Answer: <span class="correct-answer">B</span>
                </p>
                <p class="card-text">What is the <b>MOST</b> efficient option?</p>
                <ul>
                    <li class="multi-choice-item">A. A. One</li>
                    <li class="multi-choice-item">B. B. Two Most Voted</li>
                </ul>
            </div>
        </div>
        "#;
        let cards = parse(html);
        let card = &cards[0];

        assert_eq!(
            card.question_parts,
            vec![
                Fragment::text("What is the"),
                Fragment::text("MOST"),
                Fragment::text("efficient option?"),
            ]
        );
        assert_eq!(card.answers[1].text(), Some("Two"));
        assert_eq!(card.correct_answers, BTreeSet::from(['B']));
    }

    #[test]
    fn test_cards_in_document_order() {
        let html = format!(
            "{}<section>{}</section>{}",
            card_with_header("Question #3"),
            card_with_header("Question #1"),
            card_with_header("Question #2")
        );
        let numbers: Vec<String> = parse(&html).into_iter().map(|c| c.question_number).collect();
        assert_eq!(numbers, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_no_cards() {
        assert!(parse("<html><body><p>Nothing</p></body></html>").is_empty());
    }
}
