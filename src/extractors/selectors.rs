//! Compiled card selectors

use scraper::{ElementRef, Selector};

use crate::config::SelectorConfig;
use crate::error::{ExtractError, Result};

/// [`SelectorConfig`] parsed once and shared by every document in a run
#[derive(Debug, Clone)]
pub struct CardSelectors {
    pub card: Selector,
    pub header: Selector,
    pub question_body: Selector,
    pub answer_item: Selector,
    pub correct_class_marker: String,
    pub answer_reveal: Selector,
    pub vote_bar: Selector,
    pub correct_answer_span: Selector,
}

impl CardSelectors {
    pub fn compile(config: &SelectorConfig) -> Result<Self> {
        Ok(Self {
            card: parse_selector(&config.card)?,
            header: parse_selector(&config.header)?,
            question_body: parse_selector(&config.question_body)?,
            answer_item: parse_selector(&config.answer_item)?,
            correct_class_marker: config.correct_class_marker.trim().to_string(),
            answer_reveal: parse_selector(&config.answer_reveal)?,
            vote_bar: parse_selector(&config.vote_bar)?,
            correct_answer_span: parse_selector(&config.correct_answer_span)?,
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// First descendant of `scope` matching `selector`
pub(crate) fn select_first<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

/// Text pieces trimmed one by one, then concatenated without separators
pub(crate) fn stripped_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selectors_compile() {
        let selectors = CardSelectors::compile(&SelectorConfig::default()).unwrap();
        assert_eq!(selectors.correct_class_marker, "correct");
    }

    #[test]
    fn test_invalid_selector_reported() {
        let config = SelectorConfig {
            vote_bar: "div[".to_string(),
            ..SelectorConfig::default()
        };
        match CardSelectors::compile(&config) {
            Err(ExtractError::InvalidSelector { selector, .. }) => assert_eq!(selector, "div["),
            other => panic!("expected InvalidSelector, got {other:?}"),
        }
    }

    #[test]
    fn test_stripped_text_concatenates() {
        let document = scraper::Html::parse_fragment(
            r#"<div class="card-header">Question <span>#29</span>
                <span class="small">Topic 1</span></div>"#,
        );
        let header = select_first(document.root_element(), &Selector::parse("div").unwrap()).unwrap();
        assert_eq!(stripped_text(header), "Question#29Topic 1");
    }
}
