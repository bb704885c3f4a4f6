//! Extraction configuration
//!
//! Everything is optional in the JSON form; missing keys fall back to the
//! markup used by exported exam discussion pages.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};
use crate::exam::DEFAULT_TITLE;
use crate::extractors::SanitizeMode;

/// Top-level settings for a parse run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Exam title written to the output document
    pub title: String,
    /// Replace image paths with base64 payloads
    pub embed_images: bool,
    pub sanitize_mode: SanitizeMode,
    pub selectors: SelectorConfig,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            embed_images: true,
            sanitize_mode: SanitizeMode::default(),
            selectors: SelectorConfig::default(),
        }
    }
}

impl ExtractConfig {
    /// Load a config from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ExtractError::io(path, e))?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// CSS selectors describing a question card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Question card container
    pub card: String,
    /// Header holding "Question #N ..."
    pub header: String,
    /// Question body; the reveal paragraph shares its `card-text` class
    pub question_body: String,
    pub answer_item: String,
    /// Class substring marking an answer item as correct
    pub correct_class_marker: String,
    /// Region revealing the correct answer
    pub answer_reveal: String,
    /// Community vote bar inside the reveal region, e.g. "AC 94%"
    pub vote_bar: String,
    pub correct_answer_span: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            card: "div.card.exam-question-card".to_string(),
            header: "div.card-header".to_string(),
            question_body: "p.card-text:not(.question-answer)".to_string(),
            answer_item: "li.multi-choice-item".to_string(),
            correct_class_marker: "correct".to_string(),
            answer_reveal: ".question-answer".to_string(),
            vote_bar: ".vote-bar".to_string(),
            correct_answer_span: "span.correct-answer".to_string(),
        }
    }
}
