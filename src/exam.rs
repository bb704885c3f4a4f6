//! Exam data model
//!
//! Cards, answers and fragments, plus the `[type, content]` JSON encoding
//! shared with the quiz and results tools.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::path::PathBuf;

use base64::{engine::general_purpose, Engine as _};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ExtractError;

/// Title used when the caller does not supply one
pub const DEFAULT_TITLE: &str = "ParsedExam";

const TEXT_TAG: &str = "text";
const IMAGE_BASE64_TAG: &str = "image_base64";
const IMAGE_PATH_TAG: &str = "image";

/// One ordered content unit of a question or answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    Image(ImageRef),
}

/// Image reference in one of its two lifecycle stages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Resolved filesystem path, not yet read
    Pending(PathBuf),
    /// Embedded payload or a sentinel
    Encoded(EncodedImage),
}

/// Embeddable image content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedImage {
    Base64(String),
    NotFound,
    ReadError,
}

impl EncodedImage {
    pub const NOT_FOUND: &'static str = "NOT_FOUND";
    pub const READ_ERROR: &'static str = "ERROR";

    /// Encode raw image bytes
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::Base64(general_purpose::STANDARD.encode(bytes))
    }

    /// Wire payload: the base64 text or the sentinel string
    pub fn payload(&self) -> &str {
        match self {
            Self::Base64(data) => data.as_str(),
            Self::NotFound => Self::NOT_FOUND,
            Self::ReadError => Self::READ_ERROR,
        }
    }

    fn from_payload(payload: String) -> Self {
        match payload.as_str() {
            Self::NOT_FOUND => Self::NotFound,
            Self::READ_ERROR => Self::ReadError,
            _ => Self::Base64(payload),
        }
    }

    /// Original image bytes, or None for sentinels and corrupt payloads
    pub fn decode(&self) -> Option<Vec<u8>> {
        match self {
            Self::Base64(data) => general_purpose::STANDARD.decode(data.trim()).ok(),
            Self::NotFound | Self::ReadError => None,
        }
    }
}

impl Fragment {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    pub fn pending_image(path: impl Into<PathBuf>) -> Self {
        Self::Image(ImageRef::Pending(path.into()))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t.as_str()),
            Self::Image(_) => None,
        }
    }

    fn from_tagged(tag: &str, content: String) -> crate::Result<Self> {
        match tag {
            TEXT_TAG => Ok(Self::Text(content)),
            IMAGE_BASE64_TAG => Ok(Self::Image(ImageRef::Encoded(EncodedImage::from_payload(
                content,
            )))),
            IMAGE_PATH_TAG => Ok(Self::pending_image(content)),
            other => Err(ExtractError::UnknownFragmentType(other.to_string())),
        }
    }
}

impl Serialize for Fragment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (tag, content): (&str, Cow<'_, str>) = match self {
            Self::Text(t) => (TEXT_TAG, Cow::Borrowed(t)),
            Self::Image(ImageRef::Pending(path)) => (IMAGE_PATH_TAG, path.to_string_lossy()),
            Self::Image(ImageRef::Encoded(img)) => (IMAGE_BASE64_TAG, Cow::Borrowed(img.payload())),
        };
        (tag, content).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Fragment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (tag, content) = <(String, String)>::deserialize(deserializer)?;
        Self::from_tagged(&tag, content).map_err(D::Error::custom)
    }
}

/// One selectable choice. Its letter comes from its position, see [`answer_letter`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answer {
    pub fragments: Vec<Fragment>,
}

impl Answer {
    pub fn new(fragments: Vec<Fragment>) -> Self {
        Self { fragments }
    }

    /// Leading text of the answer, if any
    pub fn text(&self) -> Option<&str> {
        self.fragments.iter().find_map(Fragment::as_text)
    }
}

/// One extracted question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub question_number: String,
    pub question_parts: Vec<Fragment>,
    pub answers: Vec<Answer>,
    pub correct_answers: BTreeSet<char>,
}

impl Card {
    /// Answers paired with their derived display letters
    pub fn lettered_answers(&self) -> impl Iterator<Item = (char, &Answer)> {
        self.answers
            .iter()
            .enumerate()
            .filter_map(|(i, a)| answer_letter(i).map(|letter| (letter, a)))
    }

    /// True when at least one answer is marked correct
    pub fn is_scoreable(&self) -> bool {
        !self.answers.is_empty() && !self.correct_answers.is_empty()
    }

    fn fragments_mut(&mut self) -> impl Iterator<Item = &mut Fragment> {
        self.question_parts
            .iter_mut()
            .chain(self.answers.iter_mut().flat_map(|a| a.fragments.iter_mut()))
    }
}

/// A titled, ordered collection of cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    pub title: String,
    #[serde(rename = "questions")]
    pub cards: Vec<Card>,
}

impl Exam {
    pub fn new(title: impl Into<String>, cards: Vec<Card>) -> Self {
        Self {
            title: title.into(),
            cards,
        }
    }

    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Every fragment of every card, in card order
    pub fn fragments_mut(&mut self) -> impl Iterator<Item = &mut Fragment> {
        self.cards.iter_mut().flat_map(Card::fragments_mut)
    }
}

/// Display letter for the answer at `index` ('A' for 0)
pub fn answer_letter(index: usize) -> Option<char> {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map(|i| char::from(b'A' + i))
}

/// Ordinal of an uppercase answer letter
pub fn letter_index(letter: char) -> Option<usize> {
    letter
        .is_ascii_uppercase()
        .then(|| (letter as u8 - b'A') as usize)
}

/// Flatten fragments into one display line, images shown as `[IMG]`
pub fn summary_text(fragments: &[Fragment]) -> String {
    fragments
        .iter()
        .map(|f| match f {
            Fragment::Text(t) => t.as_str(),
            Fragment::Image(_) => "[IMG]",
        })
        .collect::<Vec<_>>()
        .join(" ")
}
