//! Exam assembly
//!
//! Parses a batch of HTML documents into one ordered [`Exam`] and optionally
//! embeds image files as base64. A document that cannot be parsed, or an image
//! that cannot be read, never aborts the rest of the run.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use scraper::Html;
use tracing::{debug, info, warn};

use crate::config::ExtractConfig;
use crate::error::{ExtractError, Result};
use crate::exam::{Card, EncodedImage, Exam, Fragment, ImageRef};
use crate::extractors::CardParser;

/// Folder where parsed exams are written by default
pub const EXAMS_DIR: &str = "exams";

/// Raw HTML plus the folder its relative image paths resolve against
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub name: String,
    pub html: Vec<u8>,
    pub base_path: PathBuf,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, html: impl Into<Vec<u8>>, base_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            html: html.into(),
            base_path: base_path.into(),
        }
    }
}

/// Keep the HTML files among directory entries, sorted. Entries that
/// cannot be read are logged and skipped.
fn html_paths(dir: &Path, entries: impl Iterator<Item = std::io::Result<PathBuf>>) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|path| path.is_file() && is_html_file(path))
        .collect();
    paths.sort();
    paths
}

/// Collect the `.html`/`.htm` files of `dir`, sorted by file name.
/// Unreadable files are logged and skipped.
pub fn load_folder(dir: &Path) -> Result<Vec<SourceDocument>> {
    let entries = std::fs::read_dir(dir).map_err(|e| ExtractError::io(dir, e))?;

    let paths = html_paths(dir, entries.map(|entry| entry.map(|e| e.path())));

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match std::fs::read(&path) {
            Ok(html) => documents.push(SourceDocument::new(name, html, dir)),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable file"),
        }
    }

    debug!(dir = %dir.display(), documents = documents.len(), "loaded folder");
    Ok(documents)
}

fn is_html_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
}

/// Parse one document. Fails only when the bytes are not valid UTF-8.
pub fn parse_document(parser: &CardParser, source: &SourceDocument) -> Result<Vec<Card>> {
    let html = std::str::from_utf8(&source.html).map_err(|_| ExtractError::InvalidUtf8 {
        name: source.name.clone(),
    })?;
    let document = Html::parse_document(html);
    Ok(parser.parse_cards(&document, &source.base_path))
}

/// Parse every document and concatenate the cards in input order.
///
/// Documents are parsed in parallel; results are collected per document and
/// joined afterwards, so card order never depends on completion order.
pub fn assemble(sources: &[SourceDocument], parser: &CardParser, title: &str) -> Exam {
    let per_document: Vec<Vec<Card>> = sources
        .par_iter()
        .map(|source| match parse_document(parser, source) {
            Ok(cards) => {
                debug!(document = %source.name, cards = cards.len(), "parsed document");
                cards
            }
            Err(e) => {
                warn!(document = %source.name, error = %e, "skipping document");
                Vec::new()
            }
        })
        .collect();

    let cards: Vec<Card> = per_document.into_iter().flatten().collect();
    info!(documents = sources.len(), cards = cards.len(), "assembled exam");
    Exam::new(title, cards)
}

/// Full pipeline for one run: compile selectors, assemble, embed images
pub fn extract_exam(sources: &[SourceDocument], config: &ExtractConfig) -> Result<Exam> {
    let parser = CardParser::from_config(config)?;
    let mut exam = assemble(sources, &parser, &config.title);
    if config.embed_images {
        embed_images(&mut exam);
    }
    Ok(exam)
}

/// Replace every pending image path with its base64 payload or a sentinel
pub fn embed_images(exam: &mut Exam) {
    let mut embedded = 0usize;
    for fragment in exam.fragments_mut() {
        if let Fragment::Image(ImageRef::Pending(path)) = fragment {
            let encoded = encode_image_file(path);
            *fragment = Fragment::Image(ImageRef::Encoded(encoded));
            embedded += 1;
        }
    }
    debug!(images = embedded, "embedded images");
}

/// Read and encode one image file
pub fn encode_image_file(path: &Path) -> EncodedImage {
    match std::fs::read(path) {
        Ok(bytes) => EncodedImage::from_bytes(&bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "image not found");
            EncodedImage::NotFound
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read image");
            EncodedImage::ReadError
        }
    }
}

/// `exams/<input folder name>.json`
pub fn default_output_path(input_dir: &Path) -> PathBuf {
    let name = input_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .or_else(|| {
            input_dir
                .canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| "exam".to_string());
    Path::new(EXAMS_DIR).join(format!("{name}.json"))
}

/// Write `exam` as pretty JSON, creating parent folders as needed
pub fn write_exam(path: &Path, exam: &Exam) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ExtractError::io(parent, e))?;
    }
    let json = exam.to_json_pretty()?;
    std::fs::write(path, json).map_err(|e| ExtractError::io(path, e))
}

/// Read an exam document written by [`write_exam`]
pub fn read_exam(path: &Path) -> Result<Exam> {
    let raw = std::fs::read_to_string(path).map_err(|e| ExtractError::io(path, e))?;
    Exam::from_json_str(&raw)
}
