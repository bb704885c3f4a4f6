//! Fragment extraction
//!
//! Splits a content node into ordered text and image fragments. Only the
//! node's direct children are visited, so top-level text and images keep
//! their interleaving.

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use scraper::{ElementRef, Node};
use tracing::debug;
use url::Url;

use super::sanitize::{sanitize_with, SanitizeMode};
use crate::exam::Fragment;

/// Extract ordered fragments from the direct children of `node`.
/// A missing node yields no fragments.
pub fn extract_fragments(
    node: Option<ElementRef<'_>>,
    base_path: &Path,
    mode: SanitizeMode,
) -> Vec<Fragment> {
    let Some(node) = node else {
        return Vec::new();
    };

    let mut fragments = Vec::new();

    for child in node.children() {
        match child.value() {
            Node::Element(el) if el.name() == "img" => {
                // A missing src still yields an image so the placeholder survives encoding
                let src = el.attr("src").map(str::trim).unwrap_or_default();
                if src.is_empty() {
                    debug!("<img> without src");
                }
                fragments.push(Fragment::pending_image(resolve_image_path(src, base_path)));
            }
            Node::Text(text) => push_text(&mut fragments, &**text, mode),
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(child) {
                    let joined = el.text().collect::<Vec<_>>().join(" ");
                    push_text(&mut fragments, &joined, mode);
                }
            }
            // Comments, doctypes and processing instructions carry no content
            _ => {}
        }
    }

    fragments
}

fn push_text(fragments: &mut Vec<Fragment>, raw: &str, mode: SanitizeMode) {
    let cleaned = sanitize_with(raw, mode);
    if !cleaned.is_empty() {
        fragments.push(Fragment::Text(cleaned));
    }
}

/// Resolve an `<img src>` value against the page's folder.
///
/// `file://` URLs map straight to their path; anything else is
/// percent-decoded and joined onto `base_path`.
pub fn resolve_image_path(src: &str, base_path: &Path) -> PathBuf {
    if let Ok(url) = Url::parse(src) {
        if url.scheme() == "file" {
            if let Ok(path) = url.to_file_path() {
                return path;
            }
        }
    }

    let decoded = percent_decode_str(src).decode_utf8_lossy();
    base_path.join(decoded.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
        let selector = Selector::parse(selector).unwrap();
        document.select(&selector).next()
    }

    #[test]
    fn test_text_and_images_interleaved() {
        let html = r#"
        <p class="card-text">Look at the diagram<br>
            <img src="img/net%20diagram.png">
            Which subnet <b>Most Voted</b> is public?
        </p>
        "#;
        let document = Html::parse_fragment(html);
        let fragments = extract_fragments(first(&document, "p"), Path::new("pages"), SanitizeMode::Ascii);

        assert_eq!(
            fragments,
            vec![
                Fragment::text("Look at the diagram"),
                Fragment::pending_image("pages/img/net diagram.png"),
                Fragment::text("Which subnet"),
                Fragment::text("is public?"),
            ]
        );
    }

    #[test]
    fn test_nested_text_joined_with_spaces() {
        let html = r#"<li><span>A.</span><span><em>Use</em><strong>S3</strong></span></li>"#;
        let document = Html::parse_fragment(html);
        let fragments = extract_fragments(first(&document, "li"), Path::new("."), SanitizeMode::Ascii);

        assert_eq!(fragments, vec![Fragment::text("A."), Fragment::text("Use S3")]);
    }

    #[test]
    fn test_missing_node_is_empty() {
        let document = Html::parse_fragment("<div>No body here</div>");
        let fragments = extract_fragments(first(&document, "p.card-text"), Path::new("."), SanitizeMode::Ascii);
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_whitespace_and_comments_suppressed() {
        let html = "<p>  \n <!-- most voted --> <span>   </span> </p>";
        let document = Html::parse_fragment(html);
        let fragments = extract_fragments(first(&document, "p"), Path::new("."), SanitizeMode::Ascii);
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_img_without_src_kept() {
        let html = r#"<p>See <img> and <img src=""> end</p>"#;
        let document = Html::parse_fragment(html);
        let fragments = extract_fragments(first(&document, "p"), Path::new("pages"), SanitizeMode::Ascii);

        assert_eq!(
            fragments,
            vec![
                Fragment::text("See"),
                Fragment::pending_image("pages"),
                Fragment::text("and"),
                Fragment::pending_image("pages"),
                Fragment::text("end"),
            ]
        );
    }

    #[test]
    fn test_resolve_image_path() {
        let base = Path::new("/exams/aws");
        assert_eq!(
            resolve_image_path("media/q%2012.png", base),
            PathBuf::from("/exams/aws/media/q 12.png")
        );
        assert_eq!(
            resolve_image_path("file:///tmp/shot.png", base),
            PathBuf::from("/tmp/shot.png")
        );
        assert_eq!(
            resolve_image_path("/abs/img.png", base),
            PathBuf::from("/abs/img.png")
        );
    }
}
