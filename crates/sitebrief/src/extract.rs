//! Visible-text extraction from fetched HTML
//!
//! Design: the page is parsed into a DOM with `scraper` and its text nodes are
//! collected in document order, skipping the subtrees of elements that never
//! render as text. Whitespace normalization happens afterwards on the plain
//! text, one segment per line.

use scraper::{ElementRef, Html, Node};

/// Maximum number of characters of page text passed on to the generator
pub const MAX_CONTENT_CHARS: usize = 40_000;

/// Elements whose content is never visible text
///
/// `noscript` is parsed as raw text with scripting enabled, so its body would
/// otherwise leak in as markup.
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that start a new line in the extracted text
const NEWLINE_TAGS: &[&str] = &[
    "p", "div", "br", "h1", "h2", "h3", "h4", "h5", "h6", "li", "tr", "section", "article",
    "header", "footer", "nav", "main", "title",
];

/// Extract the visible text of a page, normalized and capped at
/// [`MAX_CONTENT_CHARS`] characters
///
/// Lines are trimmed and further split on runs of two spaces, blank segments
/// are dropped and the rest joined with single newlines. The cap is a plain
/// character slice and may cut a word in half.
pub fn extract_visible_text(html: &str) -> String {
    let text = html_to_text(html);
    let normalized = normalize_segments(&text);
    truncate_chars(&normalized, MAX_CONTENT_CHARS).to_string()
}

/// Convert HTML to plain text without touching whitespace
///
/// Script, style, noscript and template elements are removed together with
/// their content, comments are dropped and character references are decoded
/// by the parser. Block-level elements (paragraphs, headings, list items and
/// the like) are surrounded by line breaks, so text of adjacent blocks such as
/// `<p>One</p><p>Two</p>` comes out as two lines rather than `OneTwo`.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut output = String::with_capacity(html.len());
    collect_text(document.root_element(), &mut output);
    output
}

fn collect_text(element: ElementRef<'_>, output: &mut String) {
    let name = element.value().name();
    if SKIPPED_TAGS.contains(&name) {
        return;
    }

    let block = NEWLINE_TAGS.contains(&name);
    if block {
        output.push('\n');
    }

    for child in element.children() {
        if let Some(child) = ElementRef::wrap(child) {
            collect_text(child, output);
        } else if let Node::Text(text) = child.value() {
            output.push_str(text);
        }
    }

    if block {
        output.push('\n');
    }
}

/// Split text into trimmed segments and rejoin the non-empty ones with newlines
///
/// A segment boundary is any line break or a run of two spaces.
pub fn normalize_segments(text: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for line in text.split(is_line_boundary) {
        for phrase in line.trim().split("  ") {
            let phrase = phrase.trim();
            if !phrase.is_empty() {
                segments.push(phrase);
            }
        }
    }
    segments.join("\n")
}

/// Return at most `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn is_line_boundary(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}
