//! Chapter title and paragraph extraction.

use std::sync::LazyLock;

use regex::Regex;

use super::{Dom, parse_html};
use crate::model::PARAGRAPH_SEPARATOR;

/// Elements whose text forms the chapter content, in document order.
const BLOCK_TAGS: &[&str] = &["p", "h1", "h2", "h3", "h4", "h5", "h6"];

/// Headings consulted for a title when the document has no `<title>`.
const TITLE_HEADING_TAGS: &[&str] = &["h1", "h2", "h3"];

static BLANK_LINE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t\r\f\v\u{a0}]*(?:\n[ \t\r\f\v\u{a0}]*)+").unwrap());

/// Title and cleaned text of one chapter document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedChapter {
    pub title: String,
    pub content: String,
}

/// Extract a chapter from a markup document.
///
/// `position` is the document's 1-based place in the reading order and names
/// the chapter when neither a `<title>` nor an `h1`-`h3` heading has text.
pub fn extract_chapter(html: &str, position: usize) -> ExtractedChapter {
    let dom = parse_html(html);

    let title = extract_title(&dom).unwrap_or_else(|| {
        log::debug!("no title in reading-order document {position}, synthesizing one");
        format!("Chapter {position}")
    });

    ExtractedChapter {
        title,
        content: extract_content(&dom),
    }
}

fn extract_title(dom: &Dom) -> Option<String> {
    let from_title = dom
        .find_first(&["title"])
        .map(|id| dom.text_content(id).trim().to_string())
        .filter(|t| !t.is_empty());

    from_title.or_else(|| {
        dom.find_first(TITLE_HEADING_TAGS)
            .map(|id| dom.text_content(id).trim().to_string())
            .filter(|t| !t.is_empty())
    })
}

fn extract_content(dom: &Dom) -> String {
    let blocks: Vec<String> = dom
        .elements(dom.document(), BLOCK_TAGS)
        .into_iter()
        .map(|id| dom.text_content(id).trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();

    if !blocks.is_empty() {
        return blocks.join(PARAGRAPH_SEPARATOR);
    }

    // No paragraph markup at all: fall back to the raw body text.
    let root = dom.find_first(&["body"]).unwrap_or_else(|| dom.document());
    let text = dom.text_content(root);
    BLANK_LINE_RUNS
        .replace_all(&text, PARAGRAPH_SEPARATOR)
        .trim()
        .to_string()
}
