//! Lenient HTML/XHTML parsing for chapter documents.
//!
//! Chapter documents found in the wild are often not well-formed XML, so they
//! go through the html5ever tree builder (browser error recovery) into an
//! arena [`Dom`], and [`extract_chapter`] pulls title and paragraphs out of it.

mod arena;
mod extract;
mod sink;

pub use arena::{Children, Dom, Node, NodeData, NodeId};
pub use extract::{ExtractedChapter, extract_chapter};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use sink::DomSink;

/// Parse a markup document, recovering from structural errors.
pub fn parse_html(html: &str) -> Dom {
    parse_document(DomSink::new(), ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}
