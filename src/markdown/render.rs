use std::sync::LazyLock;

use regex::Regex;

use crate::util::escape_xml;

static RULE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:-{3,}|\*{3,})$").unwrap());
static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,4}) (.*)$").unwrap());
static CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());
// Span bodies exclude `<` and `>`: escaped text has neither, so a match never
// straddles a tag an earlier pass inserted.
static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*([^<>]+?)\*\*").unwrap());
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*<>]+?)\*").unwrap());

/// One rendered line. Text payloads are XHTML-ready: escaped, with inline
/// markup already rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Break,
    Rule,
    Heading { level: u8, html: String },
    Blockquote(String),
    Paragraph(String),
}

impl Fragment {
    pub fn to_xhtml(&self) -> String {
        match self {
            Fragment::Break => "<br/>".to_string(),
            Fragment::Rule => "<hr/>".to_string(),
            Fragment::Heading { level, html } => format!("<h{level}>{html}</h{level}>"),
            Fragment::Blockquote(html) => format!("<blockquote><p>{html}</p></blockquote>"),
            Fragment::Paragraph(html) => format!("<p>{html}</p>"),
        }
    }
}

/// Render analysis text into fragments, one per input line.
pub fn render(text: &str) -> Vec<Fragment> {
    text.lines().map(render_line).collect()
}

/// Render analysis text straight to an XHTML snippet.
pub fn render_xhtml(text: &str) -> String {
    render(text)
        .iter()
        .map(Fragment::to_xhtml)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_line(line: &str) -> Fragment {
    let line = line.trim();

    if line.is_empty() {
        return Fragment::Break;
    }

    if RULE.is_match(line) {
        return Fragment::Rule;
    }

    if let Some(caps) = HEADING.captures(line) {
        return Fragment::Heading {
            level: caps[1].len() as u8,
            html: render_inline(caps[2].trim()),
        };
    }

    if let Some(rest) = line.strip_prefix('>') {
        return Fragment::Blockquote(render_inline(rest.trim_start()));
    }

    Fragment::Paragraph(render_inline(line))
}

/// Escape a line and apply the code, bold and italic passes, in that order.
///
/// Each pass only wraps text that lies between existing tags, so the result
/// is always well-nested. Markers that cannot be closed that way stay as
/// literal asterisks.
pub fn render_inline(text: &str) -> String {
    let escaped = escape_xml(text);
    let code = CODE.replace_all(&escaped, "<code>${1}</code>");
    let bold = BOLD.replace_all(&code, "<strong>${1}</strong>");
    ITALIC.replace_all(&bold, "<em>${1}</em>").into_owned()
}
