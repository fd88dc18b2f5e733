//! Line-scoped markdown subset used for analysis text.
//!
//! This is not a markdown engine. Each line is classified on its own and
//! inline markup is rewritten with three ordered passes:
//!
//! | Line                         | Fragment                  |
//! |------------------------------|---------------------------|
//! | blank                        | [`Fragment::Break`]       |
//! | `---`, `***`, ... (3+ chars) | [`Fragment::Rule`]        |
//! | `#`..`####` then a space     | [`Fragment::Heading`]     |
//! | `>` prefix                   | [`Fragment::Blockquote`]  |
//! | anything else                | [`Fragment::Paragraph`]   |
//!
//! Inline passes run in the order `` `code` ``, `**bold**`, `*italic*`, each
//! on the output of the previous one, so overlapping markers resolve
//! best-effort rather than the way CommonMark would.

mod render;

pub use render::{Fragment, render, render_inline, render_xhtml};
