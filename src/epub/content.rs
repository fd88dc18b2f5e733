//! Chapter document assembly: original text, translations, analyses and
//! audio references for one study chapter.

use std::fmt::Write;

use crate::markdown::render_xhtml;
use crate::model::{AudioAsset, ExportRequest};
use crate::util::escape_xml;

/// Href of the single chapter document, relative to the package directory.
pub const CONTENT_DOCUMENT_HREF: &str = "chapter.xhtml";
pub const STYLESHEET_HREF: &str = "style.css";
pub const NAV_DOCUMENT_HREF: &str = "nav.xhtml";
pub const AUDIO_DIR: &str = "audio";

/// Resource name of the whole-chapter narration.
pub const CHAPTER_AUDIO_NAME: &str = "audio_chapter";

/// Resource name of paragraph `index`'s narration.
pub fn paragraph_audio_name(index: usize) -> String {
    format!("audio_p{index}")
}

/// Href of an audio resource by name.
pub fn audio_href(name: &str) -> String {
    format!("{AUDIO_DIR}/{name}.wav")
}

/// Static stylesheet shipped with every package.
pub const STYLESHEET: &str = r#"body {
  font-family: serif;
  line-height: 1.5;
  margin: 0 5%;
}

h1.chapter-title {
  text-align: center;
  margin: 1em 0 1.5em;
}

section.paragraph {
  margin: 0 0 1.5em;
  padding-bottom: 1em;
  border-bottom: 1px solid #ddd;
}

p.original {
  font-size: 1.1em;
  margin: 0 0 0.5em;
}

p.translation {
  color: #555;
  font-style: italic;
  margin: 0 0 0.5em;
}

div.analysis {
  font-family: sans-serif;
  font-size: 0.9em;
  background: #f6f6f6;
  border-left: 3px solid #999;
  padding: 0.5em 1em;
}

div.analysis h1,
div.analysis h2,
div.analysis h3,
div.analysis h4 {
  font-size: 1em;
  margin: 0.5em 0 0.25em;
}

div.analysis blockquote {
  margin: 0.5em 0;
  padding-left: 0.75em;
  border-left: 2px solid #ccc;
}

div.audio {
  margin: 0.25em 0 0.5em;
}

audio {
  width: 100%;
}
"#;

/// An audio resource referenced by the assembled document.
#[derive(Debug, Clone)]
pub struct AudioReference<'a> {
    /// Resource name, also used as the manifest id.
    pub name: String,
    pub href: String,
    pub asset: &'a AudioAsset,
}

/// Output of [`assemble`]: the XHTML plus every audio resource it points at,
/// chapter audio first, then paragraph audio in paragraph order.
#[derive(Debug, Clone)]
pub struct AssembledDocument<'a> {
    pub xhtml: String,
    pub audio: Vec<AudioReference<'a>>,
}

/// Render the chapter document for an export request.
///
/// Sparse-map entries whose index is not a paragraph index are not rendered
/// and their audio is not referenced.
pub fn assemble<'a>(request: &'a ExportRequest, language: &str) -> AssembledDocument<'a> {
    let title = escape_xml(&request.title);
    let lang = escape_xml(language);
    let mut audio = Vec::new();

    let mut body = String::new();
    let _ = writeln!(body, r#"  <h1 class="chapter-title">{title}</h1>"#);

    if let Some(asset) = &request.chapter_audio {
        let reference = audio_reference(CHAPTER_AUDIO_NAME.to_string(), asset);
        let _ = writeln!(
            body,
            r#"  <div class="audio chapter-audio">{}</div>"#,
            audio_element(&reference.href)
        );
        audio.push(reference);
    }

    for (index, paragraph) in request.paragraphs.iter().enumerate() {
        let _ = writeln!(body, r#"  <section class="paragraph" id="p{index}">"#);
        let _ = writeln!(
            body,
            r#"    <p class="original">{}</p>"#,
            escape_xml(paragraph)
        );

        if let Some(asset) = request.paragraph_audio.get(&index) {
            let reference = audio_reference(paragraph_audio_name(index), asset);
            let _ = writeln!(
                body,
                r#"    <div class="audio">{}</div>"#,
                audio_element(&reference.href)
            );
            audio.push(reference);
        }

        if let Some(translation) = request.translations.get(&index) {
            let _ = writeln!(
                body,
                r#"    <p class="translation">{}</p>"#,
                escape_xml(translation)
            );
        }

        if let Some(analysis) = request.analyses.get(&index) {
            let _ = writeln!(
                body,
                "    <div class=\"analysis\">\n{}\n    </div>",
                render_xhtml(analysis)
            );
        }

        body.push_str("  </section>\n");
    }

    let xhtml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" lang="{lang}" xml:lang="{lang}">
<head>
  <meta charset="UTF-8"/>
  <title>{title}</title>
  <link rel="stylesheet" type="text/css" href="{STYLESHEET_HREF}"/>
</head>
<body>
{body}</body>
</html>
"#
    );

    AssembledDocument { xhtml, audio }
}

/// Render the EPUB 3 navigation document with its single entry.
pub fn render_nav(title: &str, language: &str) -> String {
    let title = escape_xml(title);
    let lang = escape_xml(language);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" lang="{lang}" xml:lang="{lang}">
<head>
  <meta charset="UTF-8"/>
  <title>{title}</title>
</head>
<body>
  <nav epub:type="toc" id="toc">
    <ol>
      <li><a href="{CONTENT_DOCUMENT_HREF}">{title}</a></li>
    </ol>
  </nav>
</body>
</html>
"#
    )
}

fn audio_reference(name: String, asset: &AudioAsset) -> AudioReference<'_> {
    AudioReference {
        href: audio_href(&name),
        name,
        asset,
    }
}

fn audio_element(href: &str) -> String {
    format!(r#"<audio controls="controls" src="{href}"></audio>"#)
}
