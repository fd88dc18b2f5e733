//! Writer tests.
//!
//! Generated packages are inspected entry by entry and read back through the
//! library's own reader.

use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use glossa::epub::{PACKAGE_DOCUMENT_PATH, parse_opf};
use glossa::{EpubReader, EpubWriter, ExportRequest, WriterConfig, read_chapters, write_epub};
use quick_xml::Reader;
use quick_xml::events::Event;
use tempfile::TempDir;
use zip::{CompressionMethod, ZipArchive};

fn entry(bytes: &[u8], name: &str) -> Option<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).ok()?;
    let mut out = String::new();
    file.read_to_string(&mut out).unwrap();
    Some(out)
}

fn names(bytes: &[u8]) -> Vec<String> {
    let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    archive.file_names().map(str::to_string).collect()
}

/// Tokenize a document with end-name checking on; returns the first error.
fn check_well_formed(xml: &str) -> Result<(), String> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => return Ok(()),
            Ok(_) => {}
            Err(e) => return Err(format!("at {}: {e}", reader.buffer_position())),
        }
    }
}

fn wav(tag: u8) -> Vec<u8> {
    let mut data = b"RIFF\0\0\0\0WAVE".to_vec();
    data.extend(std::iter::repeat_n(tag, 32));
    data
}

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn test_round_trip_recovers_paragraphs() {
    let bytes = write_epub(&ExportRequest::new("T", ["a", "b"])).unwrap();

    let chapters = EpubReader::new()
        .with_min_content_chars(0)
        .read(&bytes)
        .unwrap();
    assert_eq!(chapters.len(), 1);
    assert_eq!(chapters[0].id, 1);
    assert_eq!(chapters[0].title, "T");

    // The title heading is part of the document body.
    assert_eq!(chapters[0].paragraphs(), vec!["T", "a", "b"]);
}

#[test]
fn test_short_package_is_a_stub_for_the_default_reader() {
    let bytes = write_epub(&ExportRequest::new("T", ["a", "b"])).unwrap();

    // "T\n\na\n\nb" is under the default threshold.
    assert!(read_chapters(&bytes).unwrap().is_empty());
    assert_eq!(
        EpubReader::new()
            .with_min_content_chars(0)
            .read(&bytes)
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_round_trip_with_default_threshold() {
    let request = ExportRequest::new(
        "Capítulo uno",
        ["Érase una vez un lugar de la Mancha.", "No ha mucho tiempo que vivía."],
    );
    let chapters = read_chapters(&write_epub(&request).unwrap()).unwrap();

    assert_eq!(chapters.len(), 1);
    assert_eq!(chapters[0].title, "Capítulo uno");
    assert_eq!(&chapters[0].paragraphs()[1..], &request.paragraphs[..]);
}

#[test]
fn test_markup_in_text_is_escaped_and_recovered() {
    let request = ExportRequest::new("Fish & <Chips>", ["Use <b> & \"quotes\" 'here'."]);
    let bytes = write_epub(&request).unwrap();

    let chapter = entry(&bytes, "OEBPS/chapter.xhtml").unwrap();
    assert!(chapter.contains("Use &lt;b&gt; &amp; &quot;quotes&quot; &apos;here&apos;."));

    let chapters = EpubReader::new()
        .with_min_content_chars(0)
        .read(&bytes)
        .unwrap();
    assert_eq!(chapters[0].title, "Fish & <Chips>");
    assert_eq!(chapters[0].paragraphs()[1], "Use <b> & \"quotes\" 'here'.");
}

// ============================================================================
// Package structure
// ============================================================================

#[test]
fn test_mimetype_is_first_and_uncompressed() {
    let bytes = write_epub(&ExportRequest::new("T", ["a"])).unwrap();
    let mut archive = ZipArchive::new(Cursor::new(&bytes[..])).unwrap();

    let mut first = archive.by_index(0).unwrap();
    assert_eq!(first.name(), "mimetype");
    assert_eq!(first.compression(), CompressionMethod::Stored);
    let mut content = String::new();
    first.read_to_string(&mut content).unwrap();
    assert_eq!(content, "application/epub+zip");
}

#[test]
fn test_only_referenced_audio_is_packaged() {
    let request = ExportRequest::new("T", ["a", "b", "c"])
        .with_paragraph_audio(0, wav(0))
        .with_paragraph_audio(2, wav(2));
    let bytes = write_epub(&request).unwrap();

    let audio: Vec<String> = names(&bytes)
        .into_iter()
        .filter(|n| n.ends_with(".wav"))
        .collect();
    assert_eq!(
        audio,
        vec!["OEBPS/audio/audio_p0.wav", "OEBPS/audio/audio_p2.wav"]
    );

    let chapter = entry(&bytes, "OEBPS/chapter.xhtml").unwrap();
    assert_eq!(chapter.matches("<audio ").count(), 2);
    assert!(chapter.contains("audio/audio_p2.wav"));
    assert!(!chapter.contains("audio_p1"));

    let opf = entry(&bytes, PACKAGE_DOCUMENT_PATH).unwrap();
    let package = parse_opf(&opf).unwrap();
    let mut audio_ids: Vec<&str> = package
        .manifest
        .iter()
        .filter(|(_, item)| item.media_type == "audio/wav")
        .map(|(id, _)| id.as_str())
        .collect();
    audio_ids.sort_unstable();
    assert_eq!(audio_ids, vec!["audio_p0", "audio_p2"]);
}

#[test]
fn test_chapter_audio() {
    let request = ExportRequest::new("T", ["a"]).with_chapter_audio(wav(9));
    let bytes = write_epub(&request).unwrap();

    let mut archive = ZipArchive::new(Cursor::new(&bytes[..])).unwrap();
    let mut file = archive.by_name("OEBPS/audio/audio_chapter.wav").unwrap();
    let mut data = Vec::new();
    file.read_to_end(&mut data).unwrap();
    assert_eq!(data, wav(9));
}

#[test]
fn test_manifest_and_single_reading_order_entry() {
    let request = ExportRequest::new("T", ["a", "b"])
        .with_chapter_audio(wav(1))
        .with_paragraph_audio(1, wav(2));
    let bytes = write_epub(&request).unwrap();

    let opf = entry(&bytes, PACKAGE_DOCUMENT_PATH).unwrap();
    let package = parse_opf(&opf).unwrap();

    assert_eq!(package.spine_ids, vec!["chapter".to_string()]);
    assert_eq!(package.href("chapter"), Some("chapter.xhtml"));
    assert_eq!(package.href("nav"), Some("nav.xhtml"));
    assert_eq!(package.href("style"), Some("style.css"));
    assert_eq!(package.href("audio_chapter"), Some("audio/audio_chapter.wav"));
    assert_eq!(package.href("audio_p1"), Some("audio/audio_p1.wav"));
    assert_eq!(package.manifest.len(), 5);
    assert_eq!(package.manifest["audio_p1"].media_type, "audio/wav");
    assert_eq!(package.title.as_deref(), Some("T"));
}

#[test]
fn test_out_of_range_keys_are_ignored() {
    let request = ExportRequest::new("T", ["only paragraph"])
        .with_translation(0, "única")
        .with_translation(5, "nowhere")
        .with_analysis(3, "**ignored**")
        .with_paragraph_audio(7, wav(7));
    assert_eq!(request.out_of_range_keys(), vec![3, 5, 7]);

    let bytes = write_epub(&request).unwrap();
    let chapter = entry(&bytes, "OEBPS/chapter.xhtml").unwrap();

    assert!(chapter.contains(r#"<p class="translation">única</p>"#));
    assert!(!chapter.contains("nowhere"));
    assert!(!chapter.contains("ignored"));
    assert!(names(&bytes).iter().all(|n| !n.ends_with(".wav")));
}

#[test]
fn test_analysis_markdown_is_rendered() {
    let request = ExportRequest::new("T", ["hola"]).with_analysis(
        0,
        "### Vocabulary\n- **hola**: *hello*\n> greeting\n---\n\nuse `hola`",
    );
    let bytes = write_epub(&request).unwrap();
    let chapter = entry(&bytes, "OEBPS/chapter.xhtml").unwrap();

    assert!(chapter.contains(r#"<div class="analysis">"#));
    assert!(chapter.contains("<h3>Vocabulary</h3>"));
    assert!(chapter.contains("<p>- <strong>hola</strong>: <em>hello</em></p>"));
    assert!(chapter.contains("<blockquote><p>greeting</p></blockquote>"));
    assert!(chapter.contains("<hr/>"));
    assert!(chapter.contains("<br/>"));
    assert!(chapter.contains("<p>use <code>hola</code></p>"));
}

#[test]
fn test_chapter_document_is_well_formed_with_awkward_markdown() {
    let analyses = [
        "***important*** note",
        "`a*b` and *c*",
        "**x `y** z`",
        "***both***\n**a*\n`*x*`",
        "# *open\n> **nested *inner* bold**",
        "a < b && c > d *ok*",
    ];
    let request = ExportRequest::new("T", vec!["p"; analyses.len()]).with_analyses(analyses);
    let bytes = write_epub(&request).unwrap();

    for name in ["OEBPS/chapter.xhtml", "OEBPS/nav.xhtml", PACKAGE_DOCUMENT_PATH] {
        let xml = entry(&bytes, name).unwrap();
        if let Err(e) = check_well_formed(&xml) {
            panic!("{name} is not well-formed ({e}):\n{xml}");
        }
    }

    let chapter = entry(&bytes, "OEBPS/chapter.xhtml").unwrap();
    assert!(chapter.contains("<p><strong>*important</strong>* note</p>"));
    assert!(chapter.contains("<p><code>a*b</code> and <em>c</em></p>"));
}

#[test]
fn test_empty_paragraph_list() {
    let bytes = write_epub(&ExportRequest::new("Empty", Vec::<String>::new())).unwrap();

    let chapter = entry(&bytes, "OEBPS/chapter.xhtml").unwrap();
    assert!(!chapter.contains("class=\"paragraph\""));

    let chapters = EpubReader::new()
        .with_min_content_chars(0)
        .read(&bytes)
        .unwrap();
    assert_eq!(chapters[0].content, "Empty");
}

#[test]
fn test_write_to_file_with_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.epub");

    let writer = EpubWriter::new().with_config(WriterConfig {
        compression_level: Some(0),
        language: "fr".to_string(),
    });
    let file = std::fs::File::create(&path).unwrap();
    writer
        .write_to_writer(&ExportRequest::new("Titre", ["Bonjour tout le monde."]), file)
        .unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let opf = entry(&bytes, PACKAGE_DOCUMENT_PATH).unwrap();
    assert_eq!(parse_opf(&opf).unwrap().language.as_deref(), Some("fr"));
    let chapter = entry(&bytes, "OEBPS/chapter.xhtml").unwrap();
    assert!(chapter.contains(r#"xml:lang="fr""#));
}

#[test]
fn test_translations_map_round_trips_through_paragraph_sections() {
    let translations: BTreeMap<usize, String> =
        [(1, "dos".to_string())].into_iter().collect();
    let mut request = ExportRequest::new("T", ["one", "two"]);
    request.translations = translations;

    let bytes = write_epub(&request).unwrap();
    let chapters = EpubReader::new()
        .with_min_content_chars(0)
        .read(&bytes)
        .unwrap();
    assert_eq!(chapters[0].paragraphs(), vec!["T", "one", "two", "dos"]);
}
