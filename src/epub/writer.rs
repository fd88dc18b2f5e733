use std::io::{Cursor, Seek, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::content::{
    CONTENT_DOCUMENT_HREF, NAV_DOCUMENT_HREF, STYLESHEET, STYLESHEET_HREF, assemble, render_nav,
};
use super::manifest::{ManifestBuilder, PackageMetadata};
use super::parser::CONTAINER_PATH;
use crate::error::Result;
use crate::model::{AudioAsset, ExportRequest, ManifestEntry};

/// Archive directory holding every package resource.
pub const PACKAGE_DIR: &str = "OEBPS";

/// Path of the package descriptor that `container.xml` points at.
pub const PACKAGE_DOCUMENT_PATH: &str = "OEBPS/content.opf";

const MIMETYPE: &[u8] = b"application/epub+zip";

const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

const XHTML_MEDIA_TYPE: &str = "application/xhtml+xml";
const CSS_MEDIA_TYPE: &str = "text/css";

/// Deflate level used when none is configured.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Configuration for package generation.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Deflate level (0-9) for every entry except `mimetype`. Default 6.
    pub compression_level: Option<u32>,
    /// Language tag written to the package metadata and documents.
    pub language: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression_level: None,
            language: "en".to_string(),
        }
    }
}

/// Writes single-chapter study packages.
///
/// Each call produces a complete EPUB 3 archive: `mimetype` (stored, first),
/// `META-INF/container.xml`, the stylesheet, one chapter document, a
/// navigation document, every referenced WAV asset, and the package
/// descriptor with a one-item reading order.
///
/// # Example
///
/// ```no_run
/// use glossa::{EpubWriter, ExportRequest};
///
/// let request = ExportRequest::new("Lección 1", ["Hola, ¿qué tal?"])
///     .with_translation(0, "Hello, how are you?")
///     .with_analysis(0, "**hola**: *hello*");
/// let bytes = EpubWriter::new().write(&request)?;
/// std::fs::write("leccion.epub", bytes)?;
/// # Ok::<(), glossa::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct EpubWriter {
    config: WriterConfig,
}

impl EpubWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: WriterConfig) -> Self {
        self.config = config;
        self
    }

    /// Generate the package in memory.
    pub fn write(&self, request: &ExportRequest) -> Result<Vec<u8>> {
        let cursor = self.write_to_writer(request, Cursor::new(Vec::new()))?;
        Ok(cursor.into_inner())
    }

    /// Generate the package into any [`Write`] + [`Seek`] destination and
    /// hand the destination back.
    pub fn write_to_writer<W: Write + Seek>(&self, request: &ExportRequest, writer: W) -> Result<W> {
        let ignored = request.out_of_range_keys();
        if !ignored.is_empty() {
            log::warn!(
                "{} paragraph(s) in {:?}; ignoring entries for indices {:?}",
                request.paragraphs.len(),
                request.title,
                ignored
            );
        }

        let mut zip = ZipWriter::new(writer);

        let level = self
            .config
            .compression_level
            .unwrap_or(DEFAULT_COMPRESSION_LEVEL);
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(level as i64));

        // 1. mimetype (must be first, uncompressed)
        zip.start_file("mimetype", stored)?;
        zip.write_all(MIMETYPE)?;

        // 2. container.xml
        zip.start_file(CONTAINER_PATH, deflated)?;
        zip.write_all(CONTAINER_XML.as_bytes())?;

        let mut manifest = ManifestBuilder::new();

        // 3. Stylesheet
        zip.start_file(package_path(STYLESHEET_HREF), deflated)?;
        zip.write_all(STYLESHEET.as_bytes())?;
        manifest.add(ManifestEntry::new("style", STYLESHEET_HREF, CSS_MEDIA_TYPE));

        // 4. Chapter document and navigation document
        let document = assemble(request, &self.config.language);
        zip.start_file(package_path(CONTENT_DOCUMENT_HREF), deflated)?;
        zip.write_all(document.xhtml.as_bytes())?;
        manifest.add_spine_item(ManifestEntry::new(
            "chapter",
            CONTENT_DOCUMENT_HREF,
            XHTML_MEDIA_TYPE,
        ));

        let nav = render_nav(&request.title, &self.config.language);
        zip.start_file(package_path(NAV_DOCUMENT_HREF), deflated)?;
        zip.write_all(nav.as_bytes())?;
        manifest.add(
            ManifestEntry::new("nav", NAV_DOCUMENT_HREF, XHTML_MEDIA_TYPE).with_properties("nav"),
        );

        // 5. Audio referenced by the chapter document
        for audio in &document.audio {
            zip.start_file(package_path(&audio.href), deflated)?;
            zip.write_all(audio.asset.as_bytes())?;
            manifest.add(ManifestEntry::new(
                audio.name.clone(),
                audio.href.clone(),
                AudioAsset::MEDIA_TYPE,
            ));
        }

        // 6. Package descriptor
        let metadata = PackageMetadata {
            identifier: format!("urn:uuid:{}", uuid::Uuid::new_v4()),
            title: request.title.clone(),
            language: self.config.language.clone(),
            modified: chrono::Utc::now()
                .format("%Y-%m-%dT%H:%M:%SZ")
                .to_string(),
        };
        zip.start_file(PACKAGE_DOCUMENT_PATH, deflated)?;
        zip.write_all(manifest.render_opf(&metadata).as_bytes())?;

        Ok(zip.finish()?)
    }
}

/// Generate a study package in memory with default settings.
pub fn write_epub(request: &ExportRequest) -> Result<Vec<u8>> {
    EpubWriter::new().write(request)
}

/// Generate a study package into any [`Write`] + [`Seek`] destination.
pub fn write_epub_to_writer<W: Write + Seek>(request: &ExportRequest, writer: W) -> Result<()> {
    EpubWriter::new().write_to_writer(request, writer)?;
    Ok(())
}

/// Generate a study package into a file on disk.
pub fn write_epub_to_path<P: AsRef<Path>>(request: &ExportRequest, path: P) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_epub_to_writer(request, file)
}

fn package_path(href: &str) -> String {
    format!("{PACKAGE_DIR}/{href}")
}
