//! EPUB container reading and writing.
//!
//! Reading resolves `META-INF/container.xml` to the package descriptor,
//! walks the reading order and extracts one [`Chapter`](crate::Chapter)
//! per usable content document. Writing produces a single-chapter EPUB 3
//! study package from an [`ExportRequest`](crate::ExportRequest).

mod content;
mod manifest;
mod parser;
mod reader;
mod writer;

pub use content::{
    AUDIO_DIR, AssembledDocument, AudioReference, CHAPTER_AUDIO_NAME, CONTENT_DOCUMENT_HREF,
    NAV_DOCUMENT_HREF, STYLESHEET, STYLESHEET_HREF, assemble, audio_href, paragraph_audio_name,
    render_nav,
};
pub use manifest::{ManifestBuilder, PackageMetadata};
pub use parser::{CONTAINER_PATH, ManifestItem, PackageDocument, parse_container_xml, parse_opf};
pub use reader::{
    DEFAULT_MIN_CONTENT_CHARS, EpubReader, ReaderConfig, read_chapters, read_chapters_from_path,
    read_chapters_from_reader,
};
pub use writer::{
    DEFAULT_COMPRESSION_LEVEL, EpubWriter, PACKAGE_DIR, PACKAGE_DOCUMENT_PATH, WriterConfig,
    write_epub, write_epub_to_path, write_epub_to_writer,
};
