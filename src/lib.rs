//! # glossa
//!
//! Chapter text extraction from EPUB files and generation of single-chapter
//! bilingual study packages.
//!
//! ## Features
//!
//! - Read EPUB 2/3 containers into an ordered list of plain-text [`Chapter`]s
//! - Tolerant of broken reading-order entries, odd encodings and tag soup
//! - Write EPUB 3 packages pairing each paragraph with its translation, a
//!   markdown analysis and optional WAV narration
//!
//! ## Quick Start
//!
//! ```no_run
//! use glossa::{ExportRequest, read_chapters_from_path, write_epub};
//!
//! let chapters = read_chapters_from_path("novel.epub")?;
//! let first = &chapters[0];
//!
//! let request = ExportRequest::from_chapter(first)
//!     .with_translation(0, "First paragraph, translated.")
//!     .with_analysis(0, "**key word**: *meaning*");
//! let bytes = write_epub(&request)?;
//! std::fs::write(glossa::suggested_file_name(&first.title), bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Tuning
//!
//! ```
//! use glossa::{EpubReader, EpubWriter, WriterConfig};
//!
//! // Keep even very short chapters.
//! let reader = EpubReader::new().with_min_content_chars(0);
//!
//! let writer = EpubWriter::new().with_config(WriterConfig {
//!     compression_level: Some(9),
//!     language: "es".to_string(),
//! });
//! # let _ = (reader, writer);
//! ```

pub mod dom;
pub mod epub;
pub mod error;
pub mod markdown;
pub mod model;
pub mod providers;
pub(crate) mod util;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use epub::{
    EpubReader, EpubWriter, ReaderConfig, WriterConfig, read_chapters, read_chapters_from_path,
    read_chapters_from_reader, write_epub, write_epub_to_path, write_epub_to_writer,
};
pub use error::{Error, Result};
pub use model::{AudioAsset, Chapter, ExportRequest, ManifestEntry};
pub use util::suggested_file_name;
