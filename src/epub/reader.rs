use std::io::{Cursor, Read, Seek};
use std::path::Path;

use zip::ZipArchive;
use zip::result::ZipError;

use super::parser::{CONTAINER_PATH, parse_container_xml, parse_opf};
use crate::dom::extract_chapter;
use crate::error::{Error, Result};
use crate::model::Chapter;
use crate::util::{decode_markup, parent_dir, percent_decode_path, resolve_href};

/// Chapters whose trimmed content has this many characters or fewer are
/// treated as stubs (covers, blank separators) and dropped.
pub const DEFAULT_MIN_CONTENT_CHARS: usize = 10;

/// Configuration for chapter extraction.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Stub threshold, see [`DEFAULT_MIN_CONTENT_CHARS`].
    pub min_content_chars: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            min_content_chars: DEFAULT_MIN_CONTENT_CHARS,
        }
    }
}

/// Reads an EPUB into an ordered list of plain-text chapters.
///
/// Container-level problems (not a zip, no `container.xml`, no rootfile, no
/// package descriptor) fail the whole read with [`Error::Format`]. Problems
/// with individual reading-order entries never do: an entry that is not in
/// the manifest or whose document is missing from the archive is skipped.
/// A document that is present but cannot be decompressed or fails its
/// checksum is an archive error and fails the read ([`Error::Io`] or
/// [`Error::Zip`]).
///
/// # Example
///
/// ```no_run
/// use glossa::EpubReader;
///
/// let bytes = std::fs::read("book.epub")?;
/// let chapters = EpubReader::new().with_min_content_chars(40).read(&bytes)?;
/// for chapter in &chapters {
///     println!("{}: {}", chapter.id, chapter.title);
/// }
/// # Ok::<(), glossa::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct EpubReader {
    config: ReaderConfig,
}

impl EpubReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: ReaderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_min_content_chars(mut self, min_content_chars: usize) -> Self {
        self.config.min_content_chars = min_content_chars;
        self
    }

    /// Read chapters from in-memory archive bytes.
    pub fn read(&self, bytes: &[u8]) -> Result<Vec<Chapter>> {
        self.read_from_reader(Cursor::new(bytes))
    }

    /// Read chapters from any [`Read`] + [`Seek`] source.
    pub fn read_from_reader<R: Read + Seek>(&self, reader: R) -> Result<Vec<Chapter>> {
        let mut archive =
            ZipArchive::new(reader).map_err(|_| Error::format("not a valid container"))?;

        // 1. container.xml -> package descriptor path
        let container = match read_entry(&mut archive, CONTAINER_PATH)? {
            Some(bytes) => bytes,
            None => return Err(Error::format("missing container descriptor")),
        };
        let opf_path = parse_container_xml(&container)?;

        // 2. Package descriptor -> manifest + reading order
        let opf_bytes = match read_entry(&mut archive, &opf_path) {
            Ok(Some(bytes)) => bytes,
            Ok(None) | Err(_) => return Err(Error::format("missing package descriptor")),
        };
        let package = parse_opf(&decode_markup(&opf_bytes))?;
        let opf_dir = parent_dir(&opf_path);

        // 3. Resolve, extract and filter each reading-order document
        let mut retained = Vec::new();
        for (index, idref) in package.spine_ids.iter().enumerate() {
            let position = index + 1;

            let Some(href) = package.href(idref) else {
                log::debug!("reading-order entry {idref:?} is not in the manifest, skipping");
                continue;
            };

            let path = resolve_href(opf_dir, href);
            // A document that exists but fails to decode is an archive error,
            // not a broken reading-order entry.
            let Some(bytes) = read_entry(&mut archive, &path)? else {
                log::debug!("reading-order document {path:?} is not in the archive, skipping");
                continue;
            };

            let extracted = extract_chapter(&decode_markup(&bytes), position);
            let content = extracted.content.trim();
            if content.chars().count() <= self.config.min_content_chars {
                log::debug!("dropping stub chapter {position} ({path:?})");
                continue;
            }

            retained.push((extracted.title, content.to_string()));
        }

        // 4. Dense ids over the retained chapters only
        Ok(retained
            .into_iter()
            .enumerate()
            .map(|(i, (title, content))| Chapter::new(i + 1, title, content))
            .collect())
    }
}

/// Read the chapters of an EPUB held in memory, with default settings.
///
/// The default stub threshold also applies to packages from
/// [`write_epub`](crate::write_epub): a single-chapter package whose title
/// and paragraphs total 10 characters or fewer reads back as no chapters.
/// Use `EpubReader::new().with_min_content_chars(0)` to keep it.
pub fn read_chapters(bytes: &[u8]) -> Result<Vec<Chapter>> {
    EpubReader::new().read(bytes)
}

/// Read the chapters of an EPUB from any [`Read`] + [`Seek`] source.
pub fn read_chapters_from_reader<R: Read + Seek>(reader: R) -> Result<Vec<Chapter>> {
    EpubReader::new().read_from_reader(reader)
}

/// Read the chapters of an EPUB file on disk.
pub fn read_chapters_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Chapter>> {
    let file = std::fs::File::open(path)?;
    EpubReader::new().read_from_reader(file)
}

/// Read one archive entry. `Ok(None)` means the entry does not exist, either
/// as written or percent-decoded.
fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<Option<Vec<u8>>> {
    match read_entry_exact(archive, path)? {
        Some(bytes) => Ok(Some(bytes)),
        None => match percent_decode_path(path) {
            Some(decoded) => read_entry_exact(archive, &decoded),
            None => Ok(None),
        },
    }
}

fn read_entry_exact<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> Result<Option<Vec<u8>>> {
    match archive.by_name(path) {
        Ok(mut file) => {
            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            Ok(Some(contents))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
