//! Request/response values exchanged with the engine.
//!
//! Nothing here is persisted: a [`Chapter`] list is produced by one read, an
//! [`ExportRequest`] is consumed by one write.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Separator placed between paragraphs in [`Chapter::content`].
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// One chapter of plain paragraph text.
///
/// `id` is dense and 1-based over the chapters a single read retained; it does
/// not identify the chapter's position in the source reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Chapter {
    pub id: usize,
    pub title: String,
    pub content: String,
}

impl Chapter {
    pub fn new(id: usize, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
        }
    }

    /// Split the content back into its paragraphs.
    pub fn paragraphs(&self) -> Vec<&str> {
        self.content
            .split(PARAGRAPH_SEPARATOR)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }
}

/// A binary audio resource (WAV) supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AudioAsset {
    data: Vec<u8>,
}

impl AudioAsset {
    /// Media type of every audio entry written into a package.
    pub const MEDIA_TYPE: &'static str = "audio/wav";

    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl From<Vec<u8>> for AudioAsset {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for AudioAsset {
    fn from(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }
}

/// Everything needed to write one single-chapter study package.
///
/// The sparse maps are keyed by paragraph index. Keys outside
/// `0..paragraphs.len()` are never rendered; see [`ExportRequest::out_of_range_keys`].
#[derive(Debug, Clone, Default)]
pub struct ExportRequest {
    pub title: String,
    pub paragraphs: Vec<String>,
    pub translations: BTreeMap<usize, String>,
    pub analyses: BTreeMap<usize, String>,
    pub chapter_audio: Option<AudioAsset>,
    pub paragraph_audio: BTreeMap<usize, AudioAsset>,
}

impl ExportRequest {
    pub fn new<I, S>(title: impl Into<String>, paragraphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            paragraphs: paragraphs.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Build a request from an existing chapter's paragraphs.
    pub fn from_chapter(chapter: &Chapter) -> Self {
        Self::new(chapter.title.clone(), chapter.paragraphs())
    }

    pub fn with_translation(mut self, index: usize, text: impl Into<String>) -> Self {
        self.translations.insert(index, text.into());
        self
    }

    /// Attach index-aligned translations; entry `i` belongs to paragraph `i`.
    pub fn with_translations<I, S>(mut self, translations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.translations
            .extend(translations.into_iter().map(Into::into).enumerate());
        self
    }

    pub fn with_analysis(mut self, index: usize, markdown: impl Into<String>) -> Self {
        self.analyses.insert(index, markdown.into());
        self
    }

    /// Attach index-aligned analyses; entry `i` belongs to paragraph `i`.
    pub fn with_analyses<I, S>(mut self, analyses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.analyses
            .extend(analyses.into_iter().map(Into::into).enumerate());
        self
    }

    pub fn with_chapter_audio(mut self, audio: impl Into<AudioAsset>) -> Self {
        self.chapter_audio = Some(audio.into());
        self
    }

    pub fn with_paragraph_audio(mut self, index: usize, audio: impl Into<AudioAsset>) -> Self {
        self.paragraph_audio.insert(index, audio.into());
        self
    }

    /// Sparse-map keys that point past the last paragraph, in ascending order
    /// and without duplicates. Such keys are ignored by the writer.
    pub fn out_of_range_keys(&self) -> Vec<usize> {
        let len = self.paragraphs.len();
        let mut keys: Vec<usize> = self
            .translations
            .keys()
            .chain(self.analyses.keys())
            .chain(self.paragraph_audio.keys())
            .copied()
            .filter(|&k| k >= len)
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }
}

/// One resource declared in a package manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub id: String,
    /// Path relative to the package descriptor's directory.
    pub path: String,
    pub media_type: String,
    /// Space-separated EPUB 3 item properties (`nav`, ...).
    pub properties: Option<String>,
}

impl ManifestEntry {
    pub fn new(
        id: impl Into<String>,
        path: impl Into<String>,
        media_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            media_type: media_type.into(),
            properties: None,
        }
    }

    pub fn with_properties(mut self, properties: impl Into<String>) -> Self {
        self.properties = Some(properties.into());
        self
    }
}
