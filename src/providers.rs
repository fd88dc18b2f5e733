//! Upstream collaborators that feed an [`ExportRequest`].
//!
//! Nothing here talks to a network or a speech engine. Hosts implement these
//! traits over whatever service they use and the helpers collect the output
//! into a request, keyed by paragraph index.

use crate::model::{AudioAsset, Chapter, ExportRequest};

/// Turns text into a WAV asset.
pub trait SpeechSynthesizer {
    type Error;

    fn synthesize(&self, text: &str) -> Result<AudioAsset, Self::Error>;
}

/// Produces one translation per input paragraph, index-aligned.
pub trait Translator {
    type Error;

    fn translate(&self, paragraphs: &[String]) -> Result<Vec<String>, Self::Error>;
}

/// Produces one markdown analysis per input paragraph, index-aligned.
pub trait Analyzer {
    type Error;

    fn analyze(&self, paragraphs: &[String]) -> Result<Vec<String>, Self::Error>;
}

/// Splits plain text into chapters with dense ids starting at 1.
pub trait ChapterSplitter {
    fn split(&self, text: &str) -> Vec<Chapter>;
}

impl<F> ChapterSplitter for F
where
    F: Fn(&str) -> Vec<Chapter>,
{
    fn split(&self, text: &str) -> Vec<Chapter> {
        self(text)
    }
}

/// Translate every paragraph of `request` and attach the results.
///
/// A translator returning fewer items than paragraphs leaves the trailing
/// paragraphs untranslated; extra items land on out-of-range indices and are
/// ignored when the package is written.
pub fn translate_into<T: Translator>(
    request: ExportRequest,
    translator: &T,
) -> Result<ExportRequest, T::Error> {
    let translations = translator.translate(&request.paragraphs)?;
    Ok(request.with_translations(translations))
}

/// Analyze every paragraph of `request` and attach the results.
pub fn analyze_into<A: Analyzer>(
    request: ExportRequest,
    analyzer: &A,
) -> Result<ExportRequest, A::Error> {
    let analyses = analyzer.analyze(&request.paragraphs)?;
    Ok(request.with_analyses(analyses))
}

/// Synthesize audio for each paragraph, and for the whole chapter when
/// `chapter` is set.
pub fn synthesize_into<S: SpeechSynthesizer>(
    mut request: ExportRequest,
    synthesizer: &S,
    chapter: bool,
) -> Result<ExportRequest, S::Error> {
    if chapter {
        let text = request.paragraphs.join(crate::model::PARAGRAPH_SEPARATOR);
        request.chapter_audio = Some(synthesizer.synthesize(&text)?);
    }
    for (index, paragraph) in request.paragraphs.iter().enumerate() {
        let asset = synthesizer.synthesize(paragraph)?;
        request.paragraph_audio.insert(index, asset);
    }
    Ok(request)
}
