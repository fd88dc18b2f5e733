//! WASM bindings for in-browser chapter extraction and package generation.
//!
//! This module exposes the reader and writer to JavaScript via wasm-bindgen.

use std::collections::BTreeMap;

use wasm_bindgen::prelude::*;

use crate::epub::{EpubWriter, WriterConfig, read_chapters};
use crate::model::ExportRequest;

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Extract chapters from EPUB bytes.
///
/// Returns a JSON array of `{ id, title, content }` objects.
#[wasm_bindgen]
pub fn parse_epub(data: &[u8]) -> Result<String, JsValue> {
    let chapters = read_chapters(data).map_err(to_js)?;
    serde_json::to_string(&chapters).map_err(to_js)
}

/// Build a single-chapter study package.
///
/// `request_json` holds `title`, `paragraphs`, and optional `translations`,
/// `analyses` and `language`; the maps are keyed by paragraph index. Audio is
/// passed as raw WAV bytes: `chapter_audio` may be empty, and
/// `paragraph_audio` is the concatenation of the clips for
/// `audio_indices`, split by `audio_lengths`.
#[wasm_bindgen]
pub fn generate_epub(
    request_json: &str,
    chapter_audio: &[u8],
    audio_indices: &[u32],
    audio_lengths: &[u32],
    paragraph_audio: &[u8],
) -> Result<Vec<u8>, JsValue> {
    let input: RequestInput = serde_json::from_str(request_json).map_err(to_js)?;
    if audio_indices.len() != audio_lengths.len() {
        return Err(JsValue::from_str(
            "audio_indices and audio_lengths differ in length",
        ));
    }

    let mut request = ExportRequest::new(input.title, input.paragraphs);
    request.translations = input.translations;
    request.analyses = input.analyses;
    if !chapter_audio.is_empty() {
        request = request.with_chapter_audio(chapter_audio);
    }

    let clips = split_clips(audio_indices, audio_lengths, paragraph_audio)
        .ok_or_else(|| JsValue::from_str("paragraph_audio is shorter than audio_lengths"))?;
    for (index, clip) in clips {
        request = request.with_paragraph_audio(index, clip);
    }

    let mut config = WriterConfig::default();
    if let Some(language) = input.language {
        config.language = language;
    }
    EpubWriter::new()
        .with_config(config)
        .write(&request)
        .map_err(to_js)
}

#[derive(serde::Deserialize)]
struct RequestInput {
    title: String,
    #[serde(default)]
    paragraphs: Vec<String>,
    #[serde(default)]
    translations: BTreeMap<usize, String>,
    #[serde(default)]
    analyses: BTreeMap<usize, String>,
    #[serde(default)]
    language: Option<String>,
}

/// Cut the concatenated clip buffer into `(paragraph index, clip)` pairs.
/// `None` when the lengths run past the end of `data`.
fn split_clips<'a>(
    indices: &[u32],
    lengths: &[u32],
    data: &'a [u8],
) -> Option<Vec<(usize, &'a [u8])>> {
    let mut offset = 0usize;
    let mut clips = Vec::with_capacity(indices.len());
    for (&index, &len) in indices.iter().zip(lengths) {
        let end = offset.checked_add(len as usize)?;
        clips.push((index as usize, data.get(offset..end)?));
        offset = end;
    }
    Some(clips)
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}
