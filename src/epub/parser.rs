//! Container and package descriptor parsing (`container.xml`, OPF).

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Error, Result};
use crate::util::strip_bom;

/// Fixed location of the container descriptor inside every package.
pub const CONTAINER_PATH: &str = "META-INF/container.xml";

/// A manifest item as declared by the package descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
    pub href: String,
    pub media_type: String,
}

/// Parsed package descriptor.
#[derive(Debug, Clone, Default)]
pub struct PackageDocument {
    /// Maps manifest id -> item.
    pub manifest: HashMap<String, ManifestItem>,
    /// Reading order as manifest ids, in document order.
    pub spine_ids: Vec<String>,
    pub title: Option<String>,
    pub language: Option<String>,
}

impl PackageDocument {
    /// Href of a reading-order id, if the manifest declares it.
    pub fn href(&self, id: &str) -> Option<&str> {
        self.manifest.get(id).map(|item| item.href.as_str())
    }
}

/// Parse `META-INF/container.xml` and return the first rootfile's `full-path`.
pub fn parse_container_xml(bytes: &[u8]) -> Result<String> {
    let content = String::from_utf8_lossy(strip_bom(bytes));

    let mut reader = Reader::from_str(&content);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if local_name(e.name().as_ref()) == b"rootfile" =>
            {
                return match attr(&e, b"full-path") {
                    Some(path) if !path.trim().is_empty() => Ok(path.trim().to_string()),
                    _ => Err(Error::format("missing rootfile pointer")),
                };
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::format(format!(
                    "malformed container descriptor: {e}"
                )));
            }
            _ => {}
        }
    }

    Err(Error::format("missing rootfile pointer"))
}

/// Parse an OPF package document into its manifest and reading order.
pub fn parse_opf(content: &str) -> Result<PackageDocument> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut package = PackageDocument::default();
    let mut in_metadata = false;
    let mut current_element: Option<&'static str> = None;
    let mut buf_text = String::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::format(format!("malformed package descriptor: {e}")))?;

        match event {
            Event::Start(e) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"metadata" => in_metadata = true,
                    b"title" if in_metadata && package.title.is_none() => {
                        current_element = Some("title");
                        buf_text.clear();
                    }
                    b"language" if in_metadata && package.language.is_none() => {
                        current_element = Some("language");
                        buf_text.clear();
                    }
                    // Non-self-closing items are rare but legal
                    b"item" => insert_item(&mut package, &e),
                    b"itemref" => push_itemref(&mut package, &e),
                    _ => {}
                }
            }
            Event::Empty(e) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"item" => insert_item(&mut package, &e),
                    b"itemref" => push_itemref(&mut package, &e),
                    _ => {}
                }
            }
            Event::Text(e) => {
                if current_element.is_some() {
                    buf_text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::GeneralRef(e) => {
                if current_element.is_some() {
                    let entity = String::from_utf8_lossy(e.as_ref());
                    if let Some(resolved) = resolve_entity(&entity) {
                        buf_text.push_str(&resolved);
                    }
                }
            }
            Event::End(e) => {
                let name = e.name();
                if local_name(name.as_ref()) == b"metadata" {
                    in_metadata = false;
                }

                if let Some(elem) = current_element.take() {
                    let value = buf_text.trim().to_string();
                    buf_text.clear();
                    if !value.is_empty() {
                        match elem {
                            "title" => package.title = Some(value),
                            "language" => package.language = Some(value),
                            _ => {}
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(package)
}

fn insert_item(package: &mut PackageDocument, e: &BytesStart<'_>) {
    let Some(id) = attr(e, b"id").filter(|id| !id.is_empty()) else {
        return;
    };
    let href = attr(e, b"href").unwrap_or_default();
    let media_type = attr(e, b"media-type").unwrap_or_default();
    package.manifest.insert(id, ManifestItem { href, media_type });
}

fn push_itemref(package: &mut PackageDocument, e: &BytesStart<'_>) {
    if let Some(idref) = attr(e, b"idref").filter(|id| !id.is_empty()) {
        package.spine_ids.push(idref);
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

/// Unescaped value of the attribute with the given local name.
fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| local_name(a.key.as_ref()) == key)
        .map(|a| {
            let raw = String::from_utf8_lossy(a.value.as_ref()).into_owned();
            match quick_xml::escape::unescape(&raw) {
                Ok(unescaped) => unescaped.into_owned(),
                Err(_) => raw,
            }
        })
}

/// Extract local name from namespaced XML name (e.g., "dc:title" -> "title").
fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name)
}

/// Resolve XML entity references.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok()
    } else {
        None
    };

    code.and_then(char::from_u32).map(|c| c.to_string())
}
