//! Manifest accumulation and package descriptor (OPF) rendering.

use crate::model::ManifestEntry;
use crate::util::escape_xml;

/// Metadata block of a generated package descriptor.
#[derive(Debug, Clone)]
pub struct PackageMetadata {
    /// Unique identifier, e.g. `urn:uuid:...`.
    pub identifier: String,
    pub title: String,
    pub language: String,
    /// `dcterms:modified` value, `YYYY-MM-DDThh:mm:ssZ`.
    pub modified: String,
}

/// Accumulates the resources of one package while it is being written.
///
/// Reading-order entries can only be added together with their manifest
/// entry, so every spine reference resolves.
#[derive(Debug, Clone, Default)]
pub struct ManifestBuilder {
    entries: Vec<ManifestEntry>,
    spine: Vec<String>,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource. An entry with an id already present replaces it in place.
    pub fn add(&mut self, entry: ManifestEntry) -> &mut Self {
        match self.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self
    }

    /// Add a resource and append it to the reading order.
    pub fn add_spine_item(&mut self, entry: ManifestEntry) -> &mut Self {
        let id = entry.id.clone();
        self.add(entry);
        if !self.spine.contains(&id) {
            self.spine.push(id);
        }
        self
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn spine(&self) -> &[String] {
        &self.spine
    }

    /// Render the EPUB 3 package descriptor.
    pub fn render_opf(&self, metadata: &PackageMetadata) -> String {
        let mut opf = String::new();

        opf.push_str(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="BookId">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
"#,
        );
        opf.push_str(&format!(
            "    <dc:identifier id=\"BookId\">{}</dc:identifier>\n",
            escape_xml(&metadata.identifier)
        ));
        opf.push_str(&format!(
            "    <dc:title>{}</dc:title>\n",
            escape_xml(&metadata.title)
        ));
        opf.push_str(&format!(
            "    <dc:language>{}</dc:language>\n",
            escape_xml(&metadata.language)
        ));
        opf.push_str(&format!(
            "    <meta property=\"dcterms:modified\">{}</meta>\n",
            escape_xml(&metadata.modified)
        ));

        opf.push_str("  </metadata>\n  <manifest>\n");
        for entry in &self.entries {
            let properties = entry
                .properties
                .as_deref()
                .map(|p| format!(" properties=\"{}\"", escape_xml(p)))
                .unwrap_or_default();
            opf.push_str(&format!(
                "    <item id=\"{}\" href=\"{}\" media-type=\"{}\"{}/>\n",
                escape_xml(&entry.id),
                escape_xml(&entry.path),
                escape_xml(&entry.media_type),
                properties
            ));
        }

        opf.push_str("  </manifest>\n  <spine>\n");
        for id in &self.spine {
            opf.push_str(&format!("    <itemref idref=\"{}\"/>\n", escape_xml(id)));
        }
        opf.push_str("  </spine>\n</package>\n");

        opf
    }
}
