//! PPTX package reader.
//!
//! Reads a package back into slides and shapes with their positions, text
//! and embedded media. Used to inspect generated decks.

use crate::error::{Error, Result};
use crate::parts::{PRESENTATION_PATH, PRESENTATION_RELS_PATH};
use deck_core::Frame;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use std::collections::HashMap;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// A read-back view of a package.
#[derive(Debug, Clone, Serialize)]
pub struct DeckSummary {
    pub slide_width: i64,
    pub slide_height: i64,

    /// Slides in presentation order.
    pub slides: Vec<SlideSummary>,

    /// Names of all parts under `ppt/media/`.
    pub media: Vec<String>,
}

/// Shapes found on one slide.
#[derive(Debug, Clone, Serialize)]
pub struct SlideSummary {
    /// 1-based slide number.
    pub number: usize,

    /// Shapes in document (z) order.
    pub shapes: Vec<ShapeSummary>,
}

impl SlideSummary {
    /// The text of every text shape, in document order.
    pub fn texts(&self) -> Vec<&str> {
        self.shapes
            .iter()
            .filter(|s| s.kind == ShapeKind::Text)
            .map(|s| s.text.as_str())
            .collect()
    }
}

/// Kind of shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShapeKind {
    Text,
    Picture,
}

/// A shape with its position and content.
#[derive(Debug, Clone, Serialize)]
pub struct ShapeSummary {
    pub kind: ShapeKind,
    pub frame: Frame,

    /// Paragraphs and line breaks are joined with `\n`.
    pub text: String,

    /// Size of the first run that declares one.
    pub font_size_pt: Option<u32>,

    /// Resolved media part for pictures.
    pub image: Option<String>,
}

impl ShapeSummary {
    fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            frame: Frame::new(0, 0, 0, 0),
            text: String::new(),
            font_size_pt: None,
            image: None,
        }
    }
}

/// Reader for PPTX packages.
pub struct PptxReader;

impl PptxReader {
    /// Create a new PPTX reader.
    pub fn new() -> Self {
        Self
    }

    /// Read a package from a reader.
    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<DeckSummary> {
        let mut archive = ZipArchive::new(reader)?;

        let presentation = self.read_file_from_archive(&mut archive, PRESENTATION_PATH)?;
        let rels = self.read_relationships(&mut archive, PRESENTATION_RELS_PATH, PRESENTATION_PATH)?;
        let (slide_ids, (slide_width, slide_height)) = parse_presentation(&presentation)?;

        let mut slides = Vec::with_capacity(slide_ids.len());
        for (index, rel_id) in slide_ids.iter().enumerate() {
            let path = rels.get(rel_id).ok_or_else(|| {
                Error::Corrupted(format!("slide relationship '{}' not found", rel_id))
            })?;
            slides.push(self.parse_slide(&mut archive, path, index + 1)?);
        }

        let mut media: Vec<String> = archive
            .file_names()
            .filter(|name| name.starts_with("ppt/media/"))
            .map(str::to_string)
            .collect();
        media.sort();

        Ok(DeckSummary {
            slide_width,
            slide_height,
            slides,
            media,
        })
    }

    /// Read a relationships part into a map of id to resolved part path.
    fn read_relationships<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        rels_path: &str,
        source_part: &str,
    ) -> Result<HashMap<String, String>> {
        let content = self.read_file_from_archive(archive, rels_path)?;
        let mut rels = HashMap::new();

        let mut reader = Reader::from_str(&content);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if local_name(e.name().as_ref()) == b"Relationship" =>
                {
                    let id = attribute(e, b"Id");
                    let target = attribute(e, b"Target");
                    let external = attribute(e, b"TargetMode").as_deref() == Some("External");

                    if let (Some(id), Some(target)) = (id, target) {
                        let resolved = if external {
                            target
                        } else {
                            resolve_target(source_part, &target)
                        };
                        rels.insert(id, resolved);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Xml(format!(
                        "Error parsing relationships '{}': {}",
                        rels_path, e
                    )));
                }
                _ => {}
            }
        }

        Ok(rels)
    }

    /// Parse a single slide from the archive.
    fn parse_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        slide_number: usize,
    ) -> Result<SlideSummary> {
        let content = self.read_file_from_archive(archive, slide_path)?;
        let rels_path = rels_path_for(slide_path);
        let rels = if archive.by_name(&rels_path).is_ok() {
            self.read_relationships(archive, &rels_path, slide_path)?
        } else {
            HashMap::new()
        };

        let shapes = self.extract_shapes_from_xml(&content, &rels)?;
        log::debug!("{}: {} shapes", slide_path, shapes.len());

        Ok(SlideSummary {
            number: slide_number,
            shapes,
        })
    }

    /// Extract shapes with position, text and media from slide XML.
    fn extract_shapes_from_xml(
        &self,
        xml_content: &str,
        rels: &HashMap<String, String>,
    ) -> Result<Vec<ShapeSummary>> {
        let mut shapes = Vec::new();
        let mut reader = Reader::from_str(xml_content);
        reader.trim_text(true);

        let mut current_shape: Option<ShapeSummary> = None;
        let mut in_text_body = false;
        let mut in_text = false;
        let mut paragraph_count = 0;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                    b"sp" => {
                        current_shape = Some(ShapeSummary::new(ShapeKind::Text));
                        paragraph_count = 0;
                    }
                    b"pic" => {
                        current_shape = Some(ShapeSummary::new(ShapeKind::Picture));
                    }
                    b"txBody" => {
                        in_text_body = true;
                    }
                    b"p" if in_text_body => {
                        if let Some(ref mut shape) = current_shape {
                            if paragraph_count > 0 {
                                shape.text.push('\n');
                            }
                        }
                        paragraph_count += 1;
                    }
                    b"t" if in_text_body => {
                        in_text = true;
                    }
                    b"br" if in_text_body => {
                        if let Some(ref mut shape) = current_shape {
                            shape.text.push('\n');
                        }
                    }
                    name => {
                        if let Some(ref mut shape) = current_shape {
                            apply_properties(shape, name, e, rels);
                        }
                    }
                },
                Ok(Event::Empty(ref e)) => {
                    let name = e.name();
                    let name = local_name(name.as_ref());
                    if let Some(ref mut shape) = current_shape {
                        if name == b"br" && in_text_body {
                            shape.text.push('\n');
                        } else {
                            apply_properties(shape, name, e, rels);
                        }
                    }
                }
                Ok(Event::Text(ref e)) => {
                    if in_text {
                        if let Some(ref mut shape) = current_shape {
                            let text = e
                                .unescape()
                                .map_err(|e| Error::Xml(format!("Bad text content: {}", e)))?;
                            shape.text.push_str(&text);
                        }
                    }
                }
                Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                    b"sp" | b"pic" => {
                        if let Some(shape) = current_shape.take() {
                            shapes.push(shape);
                        }
                        in_text_body = false;
                        in_text = false;
                    }
                    b"txBody" => {
                        in_text_body = false;
                    }
                    b"t" => {
                        in_text = false;
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Xml(format!("Error parsing slide: {}", e)));
                }
                _ => {}
            }
        }

        Ok(shapes)
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::Corrupted(format!("File not found in archive '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::Zip(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl Default for PptxReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Record position, size, font size or media reference from a shape child.
fn apply_properties(
    shape: &mut ShapeSummary,
    name: &[u8],
    e: &BytesStart<'_>,
    rels: &HashMap<String, String>,
) {
    match name {
        b"off" => {
            if let (Some(x), Some(y)) = (attribute_i64(e, b"x"), attribute_i64(e, b"y")) {
                shape.frame.left = x;
                shape.frame.top = y;
            }
        }
        b"ext" => {
            if let (Some(cx), Some(cy)) = (attribute_i64(e, b"cx"), attribute_i64(e, b"cy")) {
                shape.frame.width = cx;
                shape.frame.height = cy;
            }
        }
        b"rPr" if shape.font_size_pt.is_none() => {
            shape.font_size_pt = attribute_i64(e, b"sz").map(|sz| (sz / 100) as u32);
        }
        b"blip" => {
            if let Some(rel_id) = attribute(e, b"embed") {
                shape.image = rels.get(&rel_id).cloned();
            }
        }
        _ => {}
    }
}

/// Slide relationship ids in order, and the slide size, from presentation.xml.
fn parse_presentation(xml_content: &str) -> Result<(Vec<String>, (i64, i64))> {
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(true);

    let mut slide_ids = Vec::new();
    let mut size = (0, 0);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                match local_name(e.name().as_ref()) {
                    b"sldId" => {
                        if let Some(rel_id) = attribute(e, b"r:id") {
                            slide_ids.push(rel_id);
                        }
                    }
                    b"sldSz" => {
                        size = (
                            attribute_i64(e, b"cx").unwrap_or_default(),
                            attribute_i64(e, b"cy").unwrap_or_default(),
                        );
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Xml(format!("Error parsing presentation: {}", e)));
            }
            _ => {}
        }
    }

    Ok((slide_ids, size))
}

/// Look up an attribute by qualified name, or by local name when `name`
/// has no prefix.
fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    let qualified = name.contains(&b':');
    e.attributes().flatten().find_map(|attr| {
        let key = attr.key.as_ref();
        let matches = if qualified {
            key == name
        } else {
            local_name(key) == name
        };
        matches.then(|| String::from_utf8_lossy(&attr.value).to_string())
    })
}

fn attribute_i64(e: &BytesStart<'_>, name: &[u8]) -> Option<i64> {
    attribute(e, name).and_then(|v| v.parse().ok())
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Path of the relationships part belonging to `part`.
fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the directory of its source part.
fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            other => segments.push(other),
        }
    }
    segments.join("/")
}
