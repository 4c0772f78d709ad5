//! PPTX package writer.

use crate::error::{Error, Result};
use crate::parts::*;
use deck_core::{Deck, Element, Frame, ImageFormat, Picture, Slide, TextBox};
use quick_xml::escape::escape;
use std::borrow::Cow;
use std::fmt::Write as FmtWrite;
use std::io::{Cursor, Seek, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// MIME type of a .pptx file, for HTTP responses.
pub const PPTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Application name recorded in the package properties.
const APPLICATION: &str = "deck";

/// Writer that serializes a [`Deck`] as a .pptx package.
#[derive(Debug, Clone, Default)]
pub struct PptxWriter {
    title: Option<String>,
}

impl PptxWriter {
    /// Create a new PPTX writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the document title stored in the core properties.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Serialize a deck into an in-memory package.
    pub fn to_bytes(&self, deck: &Deck) -> Result<Vec<u8>> {
        let cursor = self.write(deck, Cursor::new(Vec::new()))?;
        Ok(cursor.into_inner())
    }

    /// Serialize a deck into `writer`, returning it once the archive is finished.
    pub fn write<W: Write + Seek>(&self, deck: &Deck, writer: W) -> Result<W> {
        let mut zip = ZipWriter::new(writer);
        let xml_options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        let media_options = FileOptions::default().compression_method(CompressionMethod::Stored);

        let mut formats: Vec<ImageFormat> = Vec::new();
        for picture in deck.pictures() {
            if !formats.contains(&picture.image.format) {
                formats.push(picture.image.format);
            }
        }

        zip.start_file("[Content_Types].xml", xml_options)?;
        zip.write_all(content_types_xml(deck.len(), &formats)?.as_bytes())?;

        zip.start_file("_rels/.rels", xml_options)?;
        zip.write_all(
            relationships_xml(&[
                Relationship::new("rId1", REL_OFFICE_DOCUMENT, PRESENTATION_PATH),
                Relationship::new("rId2", REL_CORE_PROPERTIES, "docProps/core.xml"),
                Relationship::new("rId3", REL_EXTENDED_PROPERTIES, "docProps/app.xml"),
            ])?
            .as_bytes(),
        )?;

        zip.start_file("docProps/core.xml", xml_options)?;
        zip.write_all(core_properties_xml(self.title.as_deref())?.as_bytes())?;

        zip.start_file("docProps/app.xml", xml_options)?;
        zip.write_all(app_properties_xml(deck.len())?.as_bytes())?;

        zip.start_file(PRESENTATION_PATH, xml_options)?;
        zip.write_all(presentation_xml(deck)?.as_bytes())?;

        let mut presentation_rels = vec![
            Relationship::new(MASTER_REL_ID, REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml"),
            Relationship::new(THEME_REL_ID, REL_THEME, "theme/theme1.xml"),
        ];
        for index in 0..deck.len() {
            presentation_rels.push(Relationship::new(
                format!("rId{}", FIRST_SLIDE_REL + index),
                REL_SLIDE,
                format!("slides/slide{}.xml", index + 1),
            ));
        }
        zip.start_file(PRESENTATION_RELS_PATH, xml_options)?;
        zip.write_all(relationships_xml(&presentation_rels)?.as_bytes())?;

        zip.start_file(SLIDE_MASTER_PATH, xml_options)?;
        zip.write_all(SLIDE_MASTER_XML.as_bytes())?;

        zip.start_file(SLIDE_MASTER_RELS_PATH, xml_options)?;
        zip.write_all(
            relationships_xml(&[
                Relationship::new("rId1", REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
                Relationship::new("rId2", REL_THEME, "../theme/theme1.xml"),
            ])?
            .as_bytes(),
        )?;

        zip.start_file(SLIDE_LAYOUT_PATH, xml_options)?;
        zip.write_all(SLIDE_LAYOUT_XML.as_bytes())?;

        zip.start_file(SLIDE_LAYOUT_RELS_PATH, xml_options)?;
        zip.write_all(
            relationships_xml(&[Relationship::new(
                "rId1",
                REL_SLIDE_MASTER,
                "../slideMasters/slideMaster1.xml",
            )])?
            .as_bytes(),
        )?;

        zip.start_file(THEME_PATH, xml_options)?;
        zip.write_all(THEME_XML.as_bytes())?;

        let mut media_count = 0;
        for (index, slide) in deck.slides.iter().enumerate() {
            let number = index + 1;
            let mut rels = vec![Relationship::new(
                "rId1",
                REL_SLIDE_LAYOUT,
                "../slideLayouts/slideLayout1.xml",
            )];
            let mut embeds = Vec::new();

            for picture in slide.pictures() {
                media_count += 1;
                let name = format!("image{}.{}", media_count, picture.image.format.extension());
                let rel_id = format!("rId{}", rels.len() + 1);

                zip.start_file(format!("ppt/media/{}", name), media_options)?;
                zip.write_all(&picture.image.bytes)?;

                rels.push(Relationship::new(rel_id.clone(), REL_IMAGE, format!("../media/{}", name)));
                embeds.push(rel_id);
            }

            zip.start_file(format!("ppt/slides/slide{}.xml", number), xml_options)?;
            zip.write_all(slide_xml(slide, &embeds)?.as_bytes())?;

            zip.start_file(format!("ppt/slides/_rels/slide{}.xml.rels", number), xml_options)?;
            zip.write_all(relationships_xml(&rels)?.as_bytes())?;
        }

        log::debug!(
            "Wrote package with {} slides and {} media parts",
            deck.len(),
            media_count
        );

        Ok(zip.finish()?)
    }
}

/// A package relationship.
struct Relationship {
    id: String,
    rel_type: &'static str,
    target: String,
}

impl Relationship {
    fn new(id: impl Into<String>, rel_type: &'static str, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rel_type,
            target: target.into(),
        }
    }
}

fn relationships_xml(rels: &[Relationship]) -> Result<String> {
    let mut xml = String::with_capacity(256 + rels.len() * 160);
    xml.push_str(XML_DECLARATION);
    write!(xml, r#"<Relationships xmlns="{}">"#, NS_RELS)?;
    for rel in rels {
        write!(
            xml,
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            rel.id,
            rel.rel_type,
            escape(rel.target.as_str())
        )?;
    }
    xml.push_str("</Relationships>");
    Ok(xml)
}

fn content_types_xml(slide_count: usize, formats: &[ImageFormat]) -> Result<String> {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECLARATION);
    write!(xml, r#"<Types xmlns="{}">"#, NS_CONTENT_TYPES)?;
    write!(xml, r#"<Default Extension="rels" ContentType="{}"/>"#, CT_RELATIONSHIPS)?;
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    for format in formats {
        write!(
            xml,
            r#"<Default Extension="{}" ContentType="{}"/>"#,
            format.extension(),
            format.content_type()
        )?;
    }

    let overrides = [
        (PRESENTATION_PATH, CT_PRESENTATION),
        (SLIDE_MASTER_PATH, CT_SLIDE_MASTER),
        (SLIDE_LAYOUT_PATH, CT_SLIDE_LAYOUT),
        (THEME_PATH, CT_THEME),
        ("docProps/core.xml", CT_CORE_PROPERTIES),
        ("docProps/app.xml", CT_EXTENDED_PROPERTIES),
    ];
    for (part, content_type) in overrides {
        write!(xml, r#"<Override PartName="/{}" ContentType="{}"/>"#, part, content_type)?;
    }
    for number in 1..=slide_count {
        write!(
            xml,
            r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="{}"/>"#,
            number, CT_SLIDE
        )?;
    }

    xml.push_str("</Types>");
    Ok(xml)
}

fn presentation_xml(deck: &Deck) -> Result<String> {
    let mut xml = String::with_capacity(1024 + deck.len() * 48);
    xml.push_str(XML_DECLARATION);
    write!(
        xml,
        r#"<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">"#,
        NS_A, NS_R, NS_P
    )?;

    write!(
        xml,
        r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="{}"/></p:sldMasterIdLst>"#,
        MASTER_REL_ID
    )?;

    // An empty sldIdLst is invalid, so a deck without slides omits it.
    if !deck.is_empty() {
        xml.push_str("<p:sldIdLst>");
        for index in 0..deck.len() {
            write!(
                xml,
                r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                FIRST_SLIDE_ID + index,
                FIRST_SLIDE_REL + index
            )?;
        }
        xml.push_str("</p:sldIdLst>");
    }

    write!(
        xml,
        r#"<p:sldSz cx="{}" cy="{}"/>"#,
        deck.size.width, deck.size.height
    )?;
    xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
    xml.push_str("</p:presentation>");

    Ok(xml)
}

fn core_properties_xml(title: Option<&str>) -> Result<String> {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECLARATION);
    xml.push_str(concat!(
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
        r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
        r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
    ));
    if let Some(title) = title {
        write!(xml, "<dc:title>{}</dc:title>", escape_text(title))?;
    }
    write!(xml, "<dc:creator>{}</dc:creator>", APPLICATION)?;
    xml.push_str("<cp:revision>1</cp:revision>");
    xml.push_str("</cp:coreProperties>");
    Ok(xml)
}

fn app_properties_xml(slide_count: usize) -> Result<String> {
    let mut xml = String::with_capacity(256);
    xml.push_str(XML_DECLARATION);
    xml.push_str(r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">"#);
    write!(xml, "<Application>{}</Application>", APPLICATION)?;
    write!(xml, "<Slides>{}</Slides>", slide_count)?;
    xml.push_str("</Properties>");
    Ok(xml)
}

/// Generate slide XML. `embeds` holds the media relationship id of each
/// picture on the slide, in element order.
fn slide_xml(slide: &Slide, embeds: &[String]) -> Result<String> {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECLARATION);
    write!(
        xml,
        r#"<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
        NS_A, NS_R, NS_P
    )?;
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(SP_TREE_HEADER);

    let mut embeds = embeds.iter();
    for (index, element) in slide.elements.iter().enumerate() {
        // Id 1 belongs to the shape tree itself.
        let shape_id = index + 2;
        match element {
            Element::TextBox(text) => write_text_box(&mut xml, shape_id, text)?,
            Element::Picture(picture) => {
                let rel_id = embeds.next().ok_or_else(|| {
                    Error::Corrupted(format!("picture {} has no media relationship", shape_id))
                })?;
                write_picture(&mut xml, shape_id, picture, rel_id)?;
            }
        }
    }

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");
    Ok(xml)
}

/// Escape user text for element content and attribute values.
///
/// Control characters XML 1.0 does not allow are written as `_xHHHH_`,
/// the OOXML escape form, before the usual markup escaping.
fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_restricted_char) {
        return escape(text);
    }

    let mut sanitized = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if is_restricted_char(c) {
            sanitized.push_str(&format!("_x{:04X}_", u32::from(c)));
        } else {
            sanitized.push(c);
        }
    }
    Cow::Owned(escape(&sanitized).into_owned())
}

fn is_restricted_char(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}')
}

fn write_xfrm(xml: &mut String, frame: &Frame) -> Result<()> {
    xml.push_str("<a:xfrm>");
    write!(xml, r#"<a:off x="{}" y="{}"/>"#, frame.left, frame.top)?;
    write!(xml, r#"<a:ext cx="{}" cy="{}"/>"#, frame.width, frame.height)?;
    xml.push_str("</a:xfrm>");
    Ok(())
}

fn write_text_box(xml: &mut String, shape_id: usize, text: &TextBox) -> Result<()> {
    xml.push_str("<p:sp><p:nvSpPr>");
    write!(
        xml,
        r#"<p:cNvPr id="{}" name="TextBox {}"/>"#,
        shape_id,
        shape_id - 1
    )?;
    xml.push_str(r#"<p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#);

    xml.push_str("<p:spPr>");
    write_xfrm(xml, &text.frame)?;
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/>"#);
    xml.push_str("</p:spPr>");

    xml.push_str("<p:txBody>");
    xml.push_str(r#"<a:bodyPr wrap="square" rtlCol="0"><a:spAutoFit/></a:bodyPr>"#);
    xml.push_str("<a:lstStyle/>");
    xml.push_str(r#"<a:p><a:pPr algn="ctr"/>"#);

    let mut run_properties = String::new();
    write!(
        run_properties,
        r#"<a:rPr lang="en-US" sz="{}" dirty="0">"#,
        text.style.size_pt * 100
    )?;
    // Fill must precede the font in CT_TextCharacterProperties.
    if let Some(ref color) = text.style.color {
        write!(
            run_properties,
            r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
            escape(color.as_str())
        )?;
    }
    if let Some(ref font) = text.style.font {
        write!(run_properties, r#"<a:latin typeface="{}"/>"#, escape(font.as_str()))?;
    }
    run_properties.push_str("</a:rPr>");

    for (index, line) in text.lines.iter().enumerate() {
        if index > 0 {
            write!(xml, "<a:br>{}</a:br>", run_properties)?;
        }
        write!(
            xml,
            "<a:r>{}<a:t>{}</a:t></a:r>",
            run_properties,
            escape_text(line)
        )?;
    }

    xml.push_str("</a:p></p:txBody></p:sp>");
    Ok(())
}

fn write_picture(xml: &mut String, shape_id: usize, picture: &Picture, rel_id: &str) -> Result<()> {
    xml.push_str("<p:pic><p:nvPicPr>");
    write!(
        xml,
        r#"<p:cNvPr id="{}" name="Picture {}" descr="{}"/>"#,
        shape_id,
        shape_id - 1,
        escape_text(&picture.description)
    )?;
    xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/>"#);
    xml.push_str("</p:nvPicPr>");

    xml.push_str("<p:blipFill>");
    write!(xml, r#"<a:blip r:embed="{}"/>"#, rel_id)?;
    xml.push_str("<a:stretch><a:fillRect/></a:stretch>");
    xml.push_str("</p:blipFill>");

    xml.push_str("<p:spPr>");
    write_xfrm(xml, &picture.frame)?;
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
    xml.push_str("</p:spPr>");
    xml.push_str("</p:pic>");
    Ok(())
}
