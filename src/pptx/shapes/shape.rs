/// Base shape type for slide mutation.
use crate::color::Rgb;
use crate::common::xml::{scan_element, splice};
use crate::pptx::error::{PptxError, Result};
use crate::pptx::shapes::textframe::TextBody;
use memchr::memmem;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::ops::Range;

/// Shape kind, derived from the element name of the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// A text shape (p:sp)
    Text,
    /// A picture shape (p:pic)
    Picture,
    /// A graphic frame containing a table or chart (p:graphicFrame)
    GraphicFrame,
    /// A group shape (p:grpSp)
    Group,
    /// A connector shape (p:cxnSp)
    Connector,
    /// Anything else that may appear in the shape tree
    Other,
}

impl ShapeKind {
    /// Classify by element local name.
    pub(crate) fn from_local_name(local: &[u8]) -> Self {
        match local {
            b"sp" => Self::Text,
            b"pic" => Self::Picture,
            b"graphicFrame" => Self::GraphicFrame,
            b"grpSp" => Self::Group,
            b"cxnSp" => Self::Connector,
            _ => Self::Other,
        }
    }
}

/// Shape position and size in EMUs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Geometry {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

/// A shape on a slide: the raw node bytes plus parsed identity.
///
/// The name comes from the shape's `<p:cNvPr>` element. Names are
/// author-assigned and carry no uniqueness or format guarantees.
#[derive(Debug, Clone)]
pub struct Shape {
    /// Raw XML bytes for this node, e.g. `<p:sp>...</p:sp>`
    xml: Vec<u8>,
    kind: ShapeKind,
    /// Shape ID from `<p:cNvPr id=...>`
    id: u32,
    /// Shape name from `<p:cNvPr name=...>`
    name: String,
    /// Position and size from the first `<a:xfrm>`
    geometry: Geometry,
}

impl Shape {
    /// Parse a shape node from its raw bytes.
    pub(crate) fn parse(xml: Vec<u8>) -> Result<Self> {
        let kind = root_kind(&xml)?;
        let (id, name) = parse_identity(&xml)?;
        let geometry = parse_geometry(&xml)?;
        Ok(Self {
            xml,
            kind,
            id,
            name,
            geometry,
        })
    }

    #[inline]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Get raw XML bytes.
    #[inline]
    pub fn xml(&self) -> &[u8] {
        &self.xml
    }

    /// Whether this shape can carry a text frame.
    #[inline]
    pub fn has_text_frame(&self) -> bool {
        self.kind == ShapeKind::Text
    }

    /// Whether this shape contains a table.
    pub fn has_table(&self) -> bool {
        self.kind == ShapeKind::GraphicFrame
            && memmem::find(&self.xml, b"<a:tbl").is_some()
    }

    /// Parse the shape's text body, if it has one.
    pub fn text_body(&self) -> Result<Option<TextBody>> {
        if !self.has_text_frame() {
            return Ok(None);
        }
        TextBody::parse(&self.xml)
    }

    /// Splice a regenerated text body back over its original span.
    pub fn set_text_body(&mut self, body: &TextBody) {
        let bytes = body.to_xml();
        splice(&mut self.xml, body.span(), &bytes);
    }

    /// The `r:embed` relationship ID of this shape's image fill, if any.
    pub fn blip_rid(&self) -> Option<String> {
        let mut reader = Reader::from_reader(self.xml.as_slice());
        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) | Ok(Event::Empty(e))
                    if e.local_name().as_ref() == b"blip" =>
                {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"r:embed" {
                            return std::str::from_utf8(&attr.value)
                                .ok()
                                .map(|s| s.to_string());
                        }
                    }
                    return None;
                },
                Ok(Event::Eof) | Err(_) => return None,
                _ => {},
            }
        }
    }

    /// Overwrite the shape's fill with a solid color.
    ///
    /// Replaces an existing fill child of `<p:spPr>` in place, or inserts
    /// one at the schema position (after the transform and geometry
    /// children) when the shape has no explicit fill.
    pub fn set_solid_fill(&mut self, color: Rgb) -> Result<()> {
        const FILL_NAMES: [&str; 6] = [
            "noFill", "solidFill", "gradFill", "blipFill", "pattFill", "grpFill",
        ];

        let Some(sppr) = scan_element(&self.xml, b"spPr")? else {
            return Ok(());
        };

        let fill = format!(
            r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
            color.hex()
        );

        if sppr.empty {
            // <p:spPr/> has no room; rebuild it with content
            let mut rebuilt = format!("<{}", sppr.tag);
            for (key, value) in &sppr.attrs {
                rebuilt.push_str(&format!(
                    r#" {key}="{}""#,
                    crate::common::xml::escape_xml(value)
                ));
            }
            rebuilt.push('>');
            rebuilt.push_str(&fill);
            rebuilt.push_str(&format!("</{}>", sppr.tag));
            splice(&mut self.xml, sppr.range, rebuilt.as_bytes());
            return Ok(());
        }

        if let Some(existing) = sppr
            .children
            .iter()
            .find(|c| FILL_NAMES.contains(&c.name.as_str()))
        {
            splice(&mut self.xml, existing.range.clone(), fill.as_bytes());
            return Ok(());
        }

        let insert_at = sppr
            .children
            .iter()
            .filter(|c| matches!(c.name.as_str(), "xfrm" | "prstGeom" | "custGeom"))
            .map(|c| c.range.end)
            .next_back()
            .unwrap_or(sppr.open_end);
        splice(&mut self.xml, insert_at..insert_at, fill.as_bytes());
        Ok(())
    }

    /// Splice raw replacement bytes over a range of the shape XML.
    ///
    /// Used by the table editor, which batches cell rewrites against spans
    /// computed from the original bytes.
    pub(crate) fn splice_raw(&mut self, range: Range<usize>, replacement: &[u8]) {
        splice(&mut self.xml, range, replacement);
    }
}

/// Kind of the root element of a node.
fn root_kind(xml: &[u8]) -> Result<ShapeKind> {
    let mut reader = Reader::from_reader(xml);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                return Ok(ShapeKind::from_local_name(e.local_name().as_ref()));
            },
            Event::Eof => {
                return Err(PptxError::Xml("empty shape node".to_string()));
            },
            _ => {},
        }
    }
}

/// Read id and name from the first `cNvPr` element.
fn parse_identity(xml: &[u8]) -> Result<(u32, String)> {
    let mut reader = Reader::from_reader(xml);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"cNvPr" => {
                let mut id = 0u32;
                let mut name = String::new();
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"id" => {
                            id = std::str::from_utf8(&attr.value)
                                .ok()
                                .and_then(|s| s.parse().ok())
                                .unwrap_or(0);
                        },
                        b"name" => {
                            name = attr
                                .unescape_value()
                                .map(|v| v.into_owned())
                                .unwrap_or_default();
                        },
                        _ => {},
                    }
                }
                return Ok((id, name));
            },
            Event::Eof => return Ok((0, String::new())),
            _ => {},
        }
    }
}

/// Read position and size from the first `a:off` / `a:ext` pair.
fn parse_geometry(xml: &[u8]) -> Result<Geometry> {
    let mut reader = Reader::from_reader(xml);
    let mut geometry = Geometry::default();
    let mut seen_off = false;
    let mut seen_ext = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"off" if !seen_off => {
                    for attr in e.attributes().flatten() {
                        let value = std::str::from_utf8(&attr.value)
                            .ok()
                            .and_then(|s| s.parse().ok())
                            .unwrap_or(0);
                        match attr.key.as_ref() {
                            b"x" => geometry.x = value,
                            b"y" => geometry.y = value,
                            _ => {},
                        }
                    }
                    seen_off = true;
                },
                b"ext" if !seen_ext => {
                    for attr in e.attributes().flatten() {
                        let value = std::str::from_utf8(&attr.value)
                            .ok()
                            .and_then(|s| s.parse().ok())
                            .unwrap_or(0);
                        match attr.key.as_ref() {
                            b"cx" => geometry.cx = value,
                            b"cy" => geometry.cy = value,
                            _ => {},
                        }
                    }
                    seen_ext = true;
                },
                _ => {},
            },
            Event::Eof => return Ok(geometry),
            _ => {},
        }

        if seen_off && seen_ext {
            return Ok(geometry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SP: &[u8] = br#"<p:sp><p:nvSpPr><p:cNvPr id="4" name="Header1"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="100" y="200"/><a:ext cx="300" cy="400"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr><p:txBody><a:bodyPr/><a:p><a:r><a:t>Hi</a:t></a:r></a:p></p:txBody></p:sp>"#;

    #[test]
    fn test_parse_identity_and_geometry() {
        let shape = Shape::parse(SP.to_vec()).unwrap();
        assert_eq!(shape.kind(), ShapeKind::Text);
        assert_eq!(shape.id(), 4);
        assert_eq!(shape.name(), "Header1");
        assert_eq!(
            shape.geometry(),
            Geometry {
                x: 100,
                y: 200,
                cx: 300,
                cy: 400
            }
        );
        assert!(shape.has_text_frame());
        assert!(!shape.has_table());
    }

    #[test]
    fn test_blip_rid() {
        let pic = br#"<p:pic><p:nvPicPr><p:cNvPr id="7" name="Image"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId3"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr/></p:pic>"#;
        let shape = Shape::parse(pic.to_vec()).unwrap();
        assert_eq!(shape.kind(), ShapeKind::Picture);
        assert_eq!(shape.blip_rid().as_deref(), Some("rId3"));
    }

    #[test]
    fn test_set_solid_fill_inserts_after_geometry() {
        let mut shape = Shape::parse(SP.to_vec()).unwrap();
        shape.set_solid_fill(Rgb::new(0xAA, 0xBB, 0xCC)).unwrap();

        let xml = String::from_utf8(shape.xml().to_vec()).unwrap();
        assert!(xml.contains(
            r#"</a:prstGeom><a:solidFill><a:srgbClr val="AABBCC"/></a:solidFill></p:spPr>"#
        ));
    }

    #[test]
    fn test_set_solid_fill_replaces_existing() {
        let src = br#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="BG"/></p:nvSpPr><p:spPr><a:solidFill><a:srgbClr val="FFFFFF"/></a:solidFill></p:spPr></p:sp>"#;
        let mut shape = Shape::parse(src.to_vec()).unwrap();
        shape.set_solid_fill(Rgb::new(0, 0x10, 0x20)).unwrap();

        let xml = String::from_utf8(shape.xml().to_vec()).unwrap();
        assert!(xml.contains(r#"<a:srgbClr val="001020"/>"#));
        assert!(!xml.contains("FFFFFF"));
    }

    #[test]
    fn test_set_solid_fill_expands_empty_sppr() {
        let src = br#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="BG"/></p:nvSpPr><p:spPr/></p:sp>"#;
        let mut shape = Shape::parse(src.to_vec()).unwrap();
        shape.set_solid_fill(Rgb::BLACK).unwrap();

        let xml = String::from_utf8(shape.xml().to_vec()).unwrap();
        assert!(xml.contains(
            r#"<p:spPr><a:solidFill><a:srgbClr val="000000"/></a:solidFill></p:spPr>"#
        ));
    }
}
