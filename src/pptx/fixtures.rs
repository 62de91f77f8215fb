//! In-memory presentation packages for tests.
//!
//! Builds the minimal part set a real template carries: content types,
//! package rels, a presentation part with its slide list, slide parts, and
//! optional media parts. Shape fragments mirror what PowerPoint emits for
//! simple templates.

use std::io::Write;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// A text shape (`p:sp`) with one run of text.
pub(crate) fn text_shape(id: u32, name: &str, text: &str) -> String {
    format!(
        concat!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr>"#,
            r#"<p:spPr><a:xfrm><a:off x="100" y="200"/><a:ext cx="300" cy="400"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>"#,
            r#"<p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US"/>"#,
            r#"<a:t>{text}</a:t></a:r></a:p></p:txBody></p:sp>"#
        ),
        id = id,
        name = name,
        text = text
    )
}

/// A picture shape (`p:pic`) referencing an image relationship.
pub(crate) fn picture_shape(id: u32, name: &str, rid: &str) -> String {
    format!(
        concat!(
            r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="{name}"/>"#,
            r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#,
            r#"<p:blipFill><a:blip r:embed="{rid}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#,
            r#"<p:spPr><a:xfrm><a:off x="914400" y="685800"/><a:ext cx="1828800" cy="1371600"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#
        ),
        id = id,
        name = name,
        rid = rid
    )
}

/// A graphic frame (`p:graphicFrame`) holding a rows × cols table whose
/// cells read `r{row}c{col}`.
pub(crate) fn table_shape(id: u32, name: &str, rows: usize, cols: usize) -> String {
    let mut xml = format!(
        concat!(
            r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="{id}" name="{name}"/>"#,
            r#"<p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr>"#,
            r#"<p:xfrm><a:off x="914400" y="914400"/><a:ext cx="5486400" cy="1828800"/></p:xfrm>"#,
            r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table">"#,
            r#"<a:tbl><a:tblPr firstRow="1" bandRow="1"/><a:tblGrid>"#
        ),
        id = id,
        name = name
    );
    for _ in 0..cols {
        xml.push_str(r#"<a:gridCol w="914400"/>"#);
    }
    xml.push_str("</a:tblGrid>");
    for row in 0..rows {
        xml.push_str(r#"<a:tr h="370840">"#);
        for col in 0..cols {
            xml.push_str(&format!(
                concat!(
                    r#"<a:tc><a:txBody><a:bodyPr/><a:p><a:r><a:rPr lang="en-US"/>"#,
                    r#"<a:t>r{row}c{col}</a:t></a:r></a:p></a:txBody><a:tcPr/></a:tc>"#
                ),
                row = row,
                col = col
            ));
        }
        xml.push_str("</a:tr>");
    }
    xml.push_str("</a:tbl></a:graphicData></a:graphic></p:graphicFrame>");
    xml
}

/// A full slide part around the given shape fragments.
pub(crate) fn slide_xml(shapes: &[String]) -> String {
    let mut xml = String::from(concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<p:sld xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" "#,
        r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        "<p:cSld><p:spTree>",
        r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
        "<p:grpSpPr><a:xfrm>",
        r#"<a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
        r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/>"#,
        "</a:xfrm></p:grpSpPr>",
    ));
    for shape in shapes {
        xml.push_str(shape);
    }
    xml.push_str(concat!(
        "</p:spTree></p:cSld>",
        "<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>",
    ));
    xml
}

/// A tiny but magic-valid PNG payload.
pub(crate) fn png_bytes() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D,
    ]
}

/// A second distinguishable PNG payload.
pub(crate) fn other_png_bytes() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0xFF, 0xEE, 0xDD, 0xCC,
    ]
}

/// Builds a presentation package from slide XML fragments.
pub(crate) struct PackageBuilder {
    /// Slide XML plus (rId, media membername) image relationships
    slides: Vec<(String, Vec<(String, String)>)>,
    /// Media parts as (membername under ppt/media, bytes)
    media: Vec<(String, Vec<u8>)>,
}

impl PackageBuilder {
    pub(crate) fn new() -> Self {
        Self {
            slides: Vec::new(),
            media: Vec::new(),
        }
    }

    /// Add a slide with no relationships.
    pub(crate) fn slide(mut self, xml: String) -> Self {
        self.slides.push((xml, Vec::new()));
        self
    }

    /// Add a slide with image relationships (rId → media filename).
    pub(crate) fn slide_with_images(
        mut self,
        xml: String,
        rels: Vec<(String, String)>,
    ) -> Self {
        self.slides.push((xml, rels));
        self
    }

    /// Add a media part under `ppt/media/`.
    pub(crate) fn media(mut self, filename: &str, bytes: Vec<u8>) -> Self {
        self.media.push((filename.to_string(), bytes));
        self
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let mut data = Vec::new();
        {
            let cursor = std::io::Cursor::new(&mut data);
            let mut writer = ZipWriter::new(cursor);
            let options = SimpleFileOptions::default();

            // [Content_Types].xml
            let mut types = String::from(concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                "\n",
                r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
                "\n",
                r#"  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
                "\n",
                r#"  <Default Extension="xml" ContentType="application/xml"/>"#,
                "\n",
                r#"  <Default Extension="png" ContentType="image/png"/>"#,
                "\n",
                r#"  <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>"#,
                "\n",
            ));
            for index in 0..self.slides.len() {
                types.push_str(&format!(
                    concat!(
                        r#"  <Override PartName="/ppt/slides/slide{}.xml" "#,
                        r#"ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
                        "\n",
                    ),
                    index + 1
                ));
            }
            types.push_str("</Types>");
            writer.start_file("[Content_Types].xml", options).unwrap();
            writer.write_all(types.as_bytes()).unwrap();

            // Package relationships
            writer.start_file("_rels/.rels", options).unwrap();
            writer
                .write_all(
                    concat!(
                        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                        "\n",
                        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
                        "\n",
                        r#"  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>"#,
                        "\n",
                        "</Relationships>",
                    )
                    .as_bytes(),
                )
                .unwrap();

            // Presentation part with its slide list
            let mut pres = String::from(concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" "#,
                r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
                "<p:sldIdLst>",
            ));
            for index in 0..self.slides.len() {
                pres.push_str(&format!(
                    r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                    256 + index,
                    index + 1
                ));
            }
            pres.push_str(concat!(
                "</p:sldIdLst>",
                r#"<p:sldSz cx="12192000" cy="6858000"/>"#,
                "</p:presentation>",
            ));
            writer.start_file("ppt/presentation.xml", options).unwrap();
            writer.write_all(pres.as_bytes()).unwrap();

            // Presentation relationships
            let mut pres_rels = String::from(concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                "\n",
                r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
                "\n",
            ));
            for index in 0..self.slides.len() {
                pres_rels.push_str(&format!(
                    concat!(
                        r#"  <Relationship Id="rId{}" "#,
                        r#"Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" "#,
                        r#"Target="slides/slide{}.xml"/>"#,
                        "\n",
                    ),
                    index + 1,
                    index + 1
                ));
            }
            pres_rels.push_str("</Relationships>");
            writer
                .start_file("ppt/_rels/presentation.xml.rels", options)
                .unwrap();
            writer.write_all(pres_rels.as_bytes()).unwrap();

            // Slide parts and their relationships
            for (index, (xml, rels)) in self.slides.iter().enumerate() {
                writer
                    .start_file(format!("ppt/slides/slide{}.xml", index + 1), options)
                    .unwrap();
                writer.write_all(xml.as_bytes()).unwrap();

                if !rels.is_empty() {
                    let mut slide_rels = String::from(concat!(
                        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                        "\n",
                        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
                        "\n",
                    ));
                    for (rid, filename) in rels {
                        slide_rels.push_str(&format!(
                            concat!(
                                r#"  <Relationship Id="{}" "#,
                                r#"Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" "#,
                                r#"Target="../media/{}"/>"#,
                                "\n",
                            ),
                            rid, filename
                        ));
                    }
                    slide_rels.push_str("</Relationships>");
                    writer
                        .start_file(
                            format!("ppt/slides/_rels/slide{}.xml.rels", index + 1),
                            options,
                        )
                        .unwrap();
                    writer.write_all(slide_rels.as_bytes()).unwrap();
                }
            }

            // Media parts
            for (filename, bytes) in &self.media {
                writer
                    .start_file(format!("ppt/media/{filename}"), options)
                    .unwrap();
                writer.write_all(bytes).unwrap();
            }

            writer.finish().unwrap();
        }
        data
    }
}
