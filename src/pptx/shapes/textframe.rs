/// Text body parsing and regeneration.
///
/// A text mutation fully overwrites the target slot: the text body is
/// parsed into paragraphs and runs, rewritten, and spliced back over its
/// original byte span. Formatting the template author put on the first
/// run survives as the template for the new runs, and run properties the
/// engine does not understand are carried through verbatim.
use crate::color::Rgb;
use crate::common::xml::{ElementScan, escape_xml, scan_element};
use crate::pptx::error::{PptxError, Result};
use std::fmt::Write as FmtWrite;
use std::ops::Range;

/// A parsed `txBody` element (shape text frame or table cell content).
#[derive(Debug, Clone)]
pub struct TextBody {
    /// Qualified root tag: `p:txBody` in shapes, `a:txBody` in table cells
    tag: String,
    /// Byte span of the whole element within the buffer it was parsed from
    span: Range<usize>,
    /// Raw `<a:bodyPr>` element, preserved verbatim
    body_pr: Vec<u8>,
    /// Raw `<a:lstStyle>` element, preserved verbatim
    lst_style: Vec<u8>,
    pub paragraphs: Vec<Paragraph>,
}

/// One `<a:p>` paragraph.
#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    /// Raw `<a:pPr>` element, preserved verbatim
    ppr: Option<Vec<u8>>,
    pub items: Vec<ParagraphItem>,
    /// Parsed `<a:endParaRPr>`, kept so templates with empty placeholder
    /// paragraphs still contribute run formatting
    end_props: Option<RunProps>,
}

/// Paragraph content in document order.
#[derive(Debug, Clone)]
pub enum ParagraphItem {
    Run(Run),
    /// Non-run content (`a:br`, `a:fld`, ...), preserved verbatim
    Raw(Vec<u8>),
}

/// One `<a:r>` text run.
#[derive(Debug, Clone)]
pub struct Run {
    pub props: RunProps,
    pub text: String,
}

/// Parsed `<a:rPr>` (or `<a:endParaRPr>`) content.
///
/// Attributes and unrecognized children are preserved in source order;
/// the typed setters only touch the specific attribute or child they own.
#[derive(Debug, Clone, Default)]
pub struct RunProps {
    attrs: Vec<(String, String)>,
    children: Vec<RunChild>,
}

#[derive(Debug, Clone)]
enum RunChild {
    Fill(FillChild),
    Hlink(HlinkChild),
    Other { name: String, xml: Vec<u8> },
}

#[derive(Debug, Clone)]
enum FillChild {
    /// Fill as found in the template (may be a theme color or carry alpha)
    Raw(Vec<u8>),
    /// Fill set by a mutation
    Solid(Rgb),
}

#[derive(Debug, Clone)]
enum HlinkChild {
    /// Hyperlink as found in the template
    Raw(Vec<u8>),
    /// Hyperlink set by a mutation, referencing an external relationship
    External(String),
}

impl TextBody {
    /// Parse the first `txBody` element in `xml`.
    pub fn parse(xml: &[u8]) -> Result<Option<TextBody>> {
        let Some(scan) = scan_element(xml, b"txBody")? else {
            return Ok(None);
        };

        let mut body = TextBody {
            tag: scan.tag.clone(),
            span: scan.range.clone(),
            body_pr: Vec::new(),
            lst_style: Vec::new(),
            paragraphs: Vec::new(),
        };

        for child in &scan.children {
            let slice = &xml[child.range.clone()];
            match child.name.as_str() {
                "bodyPr" => body.body_pr = slice.to_vec(),
                "lstStyle" => body.lst_style = slice.to_vec(),
                "p" => body.paragraphs.push(parse_paragraph(slice)?),
                _ => {},
            }
        }

        Ok(Some(body))
    }

    /// Byte span of the element within the buffer it was parsed from.
    #[inline]
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// All run text, paragraphs joined with newlines.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for (index, paragraph) in self.paragraphs.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&paragraph.text());
        }
        out
    }

    /// Overwrite the content with `text`, one paragraph per line.
    ///
    /// Paragraph and run formatting is copied from the first paragraph of
    /// the existing content (falling back to its `endParaRPr` when the
    /// placeholder paragraph had no runs), so replacement text keeps the
    /// template's styling. Running the same overwrite twice is a no-op.
    pub fn set_text(&mut self, text: &str) {
        let template = self.paragraphs.first();
        let ppr = template.and_then(|p| p.ppr.clone());
        let props = template
            .and_then(|p| p.first_run().map(|r| r.props.clone()))
            .or_else(|| template.and_then(|p| p.end_props.clone()))
            .unwrap_or_default();

        self.paragraphs = text
            .split('\n')
            .map(|line| Paragraph {
                ppr: ppr.clone(),
                items: vec![ParagraphItem::Run(Run {
                    props: props.clone(),
                    text: line.to_string(),
                })],
                end_props: None,
            })
            .collect();
    }

    /// Apply a font color to every run.
    pub fn color_all(&mut self, color: Rgb) {
        self.for_each_run(|run| run.props.set_color(color));
    }

    /// Apply a font size in points to every run.
    pub fn size_all(&mut self, points: f32) {
        self.for_each_run(|run| run.props.set_size_pt(points));
    }

    /// Bold every run.
    pub fn bold_all(&mut self, bold: bool) {
        self.for_each_run(|run| run.props.set_bold(bold));
    }

    /// Italicize every run.
    pub fn italic_all(&mut self, italic: bool) {
        self.for_each_run(|run| run.props.set_italic(italic));
    }

    /// Point every run at an external hyperlink relationship.
    pub fn hyperlink_all(&mut self, rel_id: &str) {
        self.for_each_run(|run| run.props.set_hyperlink(rel_id));
    }

    /// Apply a font color to the runs of one paragraph.
    pub fn color_paragraph(&mut self, index: usize, color: Rgb) {
        self.for_paragraph_runs(index, |run| run.props.set_color(color));
    }

    /// Apply a font size in points to the runs of one paragraph.
    pub fn size_paragraph(&mut self, index: usize, points: f32) {
        self.for_paragraph_runs(index, |run| run.props.set_size_pt(points));
    }

    /// Bold the runs of one paragraph.
    pub fn bold_paragraph(&mut self, index: usize, bold: bool) {
        self.for_paragraph_runs(index, |run| run.props.set_bold(bold));
    }

    /// Italicize the runs of one paragraph.
    pub fn italic_paragraph(&mut self, index: usize, italic: bool) {
        self.for_paragraph_runs(index, |run| run.props.set_italic(italic));
    }

    fn for_each_run(&mut self, mut f: impl FnMut(&mut Run)) {
        for paragraph in &mut self.paragraphs {
            for item in &mut paragraph.items {
                if let ParagraphItem::Run(run) = item {
                    f(run);
                }
            }
        }
    }

    fn for_paragraph_runs(&mut self, index: usize, mut f: impl FnMut(&mut Run)) {
        if let Some(paragraph) = self.paragraphs.get_mut(index) {
            for item in &mut paragraph.items {
                if let ParagraphItem::Run(run) = item {
                    f(run);
                }
            }
        }
    }

    /// Regenerate the element.
    pub fn to_xml(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(256);
        out.extend_from_slice(b"<");
        out.extend_from_slice(self.tag.as_bytes());
        out.extend_from_slice(b">");
        out.extend_from_slice(&self.body_pr);
        out.extend_from_slice(&self.lst_style);
        for paragraph in &self.paragraphs {
            paragraph.write_xml(&mut out);
        }
        out.extend_from_slice(b"</");
        out.extend_from_slice(self.tag.as_bytes());
        out.extend_from_slice(b">");
        out
    }
}

impl Paragraph {
    /// Concatenated text of the paragraph's runs.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for item in &self.items {
            if let ParagraphItem::Run(run) = item {
                out.push_str(&run.text);
            }
        }
        out
    }

    fn first_run(&self) -> Option<&Run> {
        self.items.iter().find_map(|item| match item {
            ParagraphItem::Run(run) => Some(run),
            ParagraphItem::Raw(_) => None,
        })
    }

    fn write_xml(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(b"<a:p>");
        if let Some(ppr) = &self.ppr {
            out.extend_from_slice(ppr);
        }
        for item in &self.items {
            match item {
                ParagraphItem::Run(run) => run.write_xml(out),
                ParagraphItem::Raw(raw) => out.extend_from_slice(raw),
            }
        }
        if let Some(end_props) = &self.end_props {
            out.extend_from_slice(&end_props.to_xml("a:endParaRPr"));
        }
        out.extend_from_slice(b"</a:p>");
    }
}

impl Run {
    fn write_xml(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(b"<a:r>");
        if !self.props.is_empty() {
            out.extend_from_slice(&self.props.to_xml("a:rPr"));
        }
        out.extend_from_slice(b"<a:t>");
        out.extend_from_slice(escape_xml(&self.text).as_bytes());
        out.extend_from_slice(b"</a:t></a:r>");
    }
}

impl RunProps {
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty() && self.children.is_empty()
    }

    /// Bold on/off (`b` attribute).
    pub fn set_bold(&mut self, bold: bool) {
        self.set_attr("b", if bold { "1" } else { "0" });
    }

    /// Italic on/off (`i` attribute).
    pub fn set_italic(&mut self, italic: bool) {
        self.set_attr("i", if italic { "1" } else { "0" });
    }

    /// Font size in points (`sz` attribute, hundredths of a point).
    pub fn set_size_pt(&mut self, points: f32) {
        let hundredths = (points * 100.0).round() as i64;
        self.set_attr("sz", &hundredths.to_string());
    }

    /// Solid font color, replacing whatever fill the template carried.
    pub fn set_color(&mut self, color: Rgb) {
        let solid = RunChild::Fill(FillChild::Solid(color));
        match self
            .children
            .iter()
            .position(|c| matches!(c, RunChild::Fill(_)))
        {
            Some(at) => self.children[at] = solid,
            None => {
                // Schema order: an outline child precedes the fill
                let at = self
                    .children
                    .iter()
                    .take_while(|c| matches!(c, RunChild::Other { name, .. } if name == "ln"))
                    .count();
                self.children.insert(at, solid);
            },
        }
    }

    /// Attach an external hyperlink relationship (`a:hlinkClick`).
    pub fn set_hyperlink(&mut self, rel_id: &str) {
        let hlink = RunChild::Hlink(HlinkChild::External(rel_id.to_string()));
        match self
            .children
            .iter()
            .position(|c| matches!(c, RunChild::Hlink(_)))
        {
            Some(at) => self.children[at] = hlink,
            None => self.children.push(hlink),
        }
    }

    fn set_attr(&mut self, key: &str, value: &str) {
        match self.attrs.iter().position(|(k, _)| k == key) {
            Some(at) => self.attrs[at].1 = value.to_string(),
            None => self.attrs.push((key.to_string(), value.to_string())),
        }
    }

    /// Parse from a scanned `rPr`-shaped element.
    fn from_scan(scan: &ElementScan, xml: &[u8]) -> RunProps {
        let mut props = RunProps {
            attrs: scan.attrs.clone(),
            children: Vec::new(),
        };

        for child in &scan.children {
            let slice = xml[child.range.clone()].to_vec();
            let parsed = match child.name.as_str() {
                "noFill" | "solidFill" | "gradFill" | "blipFill" | "pattFill" | "grpFill" => {
                    RunChild::Fill(FillChild::Raw(slice))
                },
                "hlinkClick" => RunChild::Hlink(HlinkChild::Raw(slice)),
                _ => RunChild::Other {
                    name: child.name.clone(),
                    xml: slice,
                },
            };
            props.children.push(parsed);
        }

        props
    }

    fn to_xml(&self, tag: &str) -> Vec<u8> {
        let mut out = String::with_capacity(64);
        let _ = write!(out, "<{tag}");
        for (key, value) in &self.attrs {
            let _ = write!(out, r#" {key}="{}""#, escape_xml(value));
        }

        if self.children.is_empty() {
            out.push_str("/>");
            return out.into_bytes();
        }

        out.push('>');
        let mut bytes = out.into_bytes();
        for child in &self.children {
            match child {
                RunChild::Fill(FillChild::Solid(color)) => {
                    bytes.extend_from_slice(
                        format!(
                            r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
                            color.hex()
                        )
                        .as_bytes(),
                    );
                },
                RunChild::Fill(FillChild::Raw(raw)) => bytes.extend_from_slice(raw),
                RunChild::Hlink(HlinkChild::External(rel_id)) => {
                    bytes.extend_from_slice(
                        format!(r#"<a:hlinkClick r:id="{}"/>"#, escape_xml(rel_id)).as_bytes(),
                    );
                },
                RunChild::Hlink(HlinkChild::Raw(raw)) => bytes.extend_from_slice(raw),
                RunChild::Other { xml, .. } => bytes.extend_from_slice(xml),
            }
        }
        bytes.extend_from_slice(format!("</{tag}>").as_bytes());
        bytes
    }
}

fn parse_paragraph(xml: &[u8]) -> Result<Paragraph> {
    let scan = scan_element(xml, b"p")?
        .ok_or_else(|| PptxError::Xml("malformed paragraph".to_string()))?;

    let mut paragraph = Paragraph::default();
    for child in &scan.children {
        let slice = &xml[child.range.clone()];
        match child.name.as_str() {
            "pPr" => paragraph.ppr = Some(slice.to_vec()),
            "r" => {
                if let Some(run) = parse_run(slice)? {
                    paragraph.items.push(ParagraphItem::Run(run));
                }
            },
            "endParaRPr" => {
                if let Some(end_scan) = scan_element(slice, b"endParaRPr")? {
                    paragraph.end_props = Some(RunProps::from_scan(&end_scan, slice));
                }
            },
            _ => paragraph.items.push(ParagraphItem::Raw(slice.to_vec())),
        }
    }

    Ok(paragraph)
}

fn parse_run(xml: &[u8]) -> Result<Option<Run>> {
    let Some(scan) = scan_element(xml, b"r")? else {
        return Ok(None);
    };

    let mut props = RunProps::default();
    let mut text = String::new();

    for child in &scan.children {
        let slice = &xml[child.range.clone()];
        match child.name.as_str() {
            "rPr" => {
                if let Some(rpr_scan) = scan_element(slice, b"rPr")? {
                    props = RunProps::from_scan(&rpr_scan, slice);
                }
            },
            "t" => text = element_text(slice)?,
            _ => {},
        }
    }

    Ok(Some(Run { props, text }))
}

/// Unescaped character content of an element slice.
fn element_text(xml: &[u8]) -> Result<String> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_reader(xml);
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Text(e) => {
                let raw = std::str::from_utf8(e.as_ref())
                    .map_err(|e| PptxError::Xml(e.to_string()))?;
                text.push_str(&crate::common::xml::unescape_xml(raw));
            },
            Event::CData(e) => {
                text.push_str(
                    std::str::from_utf8(e.as_ref())
                        .map_err(|e| PptxError::Xml(e.to_string()))?,
                );
            },
            Event::Eof => break,
            _ => {},
        }
    }

    Ok(text)
}
