//! Byte-level XML helpers.
//!
//! The slide mutation engine never re-emits whole XML trees: it slices the
//! original part bytes and splices regenerated fragments into them, so that
//! everything it does not touch survives byte-for-byte. The span scanner in
//! this module is what makes that possible: it locates an element inside a
//! byte buffer and reports the byte ranges of the element itself and of its
//! top-level children.

use quick_xml::Reader;
use quick_xml::events::Event;
use std::ops::Range;

/// Escape XML special characters.
#[inline]
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Unescape the five standard XML entities.
///
/// `&amp;` is resolved last so entity text like `&amp;lt;` does not
/// collapse twice.
#[inline]
pub fn unescape_xml(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Consume events until the already-opened element with this local name
/// closes. Nested elements of the same name are tracked by depth.
pub fn skip_element(
    reader: &mut Reader<&[u8]>,
    local: &[u8],
) -> Result<(), quick_xml::Error> {
    let mut depth = 1usize;
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == local => depth += 1,
            Event::End(e) if e.local_name().as_ref() == local => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            },
            Event::Eof => return Ok(()),
            _ => {},
        }
    }
}

/// Byte span of one top-level child element.
#[derive(Debug, Clone)]
pub struct ChildSpan {
    /// Local (unprefixed) element name
    pub name: String,
    /// Byte range of the whole child element within the scanned buffer
    pub range: Range<usize>,
}

/// Result of scanning for an element inside a byte buffer.
///
/// All ranges are byte offsets into the buffer that was scanned, so callers
/// can splice replacement bytes without disturbing surrounding content.
#[derive(Debug, Clone)]
pub struct ElementScan {
    /// Qualified tag name as written in the source, e.g. `p:spPr`
    pub tag: String,
    /// Byte range of the whole element, open tag through close tag
    pub range: Range<usize>,
    /// Position just past the open tag (equals `range.end` for `<tag/>`)
    pub open_end: usize,
    /// Whether the element was in self-closing form
    pub empty: bool,
    /// Attributes of the open tag, qualified names preserved
    pub attrs: Vec<(String, String)>,
    /// Top-level child elements in document order
    pub children: Vec<ChildSpan>,
}

/// Scan `xml` for the first element whose local name is `local`.
///
/// Returns `None` when no such element exists or the buffer is not
/// well-formed enough to delimit it. Only element children are recorded;
/// interleaved text and comments are skipped (they remain in the buffer and
/// survive span-based splicing untouched).
pub fn scan_element(
    xml: &[u8],
    local: &[u8],
) -> Result<Option<ElementScan>, quick_xml::Error> {
    let mut reader = Reader::from_reader(xml);
    let mut last = 0usize;

    loop {
        let start = last;
        let event = reader.read_event()?;
        let end = reader.buffer_position() as usize;
        last = end;

        match event {
            Event::Start(e) if e.local_name().as_ref() == local => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let attrs = read_attrs(&e);
                let children = scan_children(&mut reader, local, &mut last)?;
                let Some(children) = children else {
                    return Ok(None);
                };
                return Ok(Some(ElementScan {
                    tag,
                    range: start..last,
                    open_end: end,
                    empty: false,
                    attrs,
                    children,
                }));
            },
            Event::Empty(e) if e.local_name().as_ref() == local => {
                return Ok(Some(ElementScan {
                    tag: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                    range: start..end,
                    open_end: end,
                    empty: true,
                    attrs: read_attrs(&e),
                    children: Vec::new(),
                }));
            },
            Event::Eof => return Ok(None),
            _ => {},
        }
    }
}

/// Collect the top-level children of the element just opened on `reader`.
///
/// Returns `None` on premature end of input.
fn scan_children(
    reader: &mut Reader<&[u8]>,
    parent_local: &[u8],
    last: &mut usize,
) -> Result<Option<Vec<ChildSpan>>, quick_xml::Error> {
    let mut children = Vec::new();

    loop {
        let start = *last;
        let event = reader.read_event()?;
        let end = reader.buffer_position() as usize;
        *last = end;

        match event {
            Event::Start(e) => {
                let name = local_name_string(e.local_name().as_ref());
                let local_name = e.local_name().as_ref().to_vec();
                skip_element(reader, &local_name)?;
                let child_end = reader.buffer_position() as usize;
                *last = child_end;
                children.push(ChildSpan {
                    name,
                    range: start..child_end,
                });
            },
            Event::Empty(e) => {
                children.push(ChildSpan {
                    name: local_name_string(e.local_name().as_ref()),
                    range: start..end,
                });
            },
            Event::End(e) if e.local_name().as_ref() == parent_local => {
                return Ok(Some(children));
            },
            Event::Eof => return Ok(None),
            // Text, CDATA, comments: not children, spans stay in the buffer
            _ => {},
        }
    }
}

fn read_attrs(e: &quick_xml::events::BytesStart<'_>) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map(|v| v.into_owned())
            .unwrap_or_default();
        attrs.push((key, value));
    }
    attrs
}

#[inline]
fn local_name_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Splice `replacement` over `range` in `buf`.
pub fn splice(buf: &mut Vec<u8>, range: Range<usize>, replacement: &[u8]) {
    buf.splice(range, replacement.iter().copied());
}
