/// The slide segment model.
///
/// A slide part is split into three pieces: the bytes before the first
/// `spTree` child (`head`), the ordered list of `spTree` children
/// (`nodes`), and everything from `</p:spTree>` to the end of the part
/// (`tail`). Reassembly is plain concatenation, so a slide nobody mutated
/// serializes back to exactly the bytes it was parsed from.
///
/// Shape children become [`Shape`] values; the non-shape children
/// (`p:nvGrpSpPr`, `p:grpSpPr`, interleaved whitespace) are kept as raw
/// segments in their original positions.
use crate::opc::packuri::PackURI;
use crate::pptx::error::{PptxError, Result};
use crate::pptx::shapes::Shape;
use quick_xml::Reader;
use quick_xml::events::Event;

/// One top-level `spTree` child.
#[derive(Debug)]
pub enum SlideNode {
    /// A shape the resolver can address
    Shape(Shape),
    /// Anything else, preserved verbatim
    Raw(Vec<u8>),
}

/// A parsed slide.
#[derive(Debug)]
pub struct Slide {
    partname: PackURI,
    head: Vec<u8>,
    nodes: Vec<SlideNode>,
    tail: Vec<u8>,
}

/// Element names that count as shapes in an `spTree`.
fn is_shape_element(local: &[u8]) -> bool {
    matches!(
        local,
        b"sp" | b"pic" | b"graphicFrame" | b"grpSp" | b"cxnSp"
    )
}

impl Slide {
    /// Parse a slide part.
    pub(crate) fn parse(partname: PackURI, xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        let mut last = 0usize;

        let mut in_tree = false;
        let mut head_end = 0usize;
        let mut nodes = Vec::new();
        let mut tail_start = None;

        loop {
            let start = last;
            let event = reader.read_event()?;
            let end = reader.buffer_position() as usize;
            last = end;

            if !in_tree {
                match event {
                    Event::Start(e) if e.local_name().as_ref() == b"spTree" => {
                        in_tree = true;
                        head_end = end;
                    },
                    Event::Empty(e) if e.local_name().as_ref() == b"spTree" => {
                        // Degenerate but legal: a shape tree with no children
                        head_end = end;
                        tail_start = Some(end);
                        break;
                    },
                    Event::Eof => break,
                    _ => {},
                }
                continue;
            }

            match event {
                Event::Start(e) => {
                    let local = e.local_name().as_ref().to_vec();
                    crate::common::xml::skip_element(&mut reader, &local)?;
                    let node_end = reader.buffer_position() as usize;
                    last = node_end;
                    nodes.push(Self::node(&local, xml[start..node_end].to_vec())?);
                },
                Event::Empty(e) => {
                    let local = e.local_name().as_ref().to_vec();
                    nodes.push(Self::node(&local, xml[start..end].to_vec())?);
                },
                Event::End(e) if e.local_name().as_ref() == b"spTree" => {
                    tail_start = Some(start);
                    break;
                },
                Event::Eof => break,
                // Whitespace and comments between children
                _ => nodes.push(SlideNode::Raw(xml[start..end].to_vec())),
            }
        }

        let Some(tail_start) = tail_start else {
            return Err(PptxError::InvalidPackage(format!(
                "slide part {partname} has no shape tree"
            )));
        };

        Ok(Self {
            partname,
            head: xml[..head_end].to_vec(),
            nodes,
            tail: xml[tail_start..].to_vec(),
        })
    }

    fn node(local: &[u8], bytes: Vec<u8>) -> Result<SlideNode> {
        if is_shape_element(local) {
            Ok(SlideNode::Shape(Shape::parse(bytes)?))
        } else {
            Ok(SlideNode::Raw(bytes))
        }
    }

    /// The partname of the slide part this was parsed from.
    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    /// Iterate shapes in slide order, with their node index.
    ///
    /// The node index is stable for the lifetime of the parsed slide and is
    /// how the resolver addresses shapes.
    pub fn shapes(&self) -> impl Iterator<Item = (usize, &Shape)> {
        self.nodes.iter().enumerate().filter_map(|(index, node)| {
            match node {
                SlideNode::Shape(shape) => Some((index, shape)),
                SlideNode::Raw(_) => None,
            }
        })
    }

    /// Number of shapes on the slide.
    pub fn shape_count(&self) -> usize {
        self.shapes().count()
    }

    /// The shape at a node index, if that node is a shape.
    pub fn shape(&self, index: usize) -> Option<&Shape> {
        match self.nodes.get(index) {
            Some(SlideNode::Shape(shape)) => Some(shape),
            _ => None,
        }
    }

    /// Mutable access to the shape at a node index.
    pub fn shape_mut(&mut self, index: usize) -> Option<&mut Shape> {
        match self.nodes.get_mut(index) {
            Some(SlideNode::Shape(shape)) => Some(shape),
            _ => None,
        }
    }

    /// Replace the shape at a node index with a new node.
    ///
    /// The replacement takes the old node's position in the tree, so
    /// sibling order (and therefore z-order) is unchanged.
    pub fn replace_shape(&mut self, index: usize, shape: Shape) {
        if let Some(node) = self.nodes.get_mut(index) {
            *node = SlideNode::Shape(shape);
        }
    }

    /// Reassemble the slide part bytes.
    pub(crate) fn to_xml(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            self.head.len() + self.tail.len() + self.nodes.len() * 128,
        );
        out.extend_from_slice(&self.head);
        for node in &self.nodes {
            match node {
                SlideNode::Shape(shape) => out.extend_from_slice(shape.xml()),
                SlideNode::Raw(raw) => out.extend_from_slice(raw),
            }
        }
        out.extend_from_slice(&self.tail);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pptx::fixtures;
    use crate::pptx::shapes::ShapeKind;

    fn partname() -> PackURI {
        PackURI::new("/ppt/slides/slide1.xml").unwrap()
    }

    #[test]
    fn test_parse_and_iterate_shapes() {
        let xml = fixtures::slide_xml(&[
            fixtures::text_shape(2, "Header1", "Hello"),
            fixtures::text_shape(3, "Description1", "World"),
        ]);
        let slide = Slide::parse(partname(), xml.as_bytes()).unwrap();

        assert_eq!(slide.shape_count(), 2);
        let names: Vec<&str> = slide.shapes().map(|(_, s)| s.name()).collect();
        assert_eq!(names, vec!["Header1", "Description1"]);
        let (index, shape) = slide.shapes().next().unwrap();
        assert_eq!(shape.kind(), ShapeKind::Text);
        assert!(slide.shape(index).is_some());
    }

    #[test]
    fn test_unmutated_round_trip_is_byte_identical() {
        let xml = fixtures::slide_xml(&[
            fixtures::text_shape(2, "Header1", "Hello"),
            fixtures::picture_shape(3, "Image1", "rId2"),
        ]);
        let slide = Slide::parse(partname(), xml.as_bytes()).unwrap();
        assert_eq!(slide.to_xml(), xml.as_bytes());
    }

    #[test]
    fn test_replace_shape_preserves_position() {
        let xml = fixtures::slide_xml(&[
            fixtures::text_shape(2, "Header1", "Hello"),
            fixtures::picture_shape(3, "Image1", "rId2"),
            fixtures::text_shape(4, "Footer", "Bye"),
        ]);
        let mut slide = Slide::parse(partname(), xml.as_bytes()).unwrap();

        let (index, old) = slide
            .shapes()
            .find(|(_, s)| s.kind() == ShapeKind::Picture)
            .map(|(i, s)| (i, s.geometry()))
            .unwrap();

        let replacement = crate::pptx::shapes::picture::picture_xml(3, "Image1", "rId9", old);
        slide.replace_shape(index, Shape::parse(replacement).unwrap());

        let order: Vec<String> = slide
            .shapes()
            .map(|(_, s)| s.name().to_string())
            .collect();
        assert_eq!(order, vec!["Header1", "Image1", "Footer"]);
        assert_eq!(slide.shape(index).unwrap().blip_rid().as_deref(), Some("rId9"));
    }

    #[test]
    fn test_slide_without_sptree_is_rejected() {
        let err = Slide::parse(partname(), b"<p:sld><p:cSld/></p:sld>").unwrap_err();
        assert!(matches!(err, PptxError::InvalidPackage(_)));
    }
}
