/// Replacement picture node generation.
///
/// Image replacement detaches the old picture node and attaches a fresh one
/// at the same tree position, carrying over the old shape's id, name, and
/// bounding box so the new image occupies exactly the template's frame and
/// later lookups still find the slot by name.
use crate::common::xml::escape_xml;
use crate::pptx::shapes::shape::Geometry;
use std::fmt::Write as FmtWrite;

/// Build a `<p:pic>` node filling `geometry` with the image behind `rel_id`.
pub fn picture_xml(shape_id: u32, name: &str, rel_id: &str, geometry: Geometry) -> Vec<u8> {
    let mut xml = String::with_capacity(512);

    xml.push_str("<p:pic>");

    xml.push_str("<p:nvPicPr>");
    let _ = write!(
        xml,
        r#"<p:cNvPr id="{}" name="{}"/>"#,
        shape_id,
        escape_xml(name)
    );
    xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr>"#);
    xml.push_str("<p:nvPr/>");
    xml.push_str("</p:nvPicPr>");

    xml.push_str("<p:blipFill>");
    let _ = write!(xml, r#"<a:blip r:embed="{}"/>"#, escape_xml(rel_id));
    xml.push_str("<a:stretch><a:fillRect/></a:stretch>");
    xml.push_str("</p:blipFill>");

    xml.push_str("<p:spPr>");
    xml.push_str("<a:xfrm>");
    let _ = write!(xml, r#"<a:off x="{}" y="{}"/>"#, geometry.x, geometry.y);
    let _ = write!(xml, r#"<a:ext cx="{}" cy="{}"/>"#, geometry.cx, geometry.cy);
    xml.push_str("</a:xfrm>");
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
    xml.push_str("</p:spPr>");

    xml.push_str("</p:pic>");

    xml.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pptx::shapes::shape::{Shape, ShapeKind};

    #[test]
    fn test_picture_node_round_trips_identity() {
        let geometry = Geometry {
            x: 100,
            y: 200,
            cx: 300,
            cy: 400,
        };
        let xml = picture_xml(7, "Image1", "rId12", geometry);

        let shape = Shape::parse(xml).unwrap();
        assert_eq!(shape.kind(), ShapeKind::Picture);
        assert_eq!(shape.id(), 7);
        assert_eq!(shape.name(), "Image1");
        assert_eq!(shape.geometry(), geometry);
        assert_eq!(shape.blip_rid().as_deref(), Some("rId12"));
    }

    #[test]
    fn test_name_is_escaped() {
        let xml = picture_xml(1, "Logo \"A\" & co", "rId1", Geometry::default());
        let text = String::from_utf8(xml).unwrap();
        assert!(text.contains("Logo &quot;A&quot; &amp; co"));
    }
}
