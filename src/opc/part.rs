use crate::opc::error::{OpcError, Result};
use crate::opc::packuri::PackURI;
use crate::opc::rel::Relationships;

/// A part in an OPC package.
///
/// Parts are the fundamental units of content in a package: each has a
/// unique partname, a content type, a binary blob, and may carry
/// relationships to other parts. The engine keeps every part as an opaque
/// blob; only slide parts get structured parsing, in the layer above, and
/// their mutated XML is written back here via [`Part::set_blob`].
#[derive(Debug)]
pub struct Part {
    partname: PackURI,
    content_type: String,
    blob: Vec<u8>,
    rels: Relationships,
}

impl Part {
    /// Create a new part with an empty relationship collection.
    pub fn new(partname: PackURI, content_type: String, blob: Vec<u8>) -> Self {
        let rels = Relationships::new(partname.base_uri().to_string());
        Self {
            partname,
            content_type,
            blob,
            rels,
        }
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    #[inline]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// The binary content of this part.
    #[inline]
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    /// Replace the binary content of this part.
    #[inline]
    pub fn set_blob(&mut self, blob: Vec<u8>) {
        self.blob = blob;
    }

    #[inline]
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    #[inline]
    pub fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }

    /// Add or reuse a relationship to another part, returning its `rId`.
    pub fn relate_to(&mut self, target_ref: &str, reltype: &str) -> String {
        self.rels.get_or_add(reltype, target_ref).r_id().to_string()
    }

    /// Add or reuse an external relationship, returning its `rId`.
    pub fn relate_to_external(&mut self, target_url: &str, reltype: &str) -> String {
        self.rels.get_or_add_external(reltype, target_url)
    }

    /// The target reference for a relationship ID on this part.
    pub fn target_ref(&self, r_id: &str) -> Result<&str> {
        self.rels
            .get(r_id)
            .map(|rel| rel.target_ref())
            .ok_or_else(|| OpcError::RelationshipNotFound(format!("rId: {r_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_blob_replacement() {
        let partname = PackURI::new("/ppt/slides/slide1.xml").unwrap();
        let mut part = Part::new(partname, "application/xml".to_string(), b"<sld/>".to_vec());

        assert_eq!(part.blob(), b"<sld/>");
        part.set_blob(b"<sld>edited</sld>".to_vec());
        assert_eq!(part.blob(), b"<sld>edited</sld>");
    }

    #[test]
    fn test_relate_to() {
        let partname = PackURI::new("/ppt/slides/slide1.xml").unwrap();
        let mut part = Part::new(partname, "application/xml".to_string(), Vec::new());

        let rid = part.relate_to("../media/image1.png", "http://example.com/image");
        assert_eq!(part.target_ref(&rid).unwrap(), "../media/image1.png");
        assert!(part.target_ref("rId99").is_err());
    }
}
