/// Objects that implement reading and writing OPC packages.
///
/// `OpcPackage` is the in-memory form of a package: parts indexed by
/// partname, package-level relationships, and the content-type index. It is
/// deserialized once per request, mutated through the document layer, and
/// serialized exactly once.
use crate::opc::constants::relationship_type;
use crate::opc::content_types::ContentTypeMap;
use crate::opc::error::{OpcError, Result};
use crate::opc::packuri::{CONTENT_TYPES_URI, PACKAGE_URI, PackURI};
use crate::opc::part::Part;
use crate::opc::phys::{PhysPkgReader, PhysPkgWriter};
use crate::opc::rel::Relationships;
use std::collections::HashMap;

pub struct OpcPackage {
    /// Package-level relationships (`/_rels/.rels`)
    rels: Relationships,
    /// All parts in the package, indexed by partname
    parts: HashMap<String, Part>,
    /// The `[Content_Types].xml` index
    content_types: ContentTypeMap,
}

impl OpcPackage {
    /// Deserialize a package from ZIP bytes.
    ///
    /// Two passes, the way python-pptx unmarshals: all parts are created
    /// first, then relationship files are parsed and attached to their
    /// source part (or to the package itself for `/_rels/.rels`).
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let phys = PhysPkgReader::from_bytes(data)?;

        let content_types_uri =
            PackURI::new(CONTENT_TYPES_URI).map_err(OpcError::InvalidPackUri)?;
        let content_types_xml = phys
            .blob_for(&content_types_uri)
            .ok_or_else(|| OpcError::PartNotFound(content_types_uri.to_string()))?;
        let content_types = ContentTypeMap::parse(content_types_xml)?;

        // First pass: create all parts
        let mut parts = HashMap::new();
        for (membername, blob) in phys.iter() {
            if membername == content_types_uri.membername() || is_rels_member(membername) {
                continue;
            }
            let partname =
                PackURI::new(format!("/{membername}")).map_err(OpcError::InvalidPackUri)?;
            let content_type = content_types.content_type_for(&partname)?.to_string();
            parts.insert(
                partname.to_string(),
                Part::new(partname, content_type, blob.to_vec()),
            );
        }

        // Second pass: package relationships, then per-part relationships
        let package_uri = PackURI::new(PACKAGE_URI).map_err(OpcError::InvalidPackUri)?;
        let package_rels_uri = package_uri.rels_uri().map_err(OpcError::InvalidPackUri)?;
        let rels = match phys.blob_for(&package_rels_uri) {
            Some(xml) => Relationships::parse(PACKAGE_URI.to_string(), xml)?,
            None => Relationships::new(PACKAGE_URI.to_string()),
        };

        for part in parts.values_mut() {
            let rels_uri = part.partname().rels_uri().map_err(OpcError::InvalidPackUri)?;
            let base_uri = part.partname().base_uri().to_string();
            if let Some(xml) = phys.blob_for(&rels_uri) {
                *part.rels_mut() = Relationships::parse(base_uri, xml)?;
            }
        }

        Ok(Self {
            rels,
            parts,
            content_types,
        })
    }

    /// The part the package-level relationships designate as the main
    /// document (for a presentation, `/ppt/presentation.xml`).
    pub fn main_part(&self) -> Result<&Part> {
        let rel = self
            .rels
            .first_of_type(relationship_type::OFFICE_DOCUMENT)
            .ok_or_else(|| {
                OpcError::RelationshipNotFound(relationship_type::OFFICE_DOCUMENT.to_string())
            })?;
        self.get_part(&rel.target_partname()?)
    }

    /// Get a part by its partname.
    pub fn get_part(&self, partname: &PackURI) -> Result<&Part> {
        self.parts
            .get(partname.as_str())
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    /// Get a mutable reference to a part by its partname.
    pub fn get_part_mut(&mut self, partname: &PackURI) -> Result<&mut Part> {
        self.parts
            .get_mut(partname.as_str())
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    /// Add a new part, registering its content type as an extension default.
    pub fn add_part(&mut self, part: Part) {
        self.content_types
            .register_default(part.partname().ext(), part.content_type());
        self.parts.insert(part.partname().to_string(), part);
    }

    pub fn contains_part(&self, partname: &PackURI) -> bool {
        self.parts.contains_key(partname.as_str())
    }

    pub fn iter_parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.values()
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    #[inline]
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    /// Find the next free partname for a `%d` template, e.g.
    /// `/ppt/media/image%d.png` → `/ppt/media/image3.png`.
    pub fn next_partname(&self, template: &str) -> Result<PackURI> {
        for n in 1u32..=10_000 {
            let candidate = template.replace("%d", &n.to_string());
            if !self.parts.contains_key(&candidate) {
                return PackURI::new(candidate).map_err(OpcError::InvalidPackUri);
            }
        }
        Err(OpcError::InvalidPackUri(format!(
            "no free partname for template '{template}'"
        )))
    }

    /// Serialize the package to ZIP bytes.
    ///
    /// Parts are written in sorted partname order so output is
    /// deterministic across runs; untouched part blobs are written exactly
    /// as they were read.
    pub fn save(&self) -> Result<Vec<u8>> {
        let mut writer = PhysPkgWriter::new();

        let content_types_uri =
            PackURI::new(CONTENT_TYPES_URI).map_err(OpcError::InvalidPackUri)?;
        writer.write(&content_types_uri, self.content_types.to_xml().as_bytes())?;

        if !self.rels.is_empty() {
            let package_uri = PackURI::new(PACKAGE_URI).map_err(OpcError::InvalidPackUri)?;
            let rels_uri = package_uri.rels_uri().map_err(OpcError::InvalidPackUri)?;
            writer.write(&rels_uri, self.rels.to_xml().as_bytes())?;
        }

        let mut partnames: Vec<&String> = self.parts.keys().collect();
        partnames.sort();

        for partname in partnames {
            let part = &self.parts[partname];
            writer.write(part.partname(), part.blob())?;

            if !part.rels().is_empty() {
                let rels_uri = part.partname().rels_uri().map_err(OpcError::InvalidPackUri)?;
                writer.write(&rels_uri, part.rels().to_xml().as_bytes())?;
            }
        }

        writer.finish()
    }
}

/// Whether a ZIP membername is a relationships file rather than a part.
fn is_rels_member(membername: &str) -> bool {
    membername.ends_with(".rels")
        && (membername.starts_with("_rels/") || membername.contains("/_rels/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn minimal_package() -> Vec<u8> {
        let mut data = Vec::new();
        {
            let cursor = std::io::Cursor::new(&mut data);
            let mut writer = ZipWriter::new(cursor);
            let options = SimpleFileOptions::default();

            writer.start_file("[Content_Types].xml", options).unwrap();
            writer.write_all(br#"<?xml version="1.0"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
</Types>"#).unwrap();

            writer.start_file("_rels/.rels", options).unwrap();
            writer.write_all(br#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>
</Relationships>"#).unwrap();

            writer.start_file("ppt/presentation.xml", options).unwrap();
            writer.write_all(b"<p:presentation/>").unwrap();

            writer.finish().unwrap();
        }
        data
    }

    #[test]
    fn test_open_package() {
        let pkg = OpcPackage::from_bytes(&minimal_package()).unwrap();
        assert_eq!(pkg.part_count(), 1);

        let main = pkg.main_part().unwrap();
        assert_eq!(main.partname().as_str(), "/ppt/presentation.xml");
        assert_eq!(main.blob(), b"<p:presentation/>");
    }

    #[test]
    fn test_save_round_trip() {
        let pkg = OpcPackage::from_bytes(&minimal_package()).unwrap();
        let saved = pkg.save().unwrap();

        let reopened = OpcPackage::from_bytes(&saved).unwrap();
        assert_eq!(
            reopened.main_part().unwrap().blob(),
            b"<p:presentation/>"
        );
    }

    #[test]
    fn test_next_partname() {
        let mut pkg = OpcPackage::from_bytes(&minimal_package()).unwrap();
        let first = pkg.next_partname("/ppt/media/image%d.png").unwrap();
        assert_eq!(first.as_str(), "/ppt/media/image1.png");

        pkg.add_part(Part::new(first, "image/png".to_string(), vec![0x89]));
        let second = pkg.next_partname("/ppt/media/image%d.png").unwrap();
        assert_eq!(second.as_str(), "/ppt/media/image2.png");
    }

    #[test]
    fn test_unknown_part_errors() {
        let pkg = OpcPackage::from_bytes(&minimal_package()).unwrap();
        let missing = PackURI::new("/ppt/slides/slide9.xml").unwrap();
        assert!(matches!(
            pkg.get_part(&missing),
            Err(OpcError::PartNotFound(_))
        ));
    }
}
