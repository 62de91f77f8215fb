//! The `[Content_Types].xml` index of an OPC package.
//!
//! Maps file extensions (Default entries) and individual partnames
//! (Override entries) to content types. The map is parsed when a package is
//! opened, extended when new media parts are registered, and re-emitted on
//! save.

use crate::common::xml::escape_xml;
use crate::opc::error::{OpcError, Result};
use crate::opc::packuri::PackURI;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;

/// Content type lookup for every part in a package.
#[derive(Debug, Default)]
pub struct ContentTypeMap {
    /// Default content types by lowercase extension
    defaults: HashMap<String, String>,
    /// Override content types by partname
    overrides: HashMap<String, String>,
}

impl ContentTypeMap {
    /// Parse a `[Content_Types].xml` blob.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut map = Self::default();
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                    b"Default" => {
                        let (mut ext, mut ct) = (String::new(), String::new());
                        for attr in e.attributes().flatten() {
                            let value = attr.unescape_value().map_err(OpcError::from)?;
                            match attr.key.as_ref() {
                                b"Extension" => ext = value.to_lowercase(),
                                b"ContentType" => ct = value.into_owned(),
                                _ => {},
                            }
                        }
                        if !ext.is_empty() {
                            map.defaults.insert(ext, ct);
                        }
                    },
                    b"Override" => {
                        let (mut partname, mut ct) = (String::new(), String::new());
                        for attr in e.attributes().flatten() {
                            let value = attr.unescape_value().map_err(OpcError::from)?;
                            match attr.key.as_ref() {
                                b"PartName" => partname = value.into_owned(),
                                b"ContentType" => ct = value.into_owned(),
                                _ => {},
                            }
                        }
                        if !partname.is_empty() {
                            map.overrides.insert(partname, ct);
                        }
                    },
                    _ => {},
                },
                Event::Eof => break,
                _ => {},
            }
        }

        Ok(map)
    }

    /// Resolve the content type for a partname.
    ///
    /// Overrides win over extension defaults, per the OPC spec.
    pub fn content_type_for(&self, partname: &PackURI) -> Result<&str> {
        if let Some(ct) = self.overrides.get(partname.as_str()) {
            return Ok(ct);
        }
        self.defaults
            .get(&partname.ext().to_lowercase())
            .map(String::as_str)
            .ok_or_else(|| OpcError::ContentTypeNotFound(partname.to_string()))
    }

    /// Register a Default entry for an extension (e.g. a newly added image
    /// format). Existing entries are left alone.
    pub fn register_default(&mut self, ext: &str, content_type: &str) {
        self.defaults
            .entry(ext.to_lowercase())
            .or_insert_with(|| content_type.to_string());
    }

    /// Serialize back to `[Content_Types].xml`, entries sorted for stable
    /// output.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        xml.push('\n');

        let mut exts: Vec<_> = self.defaults.keys().collect();
        exts.sort();
        for ext in exts {
            xml.push_str(&format!(
                r#"  <Default Extension="{}" ContentType="{}"/>"#,
                escape_xml(ext),
                escape_xml(&self.defaults[ext])
            ));
            xml.push('\n');
        }

        let mut partnames: Vec<_> = self.overrides.keys().collect();
        partnames.sort();
        for partname in partnames {
            xml.push_str(&format!(
                r#"  <Override PartName="{}" ContentType="{}"/>"#,
                escape_xml(partname),
                escape_xml(&self.overrides[partname])
            ));
            xml.push('\n');
        }

        xml.push_str("</Types>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = br#"<?xml version="1.0"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
</Types>"#;

    #[test]
    fn test_parse_and_lookup() {
        let map = ContentTypeMap::parse(SAMPLE).unwrap();

        let pres = PackURI::new("/ppt/presentation.xml").unwrap();
        assert_eq!(
            map.content_type_for(&pres).unwrap(),
            "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"
        );

        let other = PackURI::new("/docProps/app.xml").unwrap();
        assert_eq!(map.content_type_for(&other).unwrap(), "application/xml");

        let missing = PackURI::new("/ppt/media/image1.png").unwrap();
        assert!(map.content_type_for(&missing).is_err());
    }

    #[test]
    fn test_register_default_round_trip() {
        let mut map = ContentTypeMap::parse(SAMPLE).unwrap();
        map.register_default("png", "image/png");

        let reparsed = ContentTypeMap::parse(map.to_xml().as_bytes()).unwrap();
        let image = PackURI::new("/ppt/media/image1.png").unwrap();
        assert_eq!(reparsed.content_type_for(&image).unwrap(), "image/png");
    }
}
