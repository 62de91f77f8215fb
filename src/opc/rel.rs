use crate::common::xml::escape_xml;
use crate::opc::error::{OpcError, Result};
use crate::opc::packuri::PackURI;
/// Relationship objects for OPC packages.
///
/// Every part (and the package itself) may carry a `.rels` file mapping
/// relationship IDs to targets: other parts, or external URLs. The engine
/// reads these to find the presentation part and its slides, and adds new
/// ones when it registers replacement images and hyperlinks.
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;

/// A single relationship from a source part to a target.
#[derive(Debug, Clone)]
pub struct Relationship {
    r_id: String,
    reltype: String,
    target_ref: String,
    base_uri: String,
    is_external: bool,
}

impl Relationship {
    pub fn new(
        r_id: String,
        reltype: String,
        target_ref: String,
        base_uri: String,
        is_external: bool,
    ) -> Self {
        Self {
            r_id,
            reltype,
            target_ref,
            base_uri,
            is_external,
        }
    }

    /// The relationship ID, e.g. `rId3`.
    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    /// The relationship type URI.
    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    /// The target reference: a relative part reference for internal
    /// relationships, an absolute URL for external ones.
    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        self.is_external
    }

    /// The absolute target partname for internal relationships.
    pub fn target_partname(&self) -> Result<PackURI> {
        if self.is_external {
            return Err(OpcError::InvalidRelationship(
                "cannot resolve a partname for an external relationship".to_string(),
            ));
        }
        PackURI::from_rel_ref(&self.base_uri, &self.target_ref).map_err(OpcError::InvalidPackUri)
    }
}

/// Collection of relationships from a single source (package or part).
#[derive(Debug)]
pub struct Relationships {
    base_uri: String,
    rels: HashMap<String, Relationship>,
}

impl Relationships {
    /// Create an empty collection with the given base URI for resolving
    /// relative references.
    pub fn new(base_uri: String) -> Self {
        Self {
            base_uri,
            rels: HashMap::new(),
        }
    }

    /// Parse a `.rels` XML blob into a collection.
    pub fn parse(base_uri: String, xml: &[u8]) -> Result<Self> {
        let mut rels = Self::new(base_uri);
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e)
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut r_id = String::new();
                    let mut reltype = String::new();
                    let mut target = String::new();
                    let mut external = false;

                    for attr in e.attributes().flatten() {
                        let value = attr.unescape_value().map_err(OpcError::from)?;
                        match attr.key.as_ref() {
                            b"Id" => r_id = value.into_owned(),
                            b"Type" => reltype = value.into_owned(),
                            b"Target" => target = value.into_owned(),
                            b"TargetMode" => external = value.as_ref() == "External",
                            _ => {},
                        }
                    }

                    if !r_id.is_empty() {
                        rels.add(reltype, target, r_id, external);
                    }
                },
                Event::Eof => break,
                _ => {},
            }
        }

        Ok(rels)
    }

    /// Add a relationship to the collection.
    pub fn add(
        &mut self,
        reltype: String,
        target_ref: String,
        r_id: String,
        is_external: bool,
    ) -> &Relationship {
        let rel = Relationship::new(
            r_id.clone(),
            reltype,
            target_ref,
            self.base_uri.clone(),
            is_external,
        );
        self.rels.insert(r_id.clone(), rel);
        // Just inserted above
        self.rels.get(r_id.as_str()).unwrap()
    }

    /// Look up a relationship by its ID.
    #[inline]
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.rels.get(r_id)
    }

    /// Get or add an internal relationship to a target part.
    ///
    /// Reuses an existing relationship of the same type and target when one
    /// is present, otherwise allocates the next free `rId`.
    pub fn get_or_add(&mut self, reltype: &str, target_ref: &str) -> &Relationship {
        let existing = self
            .rels
            .values()
            .find(|rel| {
                rel.reltype() == reltype && rel.target_ref() == target_ref && !rel.is_external()
            })
            .map(|rel| rel.r_id().to_string());

        match existing {
            Some(r_id) => &self.rels[&r_id],
            None => {
                let r_id = self.next_r_id();
                self.add(reltype.to_string(), target_ref.to_string(), r_id, false)
            },
        }
    }

    /// Get or add an external relationship, returning its `rId`.
    pub fn get_or_add_external(&mut self, reltype: &str, target_url: &str) -> String {
        for rel in self.rels.values() {
            if rel.reltype() == reltype && rel.target_ref() == target_url && rel.is_external() {
                return rel.r_id().to_string();
            }
        }

        let r_id = self.next_r_id();
        self.add(reltype.to_string(), target_url.to_string(), r_id.clone(), true);
        r_id
    }

    /// The first relationship of the given type, if any.
    pub fn first_of_type(&self, reltype: &str) -> Option<&Relationship> {
        self.rels.values().find(|rel| rel.reltype() == reltype)
    }

    /// Next available `rId`, filling gaps left by removed relationships.
    fn next_r_id(&self) -> String {
        let mut used: Vec<u32> = self
            .rels
            .keys()
            .filter_map(|r_id| r_id.strip_prefix("rId").and_then(|n| n.parse().ok()))
            .collect();
        used.sort_unstable();

        let mut next = 1u32;
        for n in used {
            match n.cmp(&next) {
                std::cmp::Ordering::Equal => next += 1,
                std::cmp::Ordering::Greater => break,
                std::cmp::Ordering::Less => {},
            }
        }
        format!("rId{next}")
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    /// Serialize to `.rels` XML, sorted by numeric `rId` for stable output.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(1024);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        xml.push('\n');

        let mut rels: Vec<&Relationship> = self.rels.values().collect();
        rels.sort_by_key(|rel| {
            rel.r_id()
                .strip_prefix("rId")
                .and_then(|n| n.parse::<u32>().ok())
                .unwrap_or(u32::MAX)
        });

        for rel in rels {
            let target_mode = if rel.is_external() {
                r#" TargetMode="External""#
            } else {
                ""
            };
            xml.push_str(&format!(
                r#"  <Relationship Id="{}" Type="{}" Target="{}"{}/>"#,
                escape_xml(rel.r_id()),
                escape_xml(rel.reltype()),
                escape_xml(rel.target_ref()),
                target_mode
            ));
            xml.push('\n');
        }

        xml.push_str("</Relationships>");
        xml
    }
}
