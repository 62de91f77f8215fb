/// The open document: one OPC package plus its resolved slide order.
///
/// A `Document` is owned exclusively by the request that opened it: it is
/// mutated in place, slide by slide, and serialized exactly once at the end
/// of the batch. Slide order comes from the presentation part's
/// `<p:sldIdLst>`, resolved through the part's relationships the same way a
/// consumer application resolves it.
use crate::opc::constants::relationship_type;
use crate::opc::package::OpcPackage;
use crate::opc::packuri::PackURI;
use crate::opc::part::Part;
use crate::pptx::error::{PptxError, Result};
use crate::pptx::media::ImageFormat;
use crate::pptx::slide::Slide;
use log::debug;
use quick_xml::Reader;
use quick_xml::events::Event;

pub struct Document {
    package: OpcPackage,
    /// Slide partnames in presentation order
    slide_partnames: Vec<PackURI>,
}

impl Document {
    /// Open a presentation package from its bytes.
    pub fn open(bytes: &[u8]) -> Result<Self> {
        let package = OpcPackage::from_bytes(bytes)?;

        let slide_partnames = {
            let pres = package.main_part()?;
            let base_uri = pres.partname().base_uri();

            let mut partnames = Vec::new();
            for rid in slide_rids(pres.blob())? {
                let target = pres.target_ref(&rid)?;
                let partname = PackURI::from_rel_ref(base_uri, target)
                    .map_err(PptxError::InvalidPackage)?;
                partnames.push(partname);
            }
            partnames
        };

        debug!("opened presentation with {} slides", slide_partnames.len());
        Ok(Self {
            package,
            slide_partnames,
        })
    }

    /// Number of slides in the presentation.
    #[inline]
    pub fn slide_count(&self) -> usize {
        self.slide_partnames.len()
    }

    /// Parse the slide at a 0-based index.
    pub fn load_slide(&self, index: usize) -> Result<Slide> {
        let partname = self
            .slide_partnames
            .get(index)
            .ok_or(PptxError::SlideIndex(index))?;
        let part = self.package.get_part(partname)?;
        Slide::parse(partname.clone(), part.blob())
    }

    /// Write a mutated slide back to its part.
    pub fn store_slide(&mut self, slide: Slide) -> Result<()> {
        let partname = slide.partname().clone();
        let xml = slide.to_xml();
        self.package.get_part_mut(&partname)?.set_blob(xml);
        Ok(())
    }

    /// Register image bytes as a new media part and relate the given slide
    /// to it. Returns the relationship ID for the slide's `r:embed`.
    pub fn add_image(&mut self, slide_partname: &PackURI, bytes: Vec<u8>) -> Result<String> {
        let format =
            ImageFormat::detect_from_bytes(&bytes).ok_or(PptxError::UnsupportedImage)?;

        let partname = self.package.next_partname(&format!(
            "/ppt/media/image%d.{}",
            format.extension()
        ))?;
        let target = partname.relative_ref(slide_partname.base_uri());

        debug!("registering media part {partname} ({} bytes)", bytes.len());
        self.package
            .add_part(Part::new(partname, format.mime_type().to_string(), bytes));

        let slide_part = self.package.get_part_mut(slide_partname)?;
        Ok(slide_part.relate_to(&target, relationship_type::IMAGE))
    }

    /// Register an external hyperlink relationship on a slide part.
    /// Returns the relationship ID for `a:hlinkClick`.
    pub fn add_hyperlink(&mut self, slide_partname: &PackURI, url: &str) -> Result<String> {
        let slide_part = self.package.get_part_mut(slide_partname)?;
        Ok(slide_part.relate_to_external(url, relationship_type::HYPERLINK))
    }

    /// Serialize the document to package bytes.
    ///
    /// Called exactly once per request, after all mutations are applied.
    pub fn save(&self) -> Result<Vec<u8>> {
        Ok(self.package.save()?)
    }

    /// Access the underlying OPC package.
    #[inline]
    pub fn package(&self) -> &OpcPackage {
        &self.package
    }
}

/// Relationship IDs of `<p:sldId>` entries, in presentation order.
fn slide_rids(presentation_xml: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(presentation_xml);
    reader.config_mut().trim_text(true);

    let mut rids = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sldId" => {
                for attr in e.attributes().flatten() {
                    // The slide reference is the r:id attribute, not the
                    // numeric id
                    if attr.key.as_ref() == b"r:id" {
                        if let Ok(rid) = std::str::from_utf8(&attr.value)
                            && rid.starts_with("rId")
                        {
                            rids.push(rid.to_string());
                        }
                    }
                }
            },
            Event::Eof => break,
            _ => {},
        }
    }

    Ok(rids)
}
