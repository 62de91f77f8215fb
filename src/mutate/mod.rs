//! The ten kind-specific mutation strategies.
//!
//! Every mutator follows the same shape: load the target slide, run a fixed
//! sequence of slot resolutions and in-place edits, store the slide back.
//! A slot that does not resolve is skipped silently; templates vary and the
//! engine degrades gracefully rather than rejecting them. Dispatch over the
//! descriptor kinds is an exhaustive `match`, so adding a kind without a
//! mutator does not compile.

use crate::color::Rgb;
use crate::content::SlideContent;
use crate::fetch::ImageFetcher;
use crate::pptx::document::Document;
use crate::pptx::error::PptxError;
use crate::pptx::shapes::picture::picture_xml;
use crate::pptx::shapes::textframe::TextBody;
use crate::pptx::shapes::Shape;
use crate::pptx::slide::Slide;
use crate::resolve::{SlotRule, resolve, resolve_all};
use log::{debug, warn};
use thiserror::Error;

mod contact;
mod cover;
mod graph;
mod image_text;
mod images;
mod people;
mod phases;
mod points;
mod statistics;
mod table;

/// Why one batch item failed.
///
/// Fetch failures never appear here: an unreachable image is recovered
/// inside the mutator and the rest of the item still applies.
#[derive(Error, Debug)]
pub enum MutationError {
    /// The descriptor addresses a slide the template does not have
    #[error("slide {requested} out of range: presentation has {count} slides")]
    SlideOutOfRange { requested: u32, count: usize },

    /// A required descriptor field is empty
    #[error("invalid content: {0}")]
    InvalidContent(String),

    /// A slide kind string outside the supported ten
    #[error("unsupported slide kind: {0}")]
    UnsupportedKind(String),

    /// Document-level failure (malformed part, missing relationship, ...)
    #[error(transparent)]
    Document(#[from] PptxError),
}

/// Apply one content descriptor to an open document.
///
/// Validates the descriptor, bounds-checks the slide number, and runs the
/// kind's mutator. This is the unit the batch orchestrator isolates: an
/// error here marks the item failed and leaves the document serializable.
pub fn apply_content(
    doc: &mut Document,
    content: &SlideContent,
    fetcher: &dyn ImageFetcher,
) -> Result<(), MutationError> {
    content.validate()?;

    let requested = content.slide_number();
    let count = doc.slide_count();
    if requested == 0 || requested as usize > count {
        return Err(MutationError::SlideOutOfRange { requested, count });
    }

    debug!("applying '{}' content to slide {requested}", content.kind());
    match content {
        SlideContent::Points(c) => points::apply(doc, c, fetcher),
        SlideContent::ImageText(c) => image_text::apply(doc, c, fetcher),
        SlideContent::Table(c) => table::apply(doc, c),
        SlideContent::Phases(c) => phases::apply(doc, c),
        SlideContent::Statistics(c) => statistics::apply(doc, c),
        SlideContent::People(c) => people::apply(doc, c),
        SlideContent::Cover(c) => cover::apply(doc, c, fetcher),
        SlideContent::Contact(c) => contact::apply(doc, c, fetcher),
        SlideContent::Images(c) => images::apply(doc, c, fetcher),
        SlideContent::Graph(c) => graph::apply(doc, c),
    }
}

/// Load the slide a descriptor targets (1-based, already bounds-checked).
pub(crate) fn load_target(doc: &Document, slide_number: u32) -> Result<Slide, MutationError> {
    Ok(doc.load_slide(slide_number as usize - 1)?)
}

/// Resolve a text slot and edit its text body in place.
///
/// Returns whether the slot was present. Shapes that resolve but carry no
/// text body are treated as absent.
pub(crate) fn edit_slot_text(
    slide: &mut Slide,
    rule: &SlotRule,
    edit: impl FnOnce(&mut TextBody),
) -> Result<bool, MutationError> {
    let Some(index) = resolve(slide, rule) else {
        return Ok(false);
    };
    let Some(shape) = slide.shape_mut(index) else {
        return Ok(false);
    };
    let Some(mut body) = shape.text_body()? else {
        return Ok(false);
    };

    edit(&mut body);
    shape.set_text_body(&body);
    Ok(true)
}

/// Overwrite a text slot, optionally recoloring all runs.
pub(crate) fn set_slot_text(
    slide: &mut Slide,
    rule: &SlotRule,
    text: &str,
    color: Option<&str>,
) -> Result<bool, MutationError> {
    edit_slot_text(slide, rule, |body| {
        body.set_text(text);
        if let Some(color) = color {
            body.color_all(Rgb::parse(color));
        }
    })
}

/// Replace the picture shape at a node index with new image bytes.
///
/// The replacement node reuses the old shape's id, name, and bounding box,
/// and takes the old node's tree position.
pub(crate) fn replace_picture_at(
    doc: &mut Document,
    slide: &mut Slide,
    index: usize,
    bytes: Vec<u8>,
) -> Result<(), MutationError> {
    let Some(shape) = slide.shape(index) else {
        return Ok(());
    };
    let (id, name, geometry) = (shape.id(), shape.name().to_string(), shape.geometry());

    let rid = doc.add_image(slide.partname(), bytes)?;
    let node = picture_xml(id, &name, &rid, geometry);
    slide.replace_shape(index, Shape::parse(node).map_err(MutationError::Document)?);
    debug!("replaced picture '{name}' with media relationship {rid}");
    Ok(())
}

/// Resolve a picture slot and replace its image. Returns whether the slot
/// was present.
pub(crate) fn replace_picture_slot(
    doc: &mut Document,
    slide: &mut Slide,
    rule: &SlotRule,
    bytes: Vec<u8>,
) -> Result<bool, MutationError> {
    let Some(index) = resolve(slide, rule) else {
        return Ok(false);
    };
    replace_picture_at(doc, slide, index, bytes)?;
    Ok(true)
}

/// Pair an ordered URL list positionally with every picture slot the rule
/// matches, fetching and replacing each. Surplus URLs and surplus slots are
/// ignored; a failed fetch skips that slot and continues.
pub(crate) fn replace_picture_list(
    doc: &mut Document,
    slide: &mut Slide,
    rule: &SlotRule,
    urls: &[String],
    fetcher: &dyn ImageFetcher,
) -> Result<(), MutationError> {
    let slots = resolve_all(slide, rule);

    for (index, url) in slots.into_iter().zip(urls.iter()) {
        match fetcher.fetch(url) {
            Ok(bytes) => replace_picture_at(doc, slide, index, bytes)?,
            Err(e) => warn!("image fetch failed for {url}: {e}; keeping template image"),
        }
    }
    Ok(())
}

/// Fetch a single optional image, recovering from failure with a warning.
pub(crate) fn fetch_optional(
    fetcher: &dyn ImageFetcher,
    url: Option<&String>,
) -> Option<Vec<u8>> {
    let url = url?;
    match fetcher.fetch(url) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            warn!("image fetch failed for {url}: {e}; continuing without image");
            None
        },
    }
}

/// Apply a solid fill to every shape the rule matches. Returns the number
/// of shapes recolored.
pub(crate) fn fill_slots(
    slide: &mut Slide,
    rule: &SlotRule,
    color: &str,
) -> Result<usize, MutationError> {
    let rgb = Rgb::parse(color);
    let indexes = resolve_all(slide, rule);
    let mut filled = 0;

    for index in indexes {
        if let Some(shape) = slide.shape_mut(index) {
            shape.set_solid_fill(rgb)?;
            filled += 1;
        }
    }
    Ok(filled)
}
