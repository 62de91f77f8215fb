//! Image-beside-text slide mutation.

use crate::content::ImageTextContent;
use crate::fetch::ImageFetcher;
use crate::mutate::{
    MutationError, fetch_optional, load_target, replace_picture_slot, set_slot_text,
};
use crate::pptx::document::Document;
use crate::resolve::{SlotRule, SlotTarget};

pub(crate) fn apply(
    doc: &mut Document,
    content: &ImageTextContent,
    fetcher: &dyn ImageFetcher,
) -> Result<(), MutationError> {
    let mut slide = load_target(doc, content.slide_number)?;

    set_slot_text(
        &mut slide,
        &SlotRule::exact_or_contains("P100", "title", SlotTarget::Text),
        &content.title,
        content.title_color.as_deref(),
    )?;

    set_slot_text(
        &mut slide,
        &SlotRule::exact_or_contains("S100", "text", SlotTarget::Text),
        &content.text,
        content.text_color.as_deref(),
    )?;

    if let Some(bytes) = fetch_optional(fetcher, content.image_url.as_ref()) {
        replace_picture_slot(
            doc,
            &mut slide,
            &SlotRule::keywords(&["image", "picture"], SlotTarget::Picture),
            bytes,
        )?;
    }

    doc.store_slide(slide)?;
    Ok(())
}
