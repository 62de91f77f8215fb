//! Image gallery slide mutation.
//!
//! Walks the URL list positionally: `Image{i}` gets the downloaded
//! picture, `Header{i}` and `Description{i}` the matching caption text.
//! Headers and descriptions shorter than the image list simply leave the
//! remaining slots untouched.

use crate::content::ImagesContent;
use crate::fetch::ImageFetcher;
use crate::mutate::{
    MutationError, edit_slot_text, load_target, replace_picture_slot, set_slot_text,
};
use crate::pptx::document::Document;
use crate::resolve::{SlotRule, SlotTarget};
use log::warn;

pub(crate) fn apply(
    doc: &mut Document,
    content: &ImagesContent,
    fetcher: &dyn ImageFetcher,
) -> Result<(), MutationError> {
    let mut slide = load_target(doc, content.slide_number)?;

    set_slot_text(
        &mut slide,
        &SlotRule::contains("title", SlotTarget::Text),
        &content.title,
        None,
    )?;

    for (index, url) in content.images.iter().enumerate() {
        let slot = index + 1;

        match fetcher.fetch(url) {
            Ok(bytes) => {
                replace_picture_slot(
                    doc,
                    &mut slide,
                    &SlotRule::indexed_keywords(&["Image", "picture"], slot, SlotTarget::Picture),
                    bytes,
                )?;
            },
            Err(e) => warn!("image fetch failed for {url}: {e}; keeping template image"),
        }

        if let Some(header) = content.headers.get(index).filter(|h| !h.is_empty()) {
            edit_slot_text(
                &mut slide,
                &SlotRule::indexed("Header", slot, SlotTarget::Text),
                |body| {
                    body.set_text(header);
                    body.bold_all(true);
                },
            )?;
        }

        if let Some(description) = content.descriptions.get(index).filter(|d| !d.is_empty()) {
            set_slot_text(
                &mut slide,
                &SlotRule::indexed_keywords(&["Description", "desc"], slot, SlotTarget::Text),
                description,
                None,
            )?;
        }
    }

    doc.store_slide(slide)?;
    Ok(())
}
