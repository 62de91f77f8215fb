//! Cover slide mutation.

use crate::content::CoverContent;
use crate::fetch::ImageFetcher;
use crate::mutate::{
    MutationError, fill_slots, load_target, replace_picture_list, set_slot_text,
};
use crate::pptx::document::Document;
use crate::resolve::{SlotRule, SlotTarget};

pub(crate) fn apply(
    doc: &mut Document,
    content: &CoverContent,
    fetcher: &dyn ImageFetcher,
) -> Result<(), MutationError> {
    let mut slide = load_target(doc, content.slide_number)?;

    set_slot_text(
        &mut slide,
        &SlotRule::contains("title", SlotTarget::Text),
        &content.title,
        content.colors.primary.as_deref(),
    )?;

    if let Some(subtitle) = &content.subtitle {
        set_slot_text(
            &mut slide,
            &SlotRule::contains("subtitle", SlotTarget::Text),
            subtitle,
            content.colors.secondary.as_deref(),
        )?;
    }

    set_slot_text(
        &mut slide,
        &SlotRule::contains("company", SlotTarget::Text),
        &content.company_name,
        None,
    )?;

    if !content.images.is_empty() {
        replace_picture_list(
            doc,
            &mut slide,
            &SlotRule::keywords(&["image", "logo", "picture"], SlotTarget::Picture),
            &content.images,
            fetcher,
        )?;
    }

    if let Some(background) = &content.colors.background {
        fill_slots(
            &mut slide,
            &SlotRule::keywords(&["background", "bg"], SlotTarget::Any),
            background,
        )?;
    }

    doc.store_slide(slide)?;
    Ok(())
}
