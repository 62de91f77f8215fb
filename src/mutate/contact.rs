//! Contact slide mutation.
//!
//! Link slots get real hyperlinks: an external relationship on the slide
//! part plus `a:hlinkClick` on the slot's runs (`mailto:` for the email
//! slot). The optional scheme text color recolors every text shape except
//! title-named ones, without touching their text.

use crate::color::Rgb;
use crate::content::ContactContent;
use crate::fetch::ImageFetcher;
use crate::mutate::{
    MutationError, edit_slot_text, load_target, replace_picture_list, set_slot_text,
};
use crate::pptx::document::Document;
use crate::pptx::slide::Slide;
use crate::resolve::{SlotRule, SlotTarget, resolve};

pub(crate) fn apply(
    doc: &mut Document,
    content: &ContactContent,
    fetcher: &dyn ImageFetcher,
) -> Result<(), MutationError> {
    let mut slide = load_target(doc, content.slide_number)?;

    set_slot_text(
        &mut slide,
        &SlotRule::contains("title", SlotTarget::Text),
        &content.title,
        content.colors.primary.as_deref(),
    )?;

    set_linked_slot(
        doc,
        &mut slide,
        &SlotRule::keywords(&["website", "web"], SlotTarget::Text),
        &content.website_link,
        &content.website_link,
    )?;

    if let Some(linkedin) = &content.linkedin_link {
        set_linked_slot(
            doc,
            &mut slide,
            &SlotRule::contains("linkedin", SlotTarget::Text),
            linkedin,
            linkedin,
        )?;
    }

    if let Some(email) = &content.email {
        set_linked_slot(
            doc,
            &mut slide,
            &SlotRule::keywords(&["email", "mail"], SlotTarget::Text),
            email,
            &format!("mailto:{email}"),
        )?;
    }

    if let Some(phone) = &content.phone {
        set_slot_text(
            &mut slide,
            &SlotRule::keywords(&["phone", "tel"], SlotTarget::Text),
            phone,
            None,
        )?;
    }

    if !content.images.is_empty() {
        replace_picture_list(
            doc,
            &mut slide,
            &SlotRule::keywords(&["image", "qr", "picture"], SlotTarget::Picture),
            &content.images,
            fetcher,
        )?;
    }

    if let Some(text_color) = &content.colors.text {
        recolor_body_text(&mut slide, Rgb::parse(text_color))?;
    }

    doc.store_slide(slide)?;
    Ok(())
}

/// Overwrite a slot's text and point its runs at an external URL.
fn set_linked_slot(
    doc: &mut Document,
    slide: &mut Slide,
    rule: &SlotRule,
    text: &str,
    url: &str,
) -> Result<bool, MutationError> {
    if resolve(slide, rule).is_none() {
        return Ok(false);
    }

    let rid = doc.add_hyperlink(slide.partname(), url)?;
    edit_slot_text(slide, rule, |body| {
        body.set_text(text);
        body.hyperlink_all(&rid);
    })
}

/// Apply the scheme text color to every non-title text shape, keeping the
/// existing text.
fn recolor_body_text(slide: &mut Slide, color: Rgb) -> Result<(), MutationError> {
    let targets: Vec<usize> = slide
        .shapes()
        .filter(|(_, shape)| {
            shape.has_text_frame() && !shape.name().to_lowercase().contains("title")
        })
        .map(|(index, _)| index)
        .collect();

    for index in targets {
        if let Some(shape) = slide.shape_mut(index)
            && let Some(mut body) = shape.text_body()?
        {
            body.color_all(color);
            shape.set_text_body(&body);
        }
    }
    Ok(())
}
