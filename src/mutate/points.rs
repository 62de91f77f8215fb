//! Bullet point slide mutation.

use crate::color::Rgb;
use crate::content::PointsContent;
use crate::fetch::ImageFetcher;
use crate::mutate::{
    MutationError, edit_slot_text, fetch_optional, fill_slots, load_target,
    replace_picture_slot, set_slot_text,
};
use crate::pptx::document::Document;
use crate::resolve::{SlotRule, SlotTarget};

pub(crate) fn apply(
    doc: &mut Document,
    content: &PointsContent,
    fetcher: &dyn ImageFetcher,
) -> Result<(), MutationError> {
    let mut slide = load_target(doc, content.slide_number)?;

    set_slot_text(
        &mut slide,
        &SlotRule::exact_or_contains("Header1", "header", SlotTarget::Text),
        &content.header,
        content.header_color.as_deref(),
    )?;

    set_slot_text(
        &mut slide,
        &SlotRule::exact_or_contains("Description1", "description", SlotTarget::Text),
        &content.description,
        content.description_color.as_deref(),
    )?;

    if let Some(bytes) = fetch_optional(fetcher, content.image_url.as_ref()) {
        replace_picture_slot(
            doc,
            &mut slide,
            &SlotRule::exact_or_contains("Image", "image", SlotTarget::Picture),
            bytes,
        )?;
    }

    if !content.points.is_empty() {
        let bullets: Vec<String> = content
            .points
            .iter()
            .map(|point| format!("• {}", point.text))
            .collect();
        let bullets = bullets.join("\n");

        edit_slot_text(
            &mut slide,
            &SlotRule::keywords(&["description1_bg", "points"], SlotTarget::Text),
            |body| {
                body.set_text(&bullets);
                // One paragraph per point; each point may style its own line
                for (index, point) in content.points.iter().enumerate() {
                    if let Some(color) = &point.color {
                        body.color_paragraph(index, Rgb::parse(color));
                    }
                    if let Some(size) = point.font_size {
                        body.size_paragraph(index, size);
                    }
                }
            },
        )?;
    }

    if let Some(background) = &content.background_color {
        fill_slots(
            &mut slide,
            &SlotRule::keywords(&["background", "bg"], SlotTarget::Any),
            background,
        )?;
    }

    doc.store_slide(slide)?;
    Ok(())
}
