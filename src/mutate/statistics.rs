//! Statistics slide mutation.
//!
//! Each statistic goes into a combined `Stat{i}` slot as a label line over
//! a bold value line; templates that split the pair expose separate
//! `Label{i}` / `Value{i}` slots instead, tried as the fallback.

use crate::color::Rgb;
use crate::content::{Stat, StatisticsContent};
use crate::mutate::{
    MutationError, edit_slot_text, fill_slots, load_target, set_slot_text,
};
use crate::pptx::document::Document;
use crate::pptx::slide::Slide;
use crate::resolve::{SlotRule, SlotTarget};

pub(crate) fn apply(
    doc: &mut Document,
    content: &StatisticsContent,
) -> Result<(), MutationError> {
    let mut slide = load_target(doc, content.slide_number)?;

    set_slot_text(
        &mut slide,
        &SlotRule::contains("title", SlotTarget::Text),
        &content.title,
        content.title_color.as_deref(),
    )?;

    if let Some(description) = &content.description {
        set_slot_text(
            &mut slide,
            &SlotRule::contains("description", SlotTarget::Text),
            description,
            content.description_color.as_deref(),
        )?;
    }

    for (index, stat) in content.stats.iter().enumerate() {
        let slot = index + 1;

        let combined = edit_slot_text(
            &mut slide,
            &SlotRule::indexed("Stat", slot, SlotTarget::Text),
            |body| {
                body.set_text(&format!("{}\n{}", stat.label, stat.value));
                if let Some(color) = &stat.color {
                    body.color_all(Rgb::parse(color));
                }
                if let Some(size) = stat.font_size {
                    body.size_all(size);
                }
                // The value line carries the emphasis
                body.bold_paragraph(1, true);
            },
        )?;

        if !combined {
            apply_split_stat(&mut slide, slot, stat)?;
        }
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

/// Write one statistic into separate `Label{i}` / `Value{i}` slots.
fn apply_split_stat(slide: &mut Slide, slot: usize, stat: &Stat) -> Result<(), MutationError> {
    edit_slot_text(
        slide,
        &SlotRule::indexed("Label", slot, SlotTarget::Text),
        |body| {
            body.set_text(&stat.label);
            if let Some(color) = &stat.color {
                body.color_all(Rgb::parse(color));
            }
        },
    )?;

    edit_slot_text(
        slide,
        &SlotRule::indexed("Value", slot, SlotTarget::Text),
        |body| {
            body.set_text(&stat.value);
            if let Some(color) = &stat.color {
                body.color_all(Rgb::parse(color));
            }
            if let Some(size) = stat.font_size {
                body.size_all(size);
            }
            body.bold_all(true);
        },
    )?;

    Ok(())
}
