//! Team / people slide mutation.
//!
//! Designation and description lists are padded with empty strings to the
//! names list's length, so a partially filled request still lines up
//! positionally. Combined `Person{i}` slots take name / designation /
//! description as stacked lines (name bold, designation italic); templates
//! that split the card expose `Name{i}` / `Designation{i}` /
//! `Description{i}` slots instead.

use crate::content::PeopleContent;
use crate::mutate::{
    MutationError, edit_slot_text, fill_slots, load_target, set_slot_text,
};
use crate::pptx::document::Document;
use crate::pptx::slide::Slide;
use crate::resolve::{SlotRule, SlotTarget};

pub(crate) fn apply(doc: &mut Document, content: &PeopleContent) -> Result<(), MutationError> {
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

    for (index, name) in content.names.iter().enumerate() {
        let slot = index + 1;
        let designation = content.designations.get(index).map_or("", String::as_str);
        let description = content.descriptions.get(index).map_or("", String::as_str);

        let mut text = format!("{name}\n{designation}");
        if !description.is_empty() {
            text.push_str(&format!("\n{description}"));
        }

        let combined = edit_slot_text(
            &mut slide,
            &SlotRule::indexed("Person", slot, SlotTarget::Text),
            |body| {
                body.set_text(&text);
                body.bold_paragraph(0, true);
                body.italic_paragraph(1, true);
            },
        )?;

        if !combined {
            apply_split_person(&mut slide, slot, name, designation, description)?;
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

/// Write one person into separate name / designation / description slots.
fn apply_split_person(
    slide: &mut Slide,
    slot: usize,
    name: &str,
    designation: &str,
    description: &str,
) -> Result<(), MutationError> {
    edit_slot_text(
        slide,
        &SlotRule::indexed("Name", slot, SlotTarget::Text),
        |body| {
            body.set_text(name);
            body.bold_all(true);
        },
    )?;

    edit_slot_text(
        slide,
        &SlotRule::indexed("Designation", slot, SlotTarget::Text),
        |body| {
            body.set_text(designation);
            body.italic_all(true);
        },
    )?;

    edit_slot_text(
        slide,
        &SlotRule::indexed_keywords(&["Description", "desc"], slot, SlotTarget::Text),
        |body| body.set_text(description),
    )?;

    Ok(())
}
