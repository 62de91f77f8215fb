//! Timeline / phases slide mutation.

use crate::color::Rgb;
use crate::content::PhasesContent;
use crate::mutate::{MutationError, edit_slot_text, fill_slots, load_target, set_slot_text};
use crate::pptx::document::Document;
use crate::resolve::{SlotRule, SlotTarget};

pub(crate) fn apply(doc: &mut Document, content: &PhasesContent) -> Result<(), MutationError> {
    let mut slide = load_target(doc, content.slide_number)?;

    set_slot_text(
        &mut slide,
        &SlotRule::contains("title", SlotTarget::Text),
        &content.title,
        None,
    )?;

    for (index, phase) in content.phases.iter().enumerate() {
        let slot = index + 1;

        let mut text = format!("{}\n{}", phase.name, phase.description);
        if let Some(status) = &phase.status {
            text.push_str(&format!("\nStatus: {status}"));
        }

        edit_slot_text(
            &mut slide,
            &SlotRule::indexed("Phase", slot, SlotTarget::Text),
            |body| {
                body.set_text(&text);
                if let Some(color) = &phase.color {
                    body.color_all(Rgb::parse(color));
                }
                // The phase name line leads
                body.bold_paragraph(0, true);
            },
        )?;
    }

    if let Some(color) = &content.timeline_color {
        fill_slots(
            &mut slide,
            &SlotRule::keywords(&["timeline", "arrow"], SlotTarget::Any),
            color,
        )?;
    }

    doc.store_slide(slide)?;
    Ok(())
}
