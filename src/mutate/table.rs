//! Table slide mutation.
//!
//! Writes into the template's existing grid only: input rows and columns
//! beyond the template's dimensions are silently dropped, and template
//! cells the input does not cover keep their content.

use crate::color::Rgb;
use crate::content::TableContent;
use crate::mutate::{MutationError, load_target, set_slot_text};
use crate::pptx::document::Document;
use crate::pptx::shapes::Table;
use crate::pptx::shapes::table::{CellEdit, apply_cell_edits};
use crate::resolve::{SlotRule, SlotTarget, resolve};
use log::debug;

pub(crate) fn apply(doc: &mut Document, content: &TableContent) -> Result<(), MutationError> {
    let mut slide = load_target(doc, content.slide_number)?;

    set_slot_text(
        &mut slide,
        &SlotRule::contains("title", SlotTarget::Text),
        &content.title,
        None,
    )?;

    if let Some(index) = resolve(&slide, &SlotRule::any_of(SlotTarget::Table))
        && let Some(shape) = slide.shape_mut(index)
        && let Some(table) = Table::parse(shape.xml())?
    {
        let header_color = content.header_color.as_deref().map(Rgb::parse);

        let mut edits = Vec::new();
        for (row, row_data) in content
            .table_data
            .iter()
            .enumerate()
            .take(table.row_count())
        {
            let is_header = row == 0 && content.header_row;
            for (col, cell) in row_data.iter().enumerate().take(table.col_count(row)) {
                edits.push(CellEdit {
                    row,
                    col,
                    text: cell.clone(),
                    bold: is_header,
                    color: if is_header { header_color } else { None },
                });
            }
        }

        let written = apply_cell_edits(shape, &table, &edits)?;
        debug!(
            "wrote {written} table cells (input {}x{}, template {}x{})",
            content.table_data.len(),
            content.table_data.first().map(Vec::len).unwrap_or(0),
            table.row_count(),
            table.col_count(0),
        );
    }

    doc.store_slide(slide)?;
    Ok(())
}
