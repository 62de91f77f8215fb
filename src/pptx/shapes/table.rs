/// Table access inside graphic frame shapes.
///
/// A table lives in a `<p:graphicFrame>` as an `<a:tbl>` with `<a:tr>` rows
/// of `<a:tc>` cells. Only the cells a mutation writes are regenerated; the
/// grid definition, row heights, and untouched cells keep their bytes. Cell
/// rewrites are batched and applied from the back of the buffer forward so
/// that the spans computed from the original bytes stay valid.
use crate::color::Rgb;
use crate::common::xml::{scan_element, splice};
use crate::pptx::error::Result;
use crate::pptx::shapes::shape::Shape;
use crate::pptx::shapes::textframe::TextBody;
use std::ops::Range;

/// Cell spans of a table, parsed from a graphic frame shape.
#[derive(Debug)]
pub struct Table {
    /// Cell spans per row, absolute within the shape XML
    rows: Vec<Vec<Range<usize>>>,
}

impl Table {
    /// Parse the first table in `shape_xml`.
    pub fn parse(shape_xml: &[u8]) -> Result<Option<Table>> {
        let Some(tbl) = scan_element(shape_xml, b"tbl")? else {
            return Ok(None);
        };

        let mut rows = Vec::new();
        for row in tbl.children.iter().filter(|c| c.name == "tr") {
            let row_slice = &shape_xml[row.range.clone()];
            let Some(tr) = scan_element(row_slice, b"tr")? else {
                continue;
            };
            let cells: Vec<Range<usize>> = tr
                .children
                .iter()
                .filter(|c| c.name == "tc")
                .map(|c| row.range.start + c.range.start..row.range.start + c.range.end)
                .collect();
            rows.push(cells);
        }

        Ok(Some(Table { rows }))
    }

    /// Number of rows in the template table.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of cells in one row.
    pub fn col_count(&self, row: usize) -> usize {
        self.rows.get(row).map(Vec::len).unwrap_or(0)
    }

    /// Byte span of one cell within the shape XML.
    pub fn cell_span(&self, row: usize, col: usize) -> Option<Range<usize>> {
        self.rows.get(row)?.get(col).cloned()
    }
}

/// One pending cell rewrite.
#[derive(Debug)]
pub struct CellEdit {
    pub row: usize,
    pub col: usize,
    pub text: String,
    /// Header styling: bold runs plus an optional color
    pub bold: bool,
    pub color: Option<Rgb>,
}

/// Apply a batch of cell rewrites to a table shape.
///
/// Edits addressing cells outside the template grid are ignored. Returns
/// the number of cells actually written.
pub fn apply_cell_edits(shape: &mut Shape, table: &Table, edits: &[CellEdit]) -> Result<usize> {
    let mut patches: Vec<(Range<usize>, Vec<u8>)> = Vec::with_capacity(edits.len());

    for edit in edits {
        let Some(span) = table.cell_span(edit.row, edit.col) else {
            continue;
        };

        let mut cell_xml = shape.xml()[span.clone()].to_vec();
        let Some(mut body) = TextBody::parse(&cell_xml)? else {
            continue;
        };

        body.set_text(&edit.text);
        if edit.bold {
            body.bold_all(true);
        }
        if let Some(color) = edit.color {
            body.color_all(color);
        }

        let replacement = body.to_xml();
        splice(&mut cell_xml, body.span(), &replacement);
        patches.push((span, cell_xml));
    }

    // Back to front so earlier spans stay valid
    patches.sort_by(|a, b| b.0.start.cmp(&a.0.start));
    let written = patches.len();
    for (span, bytes) in patches {
        shape.splice_raw(span, &bytes);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_shape_xml(rows: usize, cols: usize) -> Vec<u8> {
        let mut xml = String::from(
            r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="5" name="Table 1"/></p:nvGraphicFramePr><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table"><a:tbl><a:tblPr firstRow="1"/><a:tblGrid>"#,
        );
        for _ in 0..cols {
            xml.push_str(r#"<a:gridCol w="914400"/>"#);
        }
        xml.push_str("</a:tblGrid>");
        for row in 0..rows {
            xml.push_str(r#"<a:tr h="370840">"#);
            for col in 0..cols {
                xml.push_str(&format!(
                    r#"<a:tc><a:txBody><a:bodyPr/><a:p><a:r><a:rPr lang="en-US"/><a:t>r{row}c{col}</a:t></a:r></a:p></a:txBody><a:tcPr/></a:tc>"#,
                ));
            }
            xml.push_str("</a:tr>");
        }
        xml.push_str("</a:tbl></a:graphicData></a:graphic></p:graphicFrame>");
        xml.into_bytes()
    }

    #[test]
    fn test_parse_dimensions() {
        let xml = table_shape_xml(3, 2);
        let table = Table::parse(&xml).unwrap().unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.col_count(0), 2);
        assert!(table.cell_span(2, 1).is_some());
        assert!(table.cell_span(3, 0).is_none());
    }

    #[test]
    fn test_apply_cell_edits() {
        let shape_xml = table_shape_xml(2, 2);
        let mut shape = Shape::parse(shape_xml).unwrap();
        let table = Table::parse(shape.xml()).unwrap().unwrap();

        let edits = vec![
            CellEdit {
                row: 0,
                col: 0,
                text: "Region".to_string(),
                bold: true,
                color: Some(Rgb::new(0xFF, 0xFF, 0xFF)),
            },
            CellEdit {
                row: 1,
                col: 1,
                text: "1.2M".to_string(),
                bold: false,
                color: None,
            },
        ];
        let written = apply_cell_edits(&mut shape, &table, &edits).unwrap();
        assert_eq!(written, 2);

        let xml = String::from_utf8(shape.xml().to_vec()).unwrap();
        assert!(xml.contains("<a:t>Region</a:t>"));
        assert!(xml.contains(r#"<a:srgbClr val="FFFFFF"/>"#));
        assert!(xml.contains("<a:t>1.2M</a:t>"));
        // Untouched cells keep their template text
        assert!(xml.contains("<a:t>r0c1</a:t>"));
        assert!(xml.contains("<a:t>r1c0</a:t>"));
    }

    #[test]
    fn test_out_of_grid_edits_ignored() {
        let shape_xml = table_shape_xml(2, 2);
        let mut shape = Shape::parse(shape_xml.clone()).unwrap();
        let table = Table::parse(shape.xml()).unwrap().unwrap();

        let edits = vec![CellEdit {
            row: 5,
            col: 5,
            text: "clipped".to_string(),
            bold: false,
            color: None,
        }];
        let written = apply_cell_edits(&mut shape, &table, &edits).unwrap();
        assert_eq!(written, 0);
        assert_eq!(shape.xml(), shape_xml.as_slice());
    }
}
