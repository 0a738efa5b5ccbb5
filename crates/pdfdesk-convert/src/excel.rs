//! Excel to PDF: each sheet becomes a heading followed by one line per row,
//! cells joined with " | ".

use crate::error::ConvertError;
use crate::textpdf::{render_text_pdf, TextBlock};
use calamine::{Reader, Xlsx};
use std::io::Cursor;

pub fn excel_to_pdf(bytes: &[u8]) -> Result<Vec<u8>, ConvertError> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).map_err(|e| ConvertError::Decode(e.to_string()))?;

    let mut blocks = Vec::new();
    for name in workbook.sheet_names().to_owned() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| ConvertError::Decode(format!("sheet '{}': {}", name, e)))?;

        blocks.push(TextBlock::Heading(name));
        for row in range.rows() {
            let line = row
                .iter()
                .map(|cell| cell.to_string())
                .collect::<Vec<_>>()
                .join(" | ");
            blocks.push(TextBlock::Paragraph(line));
        }
        blocks.push(TextBlock::Blank);
    }

    if blocks.is_empty() {
        blocks.push(TextBlock::Paragraph("Empty workbook".into()));
    }

    render_text_pdf(&blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::Document;
    use rust_xlsxwriter::Workbook;

    fn sample_xlsx() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Inventory").unwrap();
        sheet.write_string(0, 0, "item").unwrap();
        sheet.write_string(0, 1, "count").unwrap();
        sheet.write_string(1, 0, "widgets").unwrap();
        sheet.write_number(1, 1, 12.0).unwrap();
        workbook.save_to_buffer().unwrap()
    }

    fn page_text(pdf: &[u8]) -> String {
        let doc = Document::load_mem(pdf).unwrap();
        let mut text = String::new();
        for (_, page_id) in doc.get_pages() {
            text.push_str(&String::from_utf8_lossy(
                &doc.get_page_content(page_id).unwrap(),
            ));
        }
        text
    }

    #[test]
    fn sheet_name_and_rows_appear_in_output() {
        let pdf = excel_to_pdf(&sample_xlsx()).unwrap();
        let text = page_text(&pdf);

        assert!(text.contains("Inventory"));
        assert!(text.contains("item | count"));
        assert!(text.contains("widgets | 12"));
    }

    #[test]
    fn garbage_workbook_is_a_decode_error() {
        let err = excel_to_pdf(b"definitely not xlsx").unwrap_err();
        assert!(matches!(err, ConvertError::Decode(_)));
    }
}
