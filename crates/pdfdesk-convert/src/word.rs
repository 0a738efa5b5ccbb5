//! Word/PDF conversions, both directions.
//!
//! Both directions are text-level: styling beyond heading/paragraph
//! structure does not survive the trip.

use crate::error::ConvertError;
use crate::textpdf::{render_text_pdf, TextBlock};
use docx_rs::{
    read_docx, Docx, DocumentChild, Paragraph, ParagraphChild, Run, RunChild, TableCellContent,
    TableChild, TableRowChild,
};
use std::io::Cursor;

/// Convert a `.docx` document into a PDF.
pub fn word_to_pdf(bytes: &[u8]) -> Result<Vec<u8>, ConvertError> {
    let docx = read_docx(bytes).map_err(|e| ConvertError::Decode(e.to_string()))?;

    let mut blocks = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => {
                blocks.push(paragraph_block(paragraph));
            }
            DocumentChild::Table(table) => {
                for row in &table.rows {
                    let TableChild::TableRow(row) = row;
                    let cells: Vec<String> = row
                        .cells
                        .iter()
                        .map(|cell| {
                            let TableRowChild::TableCell(cell) = cell;
                            cell.children
                                .iter()
                                .filter_map(|content| match content {
                                    TableCellContent::Paragraph(p) => Some(paragraph_text(p)),
                                    _ => None,
                                })
                                .collect::<Vec<_>>()
                                .join(" ")
                        })
                        .collect();
                    blocks.push(TextBlock::Paragraph(cells.join(" | ")));
                }
                blocks.push(TextBlock::Blank);
            }
            _ => {}
        }
    }

    render_text_pdf(&blocks)
}

/// Extract a PDF's text and wrap it into a `.docx`, one paragraph per line.
pub fn pdf_to_word(bytes: &[u8]) -> Result<Vec<u8>, ConvertError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ConvertError::Decode(e.to_string()))?;
    docx_from_lines(text.lines())
}

pub(crate) fn docx_from_lines<'a, I>(lines: I) -> Result<Vec<u8>, ConvertError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut docx = Docx::new();
    let mut empty = true;
    for line in lines {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
        empty = false;
    }
    if empty {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text("")));
    }

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| ConvertError::Encode(e.to_string()))?;
    Ok(cursor.into_inner())
}

fn paragraph_block(paragraph: &Paragraph) -> TextBlock {
    let text = paragraph_text(paragraph);
    if text.is_empty() {
        return TextBlock::Blank;
    }
    let is_heading = paragraph
        .property
        .style
        .as_ref()
        .is_some_and(|style| style.val.starts_with("Heading"));
    if is_heading {
        TextBlock::Heading(text)
    } else {
        TextBlock::Paragraph(text)
    }
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for piece in &run.children {
                if let RunChild::Text(t) = piece {
                    text.push_str(&t.text);
                }
            }
        }
    }
    text
}
