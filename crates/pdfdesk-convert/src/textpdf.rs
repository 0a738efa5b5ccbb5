//! Plain-text PDF layout shared by the document converters.
//!
//! Word and Excel inputs reduce to a sequence of text blocks; this module
//! flows them onto A4 pages with a fixed-metric approximation of Helvetica.
//! Faithful typography is expressly not the goal.

use crate::error::ConvertError;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

const PAGE_WIDTH: f64 = 595.0;
const PAGE_HEIGHT: f64 = 842.0;
const MARGIN: f64 = 72.0;
const BODY_SIZE: f64 = 11.0;
const HEADING_SIZE: f64 = 16.0;
const LEADING: f64 = 14.0;
const HEADING_LEADING: f64 = 22.0;

// (PAGE_WIDTH - 2*MARGIN) / (BODY_SIZE * 0.5): ~0.5em average glyph width
// for Helvetica.
const WRAP_COLUMNS: usize = 82;

/// One logical block of converter output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextBlock {
    Heading(String),
    Paragraph(String),
    Blank,
}

struct Line {
    text: String,
    size: f64,
    leading: f64,
    bold: bool,
}

/// Lay text blocks out as an A4 PDF.
pub fn render_text_pdf(blocks: &[TextBlock]) -> Result<Vec<u8>, ConvertError> {
    let mut lines = Vec::new();
    for block in blocks {
        match block {
            TextBlock::Heading(text) => lines.push(Line {
                text: text.clone(),
                size: HEADING_SIZE,
                leading: HEADING_LEADING,
                bold: true,
            }),
            TextBlock::Paragraph(text) => {
                for wrapped in wrap(text, WRAP_COLUMNS) {
                    lines.push(Line {
                        text: wrapped,
                        size: BODY_SIZE,
                        leading: LEADING,
                        bold: false,
                    });
                }
            }
            TextBlock::Blank => lines.push(Line {
                text: String::new(),
                size: BODY_SIZE,
                leading: LEADING,
                bold: false,
            }),
        }
    }

    if lines.is_empty() {
        lines.push(Line {
            text: "Empty document".into(),
            size: BODY_SIZE,
            leading: LEADING,
            bold: false,
        });
    }

    build_document(&lines)
}

fn build_document(lines: &[Line]) -> Result<Vec<u8>, ConvertError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let body_font = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_font = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });

    let mut kids = Vec::new();
    let mut cursor = 0;
    while cursor < lines.len() {
        let mut operations = vec![Operation::new("BT", vec![])];
        let mut y = PAGE_HEIGHT - MARGIN;

        while cursor < lines.len() {
            let line = &lines[cursor];
            y -= line.leading;
            if y < MARGIN {
                break;
            }
            cursor += 1;

            if line.text.is_empty() {
                continue;
            }
            let font = if line.bold { "F2" } else { "F1" };
            operations.extend([
                Operation::new(
                    "Tf",
                    vec![
                        Object::Name(font.as_bytes().to_vec()),
                        Object::Real(line.size as f32),
                    ],
                ),
                Operation::new(
                    "Td",
                    vec![Object::Real(MARGIN as f32), Object::Real(y as f32)],
                ),
                Operation::new("Tj", vec![Object::string_literal(line.text.as_str())]),
                // Reset the text matrix so Td stays absolute per line.
                Operation::new("ET", vec![]),
                Operation::new("BT", vec![]),
            ]);
        }

        operations.push(Operation::new("ET", vec![]));
        let encoded = Content { operations }
            .encode()
            .map_err(|e| ConvertError::Encode(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(PAGE_WIDTH as f32),
                Object::Real(PAGE_HEIGHT as f32),
            ],
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "Font" => dictionary! {
                    "F1" => Object::Reference(body_font),
                    "F2" => Object::Reference(bold_font),
                },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => count,
            "Kids" => kids,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| ConvertError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Greedy word wrap; a single overlong word gets its own line rather than
/// being split mid-word.
fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > columns {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        out.push(current);
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}
