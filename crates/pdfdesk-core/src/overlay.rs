//! Text overlays: watermarks and page numbers.
//!
//! Each overlay is an extra content stream appended after the page's own
//! content, so it draws on top without touching existing operators. Glyph
//! widths are approximated (Helvetica averages about half the font size per
//! character), which is plenty for centering short strings.

use crate::error::PdfError;
use crate::pagetree::{
    append_page_content, ensure_overlay_resources, load_document, page_ids_in_order, page_size,
    save_document,
};
use lopdf::content::{Content, Operation};
use lopdf::Object;
use std::str::FromStr;

const WATERMARK_FONT_SIZE: f64 = 50.0;
const PAGE_NUMBER_FONT_SIZE: f64 = 10.0;
const PAGE_NUMBER_BASELINE: f64 = 30.0;
const PAGE_NUMBER_SIDE_MARGIN: f64 = 50.0;

// sin/cos of the 45 degree watermark diagonal.
const DIAG: f64 = std::f64::consts::FRAC_1_SQRT_2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNumberPosition {
    BottomCenter,
    BottomRight,
    BottomLeft,
}

impl FromStr for PageNumberPosition {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bottom-center" => Ok(Self::BottomCenter),
            "bottom-right" => Ok(Self::BottomRight),
            "bottom-left" => Ok(Self::BottomLeft),
            other => Err(PdfError::Operation(format!(
                "position must be one of: bottom-center, bottom-right, bottom-left (got {:?})",
                other
            ))),
        }
    }
}

/// Stamp a diagonal gray text watermark across every page.
pub fn add_watermark(bytes: &[u8], text: &str, opacity: f64) -> Result<Vec<u8>, PdfError> {
    let opacity = opacity.clamp(0.0, 1.0);
    let mut doc = load_document(bytes)?;

    for page_id in page_ids_in_order(&doc) {
        let (width, height) = page_size(&doc, page_id);
        ensure_overlay_resources(
            &mut doc,
            page_id,
            "Fwm",
            "Helvetica-Bold",
            Some(("GSwm", opacity)),
        )?;

        let half_width = approx_text_width(text, WATERMARK_FONT_SIZE) / 2.0;
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new("gs", vec![Object::Name(b"GSwm".to_vec())]),
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![
                        Object::Name(b"Fwm".to_vec()),
                        Object::Real(WATERMARK_FONT_SIZE as f32),
                    ],
                ),
                Operation::new("rg", vec![real(0.5), real(0.5), real(0.5)]),
                // Rotate the text matrix 45 degrees around the page center.
                Operation::new(
                    "Tm",
                    vec![
                        real(DIAG),
                        real(DIAG),
                        real(-DIAG),
                        real(DIAG),
                        real(width / 2.0),
                        real(height / 2.0),
                    ],
                ),
                // Back up half the string length along the rotated baseline.
                Operation::new("Td", vec![real(-half_width), real(0.0)]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
                Operation::new("Q", vec![]),
            ],
        };

        let encoded = content
            .encode()
            .map_err(|e| PdfError::Operation(format!("content encoding failed: {}", e)))?;
        append_page_content(&mut doc, page_id, encoded)?;
    }

    save_document(doc)
}

/// Stamp "Page i of N" near the bottom edge of every page.
pub fn add_page_numbers(bytes: &[u8], position: PageNumberPosition) -> Result<Vec<u8>, PdfError> {
    let mut doc = load_document(bytes)?;

    let page_ids = page_ids_in_order(&doc);
    let total = page_ids.len();

    for (index, &page_id) in page_ids.iter().enumerate() {
        let (width, _) = page_size(&doc, page_id);
        ensure_overlay_resources(&mut doc, page_id, "Fpn", "Helvetica", None)?;

        let label = format!("Page {} of {}", index + 1, total);
        let text_width = approx_text_width(&label, PAGE_NUMBER_FONT_SIZE);
        let x = match position {
            PageNumberPosition::BottomCenter => (width - text_width) / 2.0,
            PageNumberPosition::BottomRight => width - PAGE_NUMBER_SIDE_MARGIN - text_width,
            PageNumberPosition::BottomLeft => PAGE_NUMBER_SIDE_MARGIN,
        };

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![
                        Object::Name(b"Fpn".to_vec()),
                        Object::Real(PAGE_NUMBER_FONT_SIZE as f32),
                    ],
                ),
                Operation::new("rg", vec![real(0.0), real(0.0), real(0.0)]),
                Operation::new("Td", vec![real(x), real(PAGE_NUMBER_BASELINE)]),
                Operation::new("Tj", vec![Object::string_literal(label)]),
                Operation::new("ET", vec![]),
                Operation::new("Q", vec![]),
            ],
        };

        let encoded = content
            .encode()
            .map_err(|e| PdfError::Operation(format!("content encoding failed: {}", e)))?;
        append_page_content(&mut doc, page_id, encoded)?;
    }

    save_document(doc)
}

fn real(v: f64) -> Object {
    Object::Real(v as f32)
}

fn approx_text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::create_test_pdf;
    use lopdf::Document;

    fn content_of_page(bytes: &[u8], page: u32) -> Vec<u8> {
        let doc = Document::load_mem(bytes).unwrap();
        let pages = doc.get_pages();
        doc.get_page_content(pages[&page]).unwrap()
    }

    #[test]
    fn watermark_lands_on_every_page() {
        let pdf = create_test_pdf(3);
        let result = add_watermark(&pdf, "CONFIDENTIAL", 0.3).unwrap();

        for page in 1..=3 {
            let content = content_of_page(&result, page);
            let text = String::from_utf8_lossy(&content);
            assert!(text.contains("CONFIDENTIAL"), "page {} missing watermark", page);
        }
    }

    #[test]
    fn watermark_keeps_page_count() {
        let pdf = create_test_pdf(2);
        let result = add_watermark(&pdf, "DRAFT", 0.5).unwrap();
        let doc = Document::load_mem(&result).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn page_numbers_count_from_one() {
        let pdf = create_test_pdf(3);
        let result = add_page_numbers(&pdf, PageNumberPosition::BottomCenter).unwrap();

        let first = String::from_utf8_lossy(&content_of_page(&result, 1)).into_owned();
        let last = String::from_utf8_lossy(&content_of_page(&result, 3)).into_owned();
        assert!(first.contains("Page 1 of 3"));
        assert!(last.contains("Page 3 of 3"));
    }

    #[test]
    fn position_parses_from_form_values() {
        assert_eq!(
            "bottom-left".parse::<PageNumberPosition>().unwrap(),
            PageNumberPosition::BottomLeft
        );
        assert!("top-center".parse::<PageNumberPosition>().is_err());
    }
}
