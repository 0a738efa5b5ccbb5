//! Page reordering.
//!
//! The output page sequence is exactly the caller's list. Duplicates are
//! allowed: repeating an index shows the same page object twice in the Kids
//! array, which viewers render as two identical pages.

use crate::error::PdfError;
use crate::pagetree::{load_document, page_ids_in_order, save_document, set_page_kids};

/// Rebuild the document's page tree in the given 0-based index order.
pub fn reorder_pages(bytes: &[u8], order: &[usize]) -> Result<Vec<u8>, PdfError> {
    if order.is_empty() {
        return Err(PdfError::InvalidPageNumber("empty page order".into()));
    }

    let mut doc = load_document(bytes)?;
    let page_ids = page_ids_in_order(&doc);

    if let Some(&bad) = order.iter().find(|&&i| i >= page_ids.len()) {
        return Err(PdfError::InvalidPageNumber(format!(
            "page {} does not exist (document has {} pages)",
            bad + 1,
            page_ids.len()
        )));
    }

    let new_refs = order.iter().map(|&i| page_ids[i]).collect();
    set_page_kids(&mut doc, new_refs)?;

    doc.compress();
    save_document(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::create_test_pdf;
    use lopdf::Document;

    #[test]
    fn reverses_page_order() {
        let pdf = create_test_pdf(3);
        let original = Document::load_mem(&pdf).unwrap();
        let original_ids = page_ids_in_order(&original);

        let result = reorder_pages(&pdf, &[2, 1, 0]).unwrap();
        let doc = Document::load_mem(&result).unwrap();
        let reordered_ids = page_ids_in_order(&doc);

        assert_eq!(reordered_ids.len(), 3);
        assert_eq!(reordered_ids[0], original_ids[2]);
        assert_eq!(reordered_ids[2], original_ids[0]);
    }

    #[test]
    fn duplicates_are_preserved() {
        // [3,1,2,2] as 0-based [2,0,1,1]: a 3-page input becomes 4 pages.
        let pdf = create_test_pdf(3);
        let result = reorder_pages(&pdf, &[2, 0, 1, 1]).unwrap();
        let doc = Document::load_mem(&result).unwrap();

        let ids = page_ids_in_order(&doc);
        assert_eq!(ids.len(), 4);
        assert_eq!(ids[2], ids[3]);
    }

    #[test]
    fn out_of_bounds_index_fails() {
        let pdf = create_test_pdf(3);
        let err = reorder_pages(&pdf, &[0, 3]).unwrap_err();
        assert!(matches!(err, PdfError::InvalidPageNumber(_)));
    }

    #[test]
    fn empty_order_fails() {
        let pdf = create_test_pdf(3);
        assert!(reorder_pages(&pdf, &[]).is_err());
    }
}
