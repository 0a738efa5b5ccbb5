//! Page rotation via the /Rotate page attribute.

use crate::error::PdfError;
use crate::pagetree::{load_document, page_ids_in_order, save_document};
use lopdf::Object;
use std::collections::HashSet;

/// Rotate pages clockwise by `rotation` degrees (90, 180, or 270).
///
/// With `filter` set, only the listed 0-based pages rotate; everything else
/// passes through untouched, keeping order and count. Rotation is added to
/// any existing /Rotate value, so rotating a landscape page by 90 behaves
/// like a physical quarter turn rather than an absolute orientation.
pub fn rotate_pages(
    bytes: &[u8],
    rotation: i64,
    filter: Option<&[usize]>,
) -> Result<Vec<u8>, PdfError> {
    if !matches!(rotation, 90 | 180 | 270) {
        return Err(PdfError::InvalidRotation(rotation));
    }

    let mut doc = load_document(bytes)?;
    let page_ids = page_ids_in_order(&doc);

    if let Some(indices) = filter {
        if let Some(&bad) = indices.iter().find(|&&i| i >= page_ids.len()) {
            return Err(PdfError::InvalidPageNumber(format!(
                "page {} does not exist (document has {} pages)",
                bad + 1,
                page_ids.len()
            )));
        }
    }

    let selected: Option<HashSet<usize>> = filter.map(|f| f.iter().copied().collect());

    for (index, &page_id) in page_ids.iter().enumerate() {
        if let Some(ref wanted) = selected {
            if !wanted.contains(&index) {
                continue;
            }
        }

        let page = doc
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(|_| PdfError::Operation("page is not a dictionary".into()))?;

        let current = page
            .get(b"Rotate")
            .and_then(Object::as_i64)
            .unwrap_or(0);
        page.set("Rotate", Object::Integer((current + rotation) % 360));
    }

    save_document(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::create_test_pdf;
    use lopdf::Document;

    fn rotations(bytes: &[u8]) -> Vec<i64> {
        let doc = Document::load_mem(bytes).unwrap();
        page_ids_in_order(&doc)
            .iter()
            .map(|&id| {
                doc.get_dictionary(id)
                    .unwrap()
                    .get(b"Rotate")
                    .and_then(Object::as_i64)
                    .unwrap_or(0)
            })
            .collect()
    }

    #[test]
    fn rotates_all_pages_without_filter() {
        let pdf = create_test_pdf(4);
        let result = rotate_pages(&pdf, 90, None).unwrap();
        assert_eq!(rotations(&result), vec![90, 90, 90, 90]);
    }

    #[test]
    fn filter_leaves_other_pages_untouched() {
        let pdf = create_test_pdf(5);
        // Pages 1-2 of 5 rotated; 3-5 unchanged; count and order intact.
        let result = rotate_pages(&pdf, 180, Some(&[0, 1])).unwrap();
        assert_eq!(rotations(&result), vec![180, 180, 0, 0, 0]);
    }

    #[test]
    fn rotation_accumulates() {
        let pdf = create_test_pdf(1);
        let once = rotate_pages(&pdf, 270, None).unwrap();
        let twice = rotate_pages(&once, 180, None).unwrap();
        assert_eq!(rotations(&twice), vec![(270 + 180) % 360]);
    }

    #[test]
    fn rejects_invalid_angle() {
        let pdf = create_test_pdf(2);
        for angle in [0, 45, 360, -90] {
            let err = rotate_pages(&pdf, angle, None).unwrap_err();
            assert!(matches!(err, PdfError::InvalidRotation(_)));
        }
    }

    #[test]
    fn rejects_out_of_bounds_filter() {
        let pdf = create_test_pdf(2);
        assert!(rotate_pages(&pdf, 90, Some(&[2])).is_err());
    }
}
