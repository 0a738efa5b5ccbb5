//! Page extraction.
//!
//! Builds the output by deleting every page *not* selected, then pruning
//! orphaned objects so shared resources of removed pages don't leak into the
//! result.

use crate::error::PdfError;
use crate::pagetree::{load_document, save_document};
use std::collections::HashSet;

/// Extract the given 0-based page indices into a new document.
///
/// Indices are expected deduplicated and ascending (the range parser output);
/// the extracted pages keep their original relative order.
pub fn extract_pages(bytes: &[u8], indices: &[usize]) -> Result<Vec<u8>, PdfError> {
    if indices.is_empty() {
        return Err(PdfError::InvalidRange("no pages selected".into()));
    }

    let mut doc = load_document(bytes)?;
    let page_count = doc.get_pages().len();

    if let Some(&bad) = indices.iter().find(|&&i| i >= page_count) {
        return Err(PdfError::InvalidPageNumber(format!(
            "page {} does not exist (document has {} pages)",
            bad + 1,
            page_count
        )));
    }

    let keep: HashSet<u32> = indices.iter().map(|&i| i as u32 + 1).collect();
    let mut to_delete: Vec<u32> = (1..=page_count as u32)
        .filter(|p| !keep.contains(p))
        .collect();

    // Delete back to front so earlier page numbers stay valid.
    to_delete.reverse();
    for page_num in to_delete {
        doc.delete_pages(&[page_num]);
    }

    doc.prune_objects();
    doc.compress();
    save_document(doc)
}
