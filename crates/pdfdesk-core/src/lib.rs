//! Page-level PDF operations built on lopdf.
//!
//! The interesting logic lives in [`ranges`]: turning human page-range specs
//! into validated 0-based index sets, and validating explicit page orders.
//! The operation modules consume those indices and never re-interpret them,
//! so an off-by-one can only exist in one place.

pub mod compress;
pub mod error;
pub mod merge;
pub mod overlay;
mod pagetree;
pub mod ranges;
pub mod reorder;
pub mod rotate;
pub mod split;

pub use compress::{compress_document, CompressionQuality};
pub use error::PdfError;
pub use merge::merge_documents;
pub use overlay::{add_page_numbers, add_watermark, PageNumberPosition};
pub use ranges::{parse_page_ranges, validate_page_order};
pub use reorder::reorder_pages;
pub use rotate::rotate_pages;
pub use split::extract_pages;

/// Parse PDF bytes and return the page count.
pub fn page_count(bytes: &[u8]) -> Result<usize, PdfError> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| PdfError::Parse(e.to_string()))?;
    Ok(doc.get_pages().len())
}

#[cfg(test)]
pub(crate) mod testutil;
