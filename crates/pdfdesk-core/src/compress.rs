//! Stream compression and object cleanup.

use crate::error::PdfError;
use crate::pagetree::{load_document, save_document};
use std::str::FromStr;

/// How aggressively to shrink the document. "Low" quality trades structure
/// for size; "high" keeps the document as close to the input as possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionQuality {
    Low,
    Medium,
    High,
}

impl FromStr for CompressionQuality {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(PdfError::Operation(format!(
                "quality must be 'low', 'medium', or 'high' (got {:?})",
                other
            ))),
        }
    }
}

/// Recompress a document's streams, optionally pruning unreachable objects.
pub fn compress_document(bytes: &[u8], quality: CompressionQuality) -> Result<Vec<u8>, PdfError> {
    let mut doc = load_document(bytes)?;

    match quality {
        CompressionQuality::Low => {
            doc.prune_objects();
            doc.delete_zero_length_streams();
            doc.compress();
        }
        CompressionQuality::Medium => {
            doc.prune_objects();
            doc.compress();
        }
        CompressionQuality::High => {
            doc.compress();
        }
    }

    save_document(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::create_test_pdf;
    use lopdf::Document;

    #[test]
    fn quality_parses_from_form_values() {
        assert_eq!(
            "low".parse::<CompressionQuality>().unwrap(),
            CompressionQuality::Low
        );
        assert_eq!(
            "medium".parse::<CompressionQuality>().unwrap(),
            CompressionQuality::Medium
        );
        assert!("ultra".parse::<CompressionQuality>().is_err());
    }

    #[test]
    fn compressed_output_keeps_all_pages() {
        let pdf = create_test_pdf(4);
        for quality in [
            CompressionQuality::Low,
            CompressionQuality::Medium,
            CompressionQuality::High,
        ] {
            let result = compress_document(&pdf, quality).unwrap();
            let doc = Document::load_mem(&result).unwrap();
            assert_eq!(doc.get_pages().len(), 4);
        }
    }
}
