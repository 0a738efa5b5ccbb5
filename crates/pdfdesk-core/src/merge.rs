//! PDF merging.
//!
//! The first document becomes the destination; every other document's
//! objects are imported with their ids shifted past the destination's
//! current maximum, then the root page tree is rebuilt with the combined
//! page list. Shifting ids wholesale avoids walking shared-resource graphs
//! per page.

use crate::error::PdfError;
use crate::pagetree::{page_ids_in_order, save_document, set_page_kids};
use lopdf::{Document, Object, ObjectId};

/// Merge two or more PDFs into one, pages in input order.
pub fn merge_documents(documents: Vec<Vec<u8>>) -> Result<Vec<u8>, PdfError> {
    if documents.len() < 2 {
        return Err(PdfError::Operation(
            "at least 2 documents are required for merging".into(),
        ));
    }

    let mut sources = Vec::with_capacity(documents.len());
    for (i, bytes) in documents.iter().enumerate() {
        let doc = Document::load_mem(bytes)
            .map_err(|e| PdfError::Parse(format!("document {}: {}", i + 1, e)))?;
        sources.push(doc);
    }

    let mut dest = sources.remove(0);
    let mut combined_pages = page_ids_in_order(&dest);
    let mut next_offset = dest.max_id;

    for source in sources {
        let offset = next_offset;
        let source_pages = page_ids_in_order(&source);
        next_offset = next_offset.max(source.max_id + offset);

        for (old_id, object) in source.objects {
            let new_id = shift_id(old_id, offset);
            dest.objects.insert(new_id, shift_references(object, offset));
        }

        combined_pages.extend(source_pages.into_iter().map(|id| shift_id(id, offset)));
    }

    set_page_kids(&mut dest, combined_pages)?;
    dest.max_id = next_offset;
    dest.compress();
    save_document(dest)
}

fn shift_id(id: ObjectId, offset: u32) -> ObjectId {
    (id.0 + offset, id.1)
}

/// Recursively shift every indirect reference inside an object.
fn shift_references(obj: Object, offset: u32) -> Object {
    match obj {
        Object::Reference(id) => Object::Reference(shift_id(id, offset)),
        Object::Array(items) => Object::Array(
            items
                .into_iter()
                .map(|o| shift_references(o, offset))
                .collect(),
        ),
        Object::Dictionary(mut dict) => {
            for (_, value) in dict.iter_mut() {
                *value = shift_references(value.clone(), offset);
            }
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            for (_, value) in stream.dict.iter_mut() {
                *value = shift_references(value.clone(), offset);
            }
            Object::Stream(stream)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::create_test_pdf;
    use lopdf::Document;

    #[test]
    fn merging_fewer_than_two_fails() {
        assert!(merge_documents(vec![]).is_err());
        assert!(merge_documents(vec![create_test_pdf(2)]).is_err());
    }

    #[test]
    fn merges_two_documents() {
        let a = create_test_pdf(2);
        let b = create_test_pdf(3);

        let merged = merge_documents(vec![a, b]).unwrap();
        let doc = Document::load_mem(&merged).unwrap();
        assert_eq!(doc.get_pages().len(), 5);
    }

    #[test]
    fn merges_many_documents_in_order() {
        let docs: Vec<Vec<u8>> = [2, 1, 4].iter().map(|&n| create_test_pdf(n)).collect();

        let merged = merge_documents(docs).unwrap();
        let doc = Document::load_mem(&merged).unwrap();
        assert_eq!(doc.get_pages().len(), 7);
    }

    #[test]
    fn merged_output_reloads_cleanly() {
        let merged =
            merge_documents(vec![create_test_pdf(1), create_test_pdf(1)]).unwrap();
        assert!(Document::load_mem(&merged).is_ok());
    }

    #[test]
    fn invalid_member_names_its_position() {
        let err =
            merge_documents(vec![create_test_pdf(1), b"broken".to_vec()]).unwrap_err();
        assert!(err.to_string().contains("document 2"));
    }
}
