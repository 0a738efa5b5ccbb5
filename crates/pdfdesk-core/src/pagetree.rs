//! Shared page-tree plumbing used by the page operations.
//!
//! lopdf exposes pages as a map from 1-based page number to object id; the
//! helpers here rebuild the Kids array of the root Pages node, look up page
//! dimensions through the inheritance chain, and append overlay content
//! streams to a page.

use crate::error::PdfError;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

/// Letter-sized fallback when no MediaBox can be found.
const DEFAULT_PAGE_SIZE: (f64, f64) = (612.0, 792.0);

pub fn load_document(bytes: &[u8]) -> Result<Document, PdfError> {
    Document::load_mem(bytes).map_err(|e| PdfError::Parse(e.to_string()))
}

pub fn save_document(mut doc: Document) -> Result<Vec<u8>, PdfError> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| PdfError::Operation(format!("save failed: {}", e)))?;
    Ok(buffer)
}

/// Page object ids in document order.
pub fn page_ids_in_order(doc: &Document) -> Vec<ObjectId> {
    // get_pages() keys are 1-based page numbers; BTreeMap iteration keeps
    // them in document order.
    doc.get_pages().values().copied().collect()
}

/// Replace the Kids array of the root Pages node with the given references.
///
/// Duplicate references are allowed: a reordered document may show the same
/// page object more than once.
pub fn set_page_kids(doc: &mut Document, page_refs: Vec<ObjectId>) -> Result<(), PdfError> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| PdfError::Operation("no Root reference in trailer".into()))?;

    let pages_id = doc
        .get_dictionary(catalog_id)
        .map_err(|_| PdfError::Operation("catalog is not a dictionary".into()))?
        .get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(|_| PdfError::Operation("no Pages reference in catalog".into()))?;

    let count = page_refs.len() as i64;
    let kids: Vec<Object> = page_refs.into_iter().map(Object::Reference).collect();

    let pages_dict = doc
        .get_object_mut(pages_id)
        .and_then(Object::as_dict_mut)
        .map_err(|_| PdfError::Operation("invalid Pages dictionary".into()))?;

    pages_dict.set("Kids", Object::Array(kids));
    pages_dict.set("Count", Object::Integer(count));
    Ok(())
}

/// Page width and height in points, following Parent inheritance for the
/// MediaBox. Falls back to US Letter when nothing is declared.
pub fn page_size(doc: &Document, page_id: ObjectId) -> (f64, f64) {
    let mut current = Some(page_id);

    // MediaBox is inheritable; walk up a bounded number of Parent links.
    for _ in 0..8 {
        let Some(id) = current else { break };
        let Ok(dict) = doc.get_dictionary(id) else { break };

        if let Ok(Object::Array(rect)) = dict.get(b"MediaBox") {
            if let Some(size) = rect_size(rect) {
                return size;
            }
        }

        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }

    DEFAULT_PAGE_SIZE
}

fn rect_size(rect: &[Object]) -> Option<(f64, f64)> {
    if rect.len() != 4 {
        return None;
    }
    let v: Vec<f64> = rect.iter().filter_map(as_number).collect();
    if v.len() != 4 {
        return None;
    }
    Some(((v[2] - v[0]).abs(), (v[3] - v[1]).abs()))
}

fn as_number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

/// Append a content stream after the page's existing content.
pub fn append_page_content(
    doc: &mut Document,
    page_id: ObjectId,
    content: Vec<u8>,
) -> Result<(), PdfError> {
    let stream_id = doc.add_object(Stream::new(dictionary! {}, content));

    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|_| PdfError::Operation("page is not a dictionary".into()))?;

    let contents = page.get(b"Contents").map(|o| o.clone());
    match contents {
        Ok(Object::Array(mut streams)) => {
            streams.push(Object::Reference(stream_id));
            page.set("Contents", Object::Array(streams));
        }
        Ok(existing @ Object::Reference(_)) => {
            page.set(
                "Contents",
                Object::Array(vec![existing, Object::Reference(stream_id)]),
            );
        }
        _ => page.set("Contents", Object::Reference(stream_id)),
    }
    Ok(())
}

/// Register a Type1 standard font and an optional alpha ExtGState in the
/// page's resources, so overlay content can reference them by name.
pub fn ensure_overlay_resources(
    doc: &mut Document,
    page_id: ObjectId,
    font_key: &str,
    base_font: &str,
    graphics_state: Option<(&str, f64)>,
) -> Result<(), PdfError> {
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
    });

    let gs = graphics_state.map(|(key, alpha)| {
        let gs_id = doc.add_object(dictionary! {
            "Type" => "ExtGState",
            "ca" => alpha as f32,
            "CA" => alpha as f32,
        });
        (key.to_string(), gs_id)
    });

    let mut resources = page_resources(doc, page_id)?;
    set_resource_entry(&mut resources, "Font", font_key, font_id);
    if let Some((key, gs_id)) = gs {
        set_resource_entry(&mut resources, "ExtGState", &key, gs_id);
    }

    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|_| PdfError::Operation("page is not a dictionary".into()))?;
    page.set("Resources", Object::Dictionary(resources));
    Ok(())
}

/// Resolve the page's effective Resources dictionary as an owned copy,
/// following one level of indirection and the Parent chain.
fn page_resources(doc: &Document, page_id: ObjectId) -> Result<Dictionary, PdfError> {
    let mut current = Some(page_id);

    for _ in 0..8 {
        let Some(id) = current else { break };
        let dict = doc
            .get_dictionary(id)
            .map_err(|_| PdfError::Operation("page is not a dictionary".into()))?;

        match dict.get(b"Resources") {
            Ok(Object::Dictionary(resources)) => return Ok(resources.clone()),
            Ok(Object::Reference(res_id)) => {
                return doc
                    .get_dictionary(*res_id)
                    .cloned()
                    .map_err(|_| PdfError::Operation("invalid Resources reference".into()));
            }
            _ => {}
        }

        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }

    Ok(Dictionary::new())
}

fn set_resource_entry(resources: &mut Dictionary, category: &str, key: &str, id: ObjectId) {
    let mut entries = match resources.get(category.as_bytes()) {
        Ok(Object::Dictionary(existing)) => existing.clone(),
        _ => Dictionary::new(),
    };
    entries.set(key, Object::Reference(id));
    resources.set(category, Object::Dictionary(entries));
}
