//! PDF extraction: page text via `pdf-extract`, hyperlink annotations via a
//! manual `lopdf` walk (pdf-extract exposes no annotation data).

use lopdf::{Dictionary, Document, Object};

use super::{DocumentError, ExtractedDocument};

pub fn extract_pdf(bytes: &[u8]) -> Result<ExtractedDocument, DocumentError> {
    // Encrypted, scanned-image-only, and corrupted PDFs all surface here.
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| DocumentError::Malformed(e.to_string()))?;

    // Annotation failures never fail the upload: a CV with an unreadable
    // link table still has usable text.
    let links = match Document::load_mem(bytes) {
        Ok(doc) => collect_link_uris(&doc),
        Err(e) => {
            tracing::warn!("PDF link annotation pass failed, continuing without links: {e}");
            Vec::new()
        }
    };

    Ok(ExtractedDocument { text, links })
}

/// Walks every page in document order and collects the `/URI` of each
/// `/Link` annotation. Annotations that are not links, or whose action has
/// no resolvable URI, are skipped without error.
fn collect_link_uris(doc: &Document) -> Vec<String> {
    let mut uris = Vec::new();

    for (_page_number, page_id) in doc.get_pages() {
        let Ok(page) = doc.get_dictionary(page_id) else {
            continue;
        };
        let Some(annots) = page
            .get(b"Annots")
            .ok()
            .and_then(|obj| resolve(doc, obj))
            .and_then(|obj| obj.as_array().ok())
        else {
            continue;
        };

        for annot in annots {
            let Some(dict) = resolve(doc, annot).and_then(object_as_dict) else {
                continue;
            };
            if !has_name(dict, b"Subtype", b"Link") {
                continue;
            }
            let Some(action) = dict
                .get(b"A")
                .ok()
                .and_then(|obj| resolve(doc, obj))
                .and_then(object_as_dict)
            else {
                continue;
            };
            if let Some(uri) = action
                .get(b"URI")
                .ok()
                .and_then(|obj| resolve(doc, obj))
                .and_then(object_as_string)
            {
                uris.push(uri);
            }
        }
    }

    uris
}

/// Follows reference objects to their target; returns the object itself
/// when it is not a reference. Broken references resolve to `None`.
fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn object_as_dict(object: &Object) -> Option<&Dictionary> {
    match object {
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn object_as_string(object: &Object) -> Option<String> {
    match object {
        Object::String(bytes, _) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

fn has_name(dict: &Dictionary, key: &[u8], expected: &[u8]) -> bool {
    matches!(dict.get(key), Ok(Object::Name(name)) if name.as_slice() == expected)
}
