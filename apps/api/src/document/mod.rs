//! Document text extraction — raw upload bytes to plain text plus any
//! embedded hyperlink URIs.
//!
//! Pure functions of their inputs: no I/O, no model calls. Format comes from
//! the declared filename's extension, falling back to magic-byte sniffing
//! when the extension is missing or unrecognized.

use thiserror::Error;

mod pdf;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("document contains no extractable text")]
    EmptyDocument,

    #[error("failed to read document: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
}

/// Extracted plain text plus hyperlink URIs in document order.
/// Links recovered here are NOT merged into the model-extracted profile —
/// reconciling them against model-emitted link labels is a separate,
/// not-yet-built step. They are surfaced to the caller untouched.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub text: String,
    pub links: Vec<String>,
}

/// Determines the document format from the declared filename, sniffing the
/// leading bytes when the extension doesn't settle it.
pub fn detect_format(declared_name: &str, bytes: &[u8]) -> Option<DocumentFormat> {
    let extension = declared_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("pdf") => return Some(DocumentFormat::Pdf),
        Some("docx") => return Some(DocumentFormat::Docx),
        Some("txt") => return Some(DocumentFormat::PlainText),
        _ => {}
    }

    if bytes.starts_with(b"%PDF") {
        Some(DocumentFormat::Pdf)
    } else if bytes.starts_with(b"PK\x03\x04") {
        Some(DocumentFormat::Docx)
    } else if std::str::from_utf8(bytes).is_ok() {
        Some(DocumentFormat::PlainText)
    } else {
        None
    }
}

/// Extracts plain text and hyperlink URIs from an uploaded document.
///
/// Fails fast — without touching the model — on unsupported formats and on
/// documents with zero extractable characters.
pub fn extract(bytes: &[u8], declared_name: &str) -> Result<ExtractedDocument, DocumentError> {
    let format = detect_format(declared_name, bytes)
        .ok_or_else(|| DocumentError::UnsupportedFormat(declared_name.to_string()))?;

    let extracted = match format {
        DocumentFormat::Pdf => pdf::extract_pdf(bytes)?,
        // TODO: DOCX extraction needs a zip reader for word/document.xml.
        DocumentFormat::Docx => {
            return Err(DocumentError::UnsupportedFormat(format!(
                "{declared_name}: DOCX extraction is not supported yet; upload PDF or plain text"
            )))
        }
        DocumentFormat::PlainText => ExtractedDocument {
            text: String::from_utf8_lossy(bytes).into_owned(),
            links: Vec::new(),
        },
    };

    if extracted.text.trim().is_empty() {
        return Err(DocumentError::EmptyDocument);
    }

    Ok(extracted)
}
