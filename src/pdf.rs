//! PDF text extraction.
//!
//! Extraction runs fully in memory via `pdf-extract`; there is no staging
//! file to clean up. Pages come back concatenated in stored order with no
//! extra boundary markers, which is what the segmenter expects.

use std::error::Error;
use std::fmt;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Extracts the plain text of every page, concatenated in page order.
///
/// A structurally valid document with no pages (or no text content) yields
/// an empty string, not an error.
pub fn extract_text(bytes: &[u8]) -> Result<String, PdfError> {
    if !looks_like_pdf(bytes) {
        return Err(PdfError::NotAPdf);
    }
    pdf_extract::extract_text_from_mem(bytes).map_err(PdfError::Extract)
}

/// Returns true when the byte head carries the `%PDF-` magic.
pub fn looks_like_pdf(head: &[u8]) -> bool {
    head.starts_with(PDF_MAGIC)
}

/// Errors surfaced while parsing a PDF byte stream.
#[derive(Debug)]
pub enum PdfError {
    /// The payload does not start with the PDF magic bytes.
    NotAPdf,
    /// The document structure could not be parsed.
    Extract(pdf_extract::OutputError),
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAPdf => write!(f, "payload is not a PDF document"),
            Self::Extract(err) => write!(f, "pdf extraction error: {err}"),
        }
    }
}

impl Error for PdfError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotAPdf => None,
            Self::Extract(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Well-formed document whose page tree is empty. Offsets are computed
    /// while assembling so the xref table stays valid.
    fn zero_page_pdf() -> Vec<u8> {
        let mut pdf = String::from("%PDF-1.4\n");
        let catalog_offset = pdf.len();
        pdf.push_str("1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");
        let pages_offset = pdf.len();
        pdf.push_str("2 0 obj\n<< /Type /Pages /Kids [] /Count 0 >>\nendobj\n");
        let xref_offset = pdf.len();
        pdf.push_str("xref\n0 3\n");
        pdf.push_str("0000000000 65535 f \n");
        pdf.push_str(&format!("{catalog_offset:010} 00000 n \n"));
        pdf.push_str(&format!("{pages_offset:010} 00000 n \n"));
        pdf.push_str("trailer\n<< /Size 3 /Root 1 0 R >>\nstartxref\n");
        pdf.push_str(&format!("{xref_offset}\n%%EOF"));
        pdf.into_bytes()
    }

    #[test]
    fn zero_page_document_yields_empty_text() {
        let text = extract_text(&zero_page_pdf()).expect("zero-page pdf parses");
        assert!(text.trim().is_empty());
    }

    #[test]
    fn magic_detection() {
        assert!(looks_like_pdf(b"%PDF-1.7 rest of file"));
        assert!(!looks_like_pdf(b"<html><body>error page</body></html>"));
        assert!(!looks_like_pdf(b""));
    }

    #[test]
    fn non_pdf_payload_is_rejected_before_parsing() {
        let err = extract_text(b"<html>not a pdf</html>").unwrap_err();
        assert!(matches!(err, PdfError::NotAPdf));
    }

    #[test]
    fn truncated_pdf_fails_with_extract_error() {
        // Valid magic, garbage body: must come back as an error, not a panic.
        let err = extract_text(b"%PDF-1.4 garbage without xref").unwrap_err();
        assert!(matches!(err, PdfError::Extract(_)));
    }
}
