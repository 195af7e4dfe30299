//! PDF text extraction.

use std::path::Path;
use thiserror::Error;

/// Minimum stripped length below which a PDF is considered unreadable
/// (typically a scanned document without an OCR layer).
const MIN_READABLE_CHARS: usize = 10;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("unreadable or empty PDF: no extractable text (scanned without OCR?)")]
    Unreadable,

    #[error("failed to extract PDF text: {0}")]
    Extract(String),
}

/// Extracts the concatenated page text of a local PDF file.
pub fn extract_pdf_file(path: &Path) -> Result<String, PdfError> {
    let text = pdf_extract::extract_text(path).map_err(|e| PdfError::Extract(e.to_string()))?;
    ensure_readable(text)
}

/// Extracts text from an in-memory PDF document.
pub fn extract_pdf_bytes(data: &[u8]) -> Result<String, PdfError> {
    let text =
        pdf_extract::extract_text_from_mem(data).map_err(|e| PdfError::Extract(e.to_string()))?;
    ensure_readable(text)
}

fn ensure_readable(text: String) -> Result<String, PdfError> {
    if text.trim().chars().count() < MIN_READABLE_CHARS {
        return Err(PdfError::Unreadable);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_fail_with_extract_error() {
        let err = extract_pdf_bytes(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, PdfError::Extract(_)));
    }

    #[test]
    fn test_short_text_is_unreadable() {
        assert!(matches!(
            ensure_readable("   \n ab \n".to_string()),
            Err(PdfError::Unreadable)
        ));
    }

    #[test]
    fn test_readable_text_passes_through() {
        let text = "conteúdo extraído de um artigo".to_string();
        assert_eq!(ensure_readable(text.clone()).unwrap(), text);
    }
}
