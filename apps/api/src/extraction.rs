//! Resume PDF → plain text.

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF could not be parsed: {0}")]
    Pdf(String),

    #[error("PDF contains no extractable text")]
    EmptyText,

    #[error("Extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Extracts text from PDF bytes. Whitespace-only output counts as a failure
/// (scanned images, password-protected files).
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let text =
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyText);
    }

    debug!("Extracted {} characters from PDF", text.chars().count());
    Ok(text)
}

/// Runs [`extract_pdf_text`] on the blocking pool.
pub async fn extract_pdf_text_blocking(bytes: Vec<u8>) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || extract_pdf_text(&bytes)).await?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_fail() {
        let err = extract_pdf_text(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, ExtractionError::Pdf(_)));
    }

    #[test]
    fn test_empty_upload_fails() {
        assert!(extract_pdf_text(&[]).is_err());
    }

    #[tokio::test]
    async fn test_blocking_wrapper_propagates_failure() {
        let result = extract_pdf_text_blocking(b"%PDF-broken".to_vec()).await;
        assert!(result.is_err());
    }
}
