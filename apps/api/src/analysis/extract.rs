//! Text Extractor: turns an uploaded PDF into plain text via `pdf-extract`.

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

/// Extracts plain text from an uploaded document.
/// `AppState` carries one as `Arc<dyn TextExtractor>`.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Returns the document text. Unreadable documents and documents without
    /// any text are `AppError::Extraction`.
    async fn extract(&self, data: Bytes) -> Result<String, AppError>;
}

/// `pdf-extract` backed extractor. Parsing is CPU-bound and runs on the blocking pool.
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, data: Bytes) -> Result<String, AppError> {
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
            .await
            .map_err(|e| {
                // pdf-extract panics on some malformed inputs
                if e.is_panic() {
                    AppError::Extraction("The PDF file could not be parsed".to_string())
                } else {
                    AppError::Internal(e.into())
                }
            })?
            .map_err(|e| AppError::Extraction(format!("Could not read the PDF file: {e}")))?;

        debug!("PDF processed, extracted {} characters", text.len());
        ensure_text(text)
    }
}

/// Rejects documents whose extracted text is blank (e.g. scanned images).
fn ensure_text(text: String) -> Result<String, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Extraction(
            "No text could be extracted from the PDF".to_string(),
        ));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_text_rejects_blank() {
        assert!(matches!(
            ensure_text(" \n\t ".to_string()),
            Err(AppError::Extraction(_))
        ));
    }

    #[test]
    fn test_ensure_text_keeps_text_verbatim() {
        let text = "  John Doe\nSoftware Engineer  ".to_string();
        assert_eq!(ensure_text(text.clone()).unwrap(), text);
    }

    #[tokio::test]
    async fn test_garbage_bytes_are_an_extraction_error() {
        let result = PdfTextExtractor
            .extract(Bytes::from_static(b"definitely not a pdf"))
            .await;
        assert!(matches!(result, Err(AppError::Extraction(_))));
    }
}
