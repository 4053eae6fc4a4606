// src/utils/pdf.rs

use crate::error::AppError;

/// Extracts the text of every page of a PDF, in document order.
///
/// Parsing is CPU-bound, so it runs on the blocking pool. Malformed or
/// encrypted documents surface as a `BadRequest` for the uploading request.
pub async fn extract_text(pdf_bytes: Vec<u8>) -> Result<String, AppError> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf_bytes))
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .map_err(|e| AppError::BadRequest(format!("Could not read PDF: {}", e)))?;

    Ok(text)
}
