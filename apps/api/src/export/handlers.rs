//! Axum route handlers for the Export API.

use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use tracing::info;

use crate::errors::AppError;
use crate::export::strings::Strings;
use crate::export::{pdf, sanitize_file_name, word, ExportFormat};
use crate::models::export::ExportRequest;

/// Renders on the blocking pool and wraps the bytes as a download.
async fn export(request: ExportRequest, format: ExportFormat) -> Result<Response, AppError> {
    if request.analysis.trim().is_empty() {
        return Err(AppError::Validation(
            "analysis cannot be empty".to_string(),
        ));
    }

    let file_name = sanitize_file_name(request.file_name.as_deref(), format);
    let bytes = tokio::task::spawn_blocking(move || {
        let strings = Strings::for_language(request.language());
        match format {
            ExportFormat::Pdf => pdf::render_pdf(&request, strings, Local::now().date_naive()),
            ExportFormat::Word => word::render_word(&request, strings),
        }
    })
    .await
    .map_err(|e| AppError::Render(format!("Export task failed: {e}")))??;

    info!("Exported {file_name} ({} bytes)", bytes.len());

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
        .map_err(|e| AppError::Render(format!("Invalid file name header: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(format.content_type())),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// POST /export-pdf
pub async fn handle_export_pdf(
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    export(request, ExportFormat::Pdf).await
}

/// POST /export-word
pub async fn handle_export_word(
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    export(request, ExportFormat::Word).await
}
