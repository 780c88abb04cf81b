//! Axum route handlers for the Analysis API.

use axum::{
    extract::{
        multipart::{Multipart, MultipartError, MultipartRejection},
        rejection::JsonRejection,
        State,
    },
    Json,
};
use bytes::{Bytes, BytesMut};
use tracing::info;

use crate::analysis::language::Language;
use crate::analysis::service::{analyze_cv, analyze_job};
use crate::errors::AppError;
use crate::models::analysis::{
    AnalysisRequest, AnalyzeJobRequest, AnalyzeJobResponse, AnalyzeResponse,
};
use crate::state::AppState;

/// Largest accepted CV upload.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
const PDF_MIME: &str = "application/pdf";

// ────────────────────────────────────────────────────────────────────────────
// Upload form
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct UploadedFile {
    file_name: Option<String>,
    data: Bytes,
}

#[derive(Debug, Default)]
struct UploadForm {
    file: Option<UploadedFile>,
    ats_systems: Option<String>,
    job_description: Option<String>,
    language: Option<String>,
}

fn multipart_error(err: MultipartError) -> AppError {
    AppError::Validation(format!("Invalid multipart form: {err}"))
}

/// Reads the upload form. The file's MIME type and size are checked while
/// streaming, so a wrong or oversized file is rejected before it is buffered.
async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                if content_type != PDF_MIME {
                    return Err(AppError::Validation(format!(
                        "Only PDF files are accepted (received '{content_type}')"
                    )));
                }

                let file_name = field.file_name().map(str::to_string);
                let mut data = BytesMut::new();
                while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
                    if data.len() + chunk.len() > MAX_UPLOAD_BYTES {
                        return Err(AppError::Validation(
                            "The file exceeds the maximum allowed size of 5MB".to_string(),
                        ));
                    }
                    data.extend_from_slice(&chunk);
                }

                form.file = Some(UploadedFile {
                    file_name,
                    data: data.freeze(),
                });
            }
            "atsSystems" => form.ats_systems = Some(field.text().await.map_err(multipart_error)?),
            "jobDescription" => {
                form.job_description = Some(field.text().await.map_err(multipart_error)?)
            }
            "language" => form.language = Some(field.text().await.map_err(multipart_error)?),
            _ => {}
        }
    }

    Ok(form)
}

/// Parses the `atsSystems` form field: a JSON array of names, at least one.
/// A missing field counts as an empty selection.
fn parse_ats_systems(raw: Option<&str>) -> Result<Vec<String>, AppError> {
    let names: Vec<String> = match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => serde_json::from_str(raw).map_err(|_| {
            AppError::Validation("atsSystems must be a JSON array of ATS names".to_string())
        })?,
        None => Vec::new(),
    };

    let names: Vec<String> = names
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();

    if names.is_empty() {
        return Err(AppError::Validation(
            "Select at least one ATS system".to_string(),
        ));
    }
    Ok(names)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /analyze
///
/// Multipart upload: `file` (PDF), `atsSystems` (JSON array), optional
/// `jobDescription` and `language`. Everything is validated before the PDF is
/// parsed or the LLM is called.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let form = read_upload_form(multipart?).await?;

    let file = form
        .file
        .ok_or_else(|| AppError::Validation("No file was uploaded".to_string()))?;
    let ats_systems = parse_ats_systems(form.ats_systems.as_deref())?;
    let language = form
        .language
        .as_deref()
        .map(Language::from_code)
        .unwrap_or_default();

    info!(
        "CV upload received: name={:?}, size={} bytes, ats={:?}",
        file.file_name,
        file.data.len(),
        ats_systems
    );

    let cv_text = state.extractor.extract(file.data).await?;

    let request = AnalysisRequest {
        cv_text,
        ats_systems,
        job_description: form.job_description.filter(|jd| !jd.trim().is_empty()),
        language,
    };

    let analysis = analyze_cv(state.llm.as_ref(), &request).await?;
    Ok(Json(AnalyzeResponse { analysis }))
}

/// POST /analyze-job
///
/// Extracts ATS keywords and skills from a raw job description.
pub async fn handle_analyze_job(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeJobRequest>, JsonRejection>,
) -> Result<Json<AnalyzeJobResponse>, AppError> {
    let Json(request) = payload?;
    if request.description.trim().is_empty() {
        return Err(AppError::Validation(
            "description cannot be empty".to_string(),
        ));
    }

    let insights = analyze_job(state.llm.as_ref(), request.description.trim()).await?;
    Ok(Json(AnalyzeJobResponse { insights }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ats_systems_valid() {
        let names = parse_ats_systems(Some(r#"["Workday", " Greenhouse "]"#)).unwrap();
        assert_eq!(names, vec!["Workday", "Greenhouse"]);
    }

    #[test]
    fn test_parse_ats_systems_missing_or_empty() {
        for raw in [None, Some(""), Some("[]"), Some(r#"["  "]"#)] {
            let err = parse_ats_systems(raw).unwrap_err();
            match err {
                AppError::Validation(msg) => assert_eq!(msg, "Select at least one ATS system"),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_ats_systems_not_json_array() {
        for raw in ["Workday", r#"{"ats": "Workday"}"#, "[1, 2]"] {
            assert!(matches!(
                parse_ats_systems(Some(raw)),
                Err(AppError::Validation(_))
            ));
        }
    }
}
