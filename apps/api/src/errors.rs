use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::state::AppState;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Text extraction error: {0}")]
    Extraction(String),

    #[error("Upstream API rejected the credentials: {0}")]
    Unauthorized(String),

    #[error("Upstream API rate limit reached: {0}")]
    RateLimited(String),

    #[error("Upstream API error: {0}")]
    Upstream(String),

    #[error("Invalid upstream response: {0}")]
    InvalidUpstreamResponse(String),

    #[error("Malformed analysis response: {0}")]
    MalformedResponse(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Unauthorized(msg) => AppError::Unauthorized(msg),
            LlmError::RateLimited { .. } => AppError::RateLimited(err.to_string()),
            LlmError::EmptyContent | LlmError::Parse(_) => {
                AppError::InvalidUpstreamResponse(err.to_string())
            }
            LlmError::Http(_) | LlmError::Api { .. } => AppError::Upstream(err.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Underlying cause of an error response, attached as a response extension.
/// Only surfaced to clients by [`expose_error_details`] in development mode.
#[derive(Debug, Clone)]
pub struct ErrorDetails {
    pub message: String,
    pub details: String,
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Extraction(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized(_) => (
                StatusCode::UNAUTHORIZED,
                "Authentication with the analysis API failed".to_string(),
            ),
            AppError::RateLimited(_) => (
                StatusCode::TOO_MANY_REQUESTS,
                "The analysis API is rate limiting requests, try again later".to_string(),
            ),
            AppError::Upstream(_) | AppError::InvalidUpstreamResponse(_) => (
                StatusCode::BAD_GATEWAY,
                "The analysis API could not complete the request".to_string(),
            ),
            AppError::MalformedResponse(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "The analysis response had an invalid format".to_string(),
            ),
            AppError::Render(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "The document could not be generated".to_string(),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal server error occurred".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!("{self:?}");
        } else {
            tracing::warn!("{self}");
        }

        let details = ErrorDetails {
            message: message.clone(),
            details: self.to_string(),
        };

        let mut response = (status, Json(json!({ "error": message }))).into_response();
        response.extensions_mut().insert(details);
        response
    }
}

/// Middleware that re-renders error bodies with their `details` field when
/// the service runs in development mode.
pub async fn expose_error_details(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    if !state.config.expose_error_details {
        return response;
    }

    match response.extensions().get::<ErrorDetails>().cloned() {
        Some(ErrorDetails { message, details }) => {
            let status = response.status();
            (
                status,
                Json(json!({ "error": message, "details": details })),
            )
                .into_response()
        }
        None => response,
    }
}
