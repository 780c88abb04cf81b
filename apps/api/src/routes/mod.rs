pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers::{handle_analyze, handle_analyze_job};
use crate::errors::expose_error_details;
use crate::export::handlers::{handle_export_pdf, handle_export_word};
use crate::state::AppState;

/// Request body ceiling. Kept above the 5 MB upload limit so oversized files
/// reach the handler's own check and get a descriptive 400.
const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/analyze", post(handle_analyze))
        .route("/api/analyze", post(handle_analyze))
        .route("/api/analyze-cv", post(handle_analyze))
        .route("/analyze-job", post(handle_analyze_job))
        .route("/api/analyze-job", post(handle_analyze_job))
        // Export API
        .route("/export-pdf", post(handle_export_pdf))
        .route("/api/export-pdf", post(handle_export_pdf))
        .route("/export-word", post(handle_export_word))
        .route("/api/export-word", post(handle_export_word))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            expose_error_details,
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use bytes::Bytes;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::extract::TextExtractor;
    use crate::analysis::service::test_support::FakeLlm;
    use crate::config::Config;
    use crate::errors::AppError;
    use crate::llm_client::LlmError;

    const BOUNDARY: &str = "cv-analyzer-test-boundary";
    const JOHN_DOE_REPLY: &str = "<initial_score>40</initial_score>\
        <analysis_report>Needs more keywords</analysis_report>\
        <projected_score>70</projected_score>";

    /// Returns a fixed text for any upload and counts invocations.
    struct FixedTextExtractor {
        text: &'static str,
        calls: AtomicUsize,
    }

    impl FixedTextExtractor {
        fn new(text: &'static str) -> Self {
            FixedTextExtractor {
                text,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextExtractor for FixedTextExtractor {
        async fn extract(&self, _data: Bytes) -> Result<String, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.text.to_string())
        }
    }

    struct Harness {
        router: Router,
        llm: Arc<FakeLlm>,
        extractor: Arc<FixedTextExtractor>,
    }

    fn harness_with(llm: FakeLlm, development: bool) -> Harness {
        let llm = Arc::new(llm);
        let extractor = Arc::new(FixedTextExtractor::new("John Doe, Software Engineer"));
        let state = AppState {
            llm: llm.clone(),
            extractor: extractor.clone(),
            config: Config {
                anthropic_api_key: "sk-ant-test".to_string(),
                anthropic_api_url: "http://localhost".to_string(),
                anthropic_model: "claude-3-haiku-20240307".to_string(),
                port: 3002,
                rust_log: "info".to_string(),
                expose_error_details: development,
            },
        };
        Harness {
            router: build_router(state),
            llm,
            extractor,
        }
    }

    fn harness(reply: &str) -> Harness {
        harness_with(FakeLlm::replying(reply), false)
    }

    enum Part<'a> {
        File {
            content_type: &'a str,
            data: Vec<u8>,
        },
        Text {
            name: &'a str,
            value: &'a str,
        },
    }

    fn multipart_body(parts: &[Part]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::File { content_type, data } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"file\"; filename=\"cv.pdf\"\r\n\
                             Content-Type: {content_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(data);
                }
                Part::Text { name, value } => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                            .as_bytes(),
                    );
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn pdf_part(size: usize) -> Part<'static> {
        Part::File {
            content_type: "application/pdf",
            data: vec![b'x'; size],
        }
    }

    fn analyze_request(uri: &str, parts: &[Part]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Bytes {
        to_bytes(response.into_body(), usize::MAX).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    // ── /health ─────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_health() {
        let h = harness(JOHN_DOE_REPLY);
        let response = h
            .router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "cv-analyzer-api");
    }

    // ── /analyze ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_analyze_end_to_end() {
        let h = harness(JOHN_DOE_REPLY);
        let request = analyze_request(
            "/analyze",
            &[
                pdf_part(1024),
                Part::Text {
                    name: "atsSystems",
                    value: r#"["Workday"]"#,
                },
            ],
        );

        let response = h.router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "analysis": {
                    "report": "Needs more keywords",
                    "initialScore": 40.0,
                    "projectedScore": 70.0,
                    "atsSystems": ["Workday"]
                }
            })
        );
        assert_eq!(h.extractor.calls(), 1);
        let (prompt, _) = h.llm.last_prompt().unwrap();
        assert!(prompt.contains("John Doe, Software Engineer"));
        assert!(prompt.contains("Workday"));
    }

    #[tokio::test]
    async fn test_analyze_aliases_are_routed() {
        for uri in ["/api/analyze", "/api/analyze-cv"] {
            let h = harness(JOHN_DOE_REPLY);
            let request = analyze_request(
                uri,
                &[
                    pdf_part(16),
                    Part::Text {
                        name: "atsSystems",
                        value: r#"["Lever"]"#,
                    },
                ],
            );
            let response = h.router.oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_analyze_passes_job_description_and_language() {
        let h = harness(JOHN_DOE_REPLY);
        let request = analyze_request(
            "/analyze",
            &[
                pdf_part(16),
                Part::Text {
                    name: "atsSystems",
                    value: r#"["Workday", "Taleo"]"#,
                },
                Part::Text {
                    name: "jobDescription",
                    value: "Senior Rust engineer, Kubernetes",
                },
                Part::Text {
                    name: "language",
                    value: "en",
                },
            ],
        );

        let response = h.router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let (prompt, _) = h.llm.last_prompt().unwrap();
        assert!(prompt.contains("Senior Rust engineer, Kubernetes"));
        assert!(prompt.contains("Workday, Taleo"));
    }

    #[tokio::test]
    async fn test_oversized_upload_rejected_before_extraction() {
        let h = harness(JOHN_DOE_REPLY);
        let request = analyze_request(
            "/analyze",
            &[
                pdf_part(6 * 1024 * 1024),
                Part::Text {
                    name: "atsSystems",
                    value: r#"["Workday"]"#,
                },
            ],
        );

        let response = h.router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("5MB"));
        assert_eq!(h.extractor.calls(), 0);
        assert_eq!(h.llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_non_pdf_upload_rejected() {
        let h = harness(JOHN_DOE_REPLY);
        let request = analyze_request(
            "/analyze",
            &[
                Part::File {
                    content_type: "image/png",
                    data: vec![0x89, b'P', b'N', b'G'],
                },
                Part::Text {
                    name: "atsSystems",
                    value: r#"["Workday"]"#,
                },
            ],
        );

        let response = h.router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(h.extractor.calls(), 0);
        assert_eq!(h.llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_file_rejected() {
        let h = harness(JOHN_DOE_REPLY);
        let request = analyze_request(
            "/analyze",
            &[Part::Text {
                name: "atsSystems",
                value: r#"["Workday"]"#,
            }],
        );

        let response = h.router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "No file was uploaded");
    }

    #[tokio::test]
    async fn test_empty_ats_selection_rejected_without_llm_call() {
        for parts in [
            vec![pdf_part(16)],
            vec![
                pdf_part(16),
                Part::Text {
                    name: "atsSystems",
                    value: "[]",
                },
            ],
        ] {
            let h = harness(JOHN_DOE_REPLY);
            let response = h
                .router
                .oneshot(analyze_request("/analyze", &parts))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                body_json(response).await,
                json!({ "error": "Select at least one ATS system" })
            );
            assert_eq!(h.extractor.calls(), 0);
            assert_eq!(h.llm.calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_upstream_auth_failure_is_401() {
        let h = harness_with(
            FakeLlm::failing(|| LlmError::Unauthorized("invalid x-api-key".into())),
            false,
        );
        let request = analyze_request(
            "/analyze",
            &[
                pdf_part(16),
                Part::Text {
                    name: "atsSystems",
                    value: r#"["Workday"]"#,
                },
            ],
        );

        let response = h.router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // ── error details ───────────────────────────────────────────────────────

    async fn malformed_reply_body(development: bool) -> (StatusCode, Value) {
        let h = harness_with(
            FakeLlm::replying("<initial_score>40</initial_score>"),
            development,
        );
        let request = analyze_request(
            "/analyze",
            &[
                pdf_part(16),
                Part::Text {
                    name: "atsSystems",
                    value: r#"["Workday"]"#,
                },
            ],
        );
        let response = h.router.oneshot(request).await.unwrap();
        let status = response.status();
        (status, body_json(response).await)
    }

    #[tokio::test]
    async fn test_error_details_hidden_outside_development() {
        let (status, body) = malformed_reply_body(false).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.get("details").is_none());
        assert_eq!(body["error"], "The analysis response had an invalid format");
    }

    #[tokio::test]
    async fn test_error_details_exposed_in_development() {
        let (status, body) = malformed_reply_body(true).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["details"].as_str().unwrap().contains("analysis_report"));
    }

    // ── /analyze-job ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_analyze_job() {
        let h = harness(
            "<keywords>\n- Rust\n- Kubernetes\n</keywords>\n<hard_skills>\n- Rust\n</hard_skills>",
        );
        let response = h
            .router
            .oneshot(json_request(
                "/analyze-job",
                json!({ "description": "Senior Rust engineer with Kubernetes" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["insights"]["keywords"], json!(["Rust", "Kubernetes"]));
        assert_eq!(body["insights"]["hardSkills"], json!(["Rust"]));
        assert_eq!(body["insights"]["softSkills"], json!([]));
    }

    #[tokio::test]
    async fn test_analyze_job_blank_description() {
        let h = harness("");
        let response = h
            .router
            .oneshot(json_request("/api/analyze-job", json!({ "description": "   " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(h.llm.calls(), 0);
    }

    // ── exports ─────────────────────────────────────────────────────────────

    fn export_body() -> Value {
        json!({
            "analysis": "# Resumen\n✓ Buen formato\n⚠ Faltan métricas\n❌ Usa tablas",
            "scores": { "initial": 40, "projected": 70 },
            "fileName": "john-doe.pdf"
        })
    }

    #[tokio::test]
    async fn test_export_pdf() {
        let h = harness("");
        let response = h
            .router
            .oneshot(json_request("/export-pdf", export_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"john-doe.pdf\""
        );
        assert!(body_bytes(response).await.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_export_word() {
        let h = harness("");
        let response = h
            .router
            .oneshot(json_request("/api/export-word", export_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"john-doe.docx\""
        );
        assert!(body_bytes(response).await.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_export_rejects_invalid_body() {
        let h = harness("");
        let response = h
            .router
            .oneshot(json_request("/export-pdf", json!({ "analysis": "x" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
