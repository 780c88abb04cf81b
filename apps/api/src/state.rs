use std::sync::Arc;

use crate::analysis::extract::TextExtractor;
use crate::config::Config;
use crate::llm_client::LlmBackend;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend. `LlmClient` in production, a canned fake in tests.
    pub llm: Arc<dyn LlmBackend>,
    /// Upload text extractor. Default: `PdfTextExtractor`.
    pub extractor: Arc<dyn TextExtractor>,
    pub config: Config,
}
