use serde::Deserialize;

use crate::analysis::language::Language;

/// Export payload: the report text as returned by `/analyze` plus its scores.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub analysis: String,
    pub scores: Scores,
    #[serde(default)]
    pub file_name: Option<String>,
    /// Language of the document chrome (titles, labels, footer). Unknown
    /// codes fall back to Spanish.
    #[serde(default)]
    pub language: Option<String>,
}

impl ExportRequest {
    pub fn language(&self) -> Language {
        self.language
            .as_deref()
            .map(Language::from_code)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Scores {
    pub initial: f64,
    pub projected: f64,
}
