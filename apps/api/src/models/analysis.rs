use serde::{Deserialize, Serialize};

use crate::analysis::language::Language;

/// A validated analysis request. Built per upload and dropped after the response.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub cv_text: String,
    /// Never empty; the upload handler rejects an empty selection.
    pub ats_systems: Vec<String>,
    pub job_description: Option<String>,
    pub language: Language,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub report: String,
    /// Expected 0–100 but passed through as the model wrote it.
    pub initial_score: f64,
    pub projected_score: f64,
    pub ats_systems: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: AnalysisResult,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeJobRequest {
    pub description: String,
}

/// ATS vocabulary extracted from a job description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInsights {
    pub keywords: Vec<String>,
    pub hard_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub requirements: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeJobResponse {
    pub insights: JobInsights,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_result_serializes_camel_case() {
        let result = AnalysisResult {
            report: "Needs more keywords".to_string(),
            initial_score: 40.0,
            projected_score: 70.0,
            ats_systems: vec!["Workday".to_string()],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["report"], "Needs more keywords");
        assert_eq!(value["initialScore"], 40.0);
        assert_eq!(value["projectedScore"], 70.0);
        assert_eq!(value["atsSystems"][0], "Workday");
    }

    #[test]
    fn test_job_insights_serializes_camel_case() {
        let insights = JobInsights {
            hard_skills: vec!["Rust".to_string()],
            ..Default::default()
        };
        let value = serde_json::to_value(&insights).unwrap();
        assert_eq!(value["hardSkills"][0], "Rust");
        assert!(value["softSkills"].as_array().unwrap().is_empty());
    }
}
