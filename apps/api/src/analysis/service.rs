//! Orchestration of one analysis: prompt → completion → parse.
//! All LLM calls go through `LlmBackend`; no direct HTTP calls here.

use tracing::{debug, info};

use crate::analysis::parser::{parse_analysis, parse_job_insights};
use crate::analysis::template::{build_cv_prompt, build_job_prompt};
use crate::errors::AppError;
use crate::llm_client::LlmBackend;
use crate::models::analysis::{AnalysisRequest, AnalysisResult, JobInsights};

/// Runs the CV analysis for an already extracted and validated request.
pub async fn analyze_cv(
    llm: &dyn LlmBackend,
    request: &AnalysisRequest,
) -> Result<AnalysisResult, AppError> {
    let prompt = build_cv_prompt(request);
    debug!(
        "Prompt built: language={}, length={}",
        request.language.code(),
        prompt.user.len()
    );

    let reply = llm.complete(&prompt.user, &prompt.system).await?;
    let result = parse_analysis(&reply, &request.ats_systems)?;

    info!(
        "Analysis completed: initial_score={}, projected_score={}",
        result.initial_score, result.projected_score
    );
    Ok(result)
}

/// Extracts ATS keywords and skills from a job description.
pub async fn analyze_job(llm: &dyn LlmBackend, description: &str) -> Result<JobInsights, AppError> {
    let prompt = build_job_prompt(description);
    let reply = llm.complete(&prompt.user, &prompt.system).await?;
    let insights = parse_job_insights(&reply)?;

    info!(
        "Job analysis completed: {} keywords, {} hard skills",
        insights.keywords.len(),
        insights.hard_skills.len()
    );
    Ok(insights)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::llm_client::{LlmBackend, LlmError};

    /// Canned LLM backend that records every prompt it receives.
    pub struct FakeLlm {
        reply: Result<String, fn() -> LlmError>,
        pub prompts: Mutex<Vec<(String, String)>>,
    }

    impl FakeLlm {
        pub fn replying(reply: &str) -> Self {
            FakeLlm {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(make_error: fn() -> LlmError) -> Self {
            FakeLlm {
                reply: Err(make_error),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }

        pub fn last_prompt(&self) -> Option<(String, String)> {
            self.prompts.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl LlmBackend for FakeLlm {
        async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
            self.prompts
                .lock()
                .unwrap()
                .push((prompt.to_string(), system.to_string()));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(make_error) => Err(make_error()),
            }
        }
    }
}
