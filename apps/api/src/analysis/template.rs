//! Prompt templates as an ordered list of literal text and named slots.
//!
//! A template is compiled once into segments; rendering walks the segments a
//! single time and asks a resolver for each slot value. Resolved values are
//! written verbatim and never scanned again, so a CV containing `{atsSystems}`
//! stays literal text.

use std::borrow::Cow;

use once_cell::sync::Lazy;

use crate::analysis::language::Language;
use crate::analysis::prompts::{cv_prompt_set, JOB_ANALYSIS_SYSTEM, JOB_ANALYSIS_TEMPLATE};
use crate::models::analysis::AnalysisRequest;

/// Every placeholder a template may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    CvText,
    AtsSystems,
    JobDescription,
    JobDescriptionSection,
    JobMatchSection,
    JobSkillsSection,
}

impl Slot {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "cvText" => Some(Slot::CvText),
            "atsSystems" => Some(Slot::AtsSystems),
            "jobDescription" => Some(Slot::JobDescription),
            "jobDescriptionSection" => Some(Slot::JobDescriptionSection),
            "jobMatchSection" => Some(Slot::JobMatchSection),
            "jobSkillsSection" => Some(Slot::JobSkillsSection),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(&'static str),
    Slot(Slot),
}

#[derive(Debug, Clone)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Splits `source` into literals and slots. `{name}` with an unknown name
    /// is kept as literal text.
    pub fn compile(source: &'static str) -> Self {
        let mut segments = Vec::new();
        let mut literal_start = 0;
        let mut cursor = 0;

        while let Some(open) = source[cursor..].find('{').map(|i| cursor + i) {
            let Some(close) = source[open..].find('}').map(|i| open + i) else {
                break;
            };
            match Slot::from_name(&source[open + 1..close]) {
                Some(slot) => {
                    if literal_start < open {
                        segments.push(Segment::Literal(&source[literal_start..open]));
                    }
                    segments.push(Segment::Slot(slot));
                    literal_start = close + 1;
                    cursor = close + 1;
                }
                None => cursor = open + 1,
            }
        }

        if literal_start < source.len() {
            segments.push(Segment::Literal(&source[literal_start..]));
        }

        Template { segments }
    }

    #[cfg(test)]
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Slot(slot) => Some(*slot),
            Segment::Literal(_) => None,
        })
    }

    pub fn render<'v>(&self, mut resolve: impl FnMut(Slot) -> Cow<'v, str>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(slot) => out.push_str(&resolve(*slot)),
            }
        }
        out
    }
}

/// The request-derived values a template can draw on.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub cv_text: &'a str,
    pub ats_systems: &'a [String],
    pub job_description: Option<&'a str>,
    pub language: Language,
}

impl<'a> From<&'a AnalysisRequest> for PromptContext<'a> {
    fn from(request: &'a AnalysisRequest) -> Self {
        PromptContext {
            cv_text: &request.cv_text,
            ats_systems: &request.ats_systems,
            job_description: request
                .job_description
                .as_deref()
                .filter(|jd| !jd.trim().is_empty()),
            language: request.language,
        }
    }
}

/// Final prompt pair sent to the completion API.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltPrompt {
    pub system: String,
    pub user: String,
}

struct CompiledCvTemplates {
    body: Template,
    job_description_section: Template,
    job_match_section: Template,
    job_skills_section: Template,
}

impl CompiledCvTemplates {
    fn compile(language: Language) -> Self {
        let set = cv_prompt_set(language);
        CompiledCvTemplates {
            body: Template::compile(set.template),
            job_description_section: Template::compile(set.job_description_section),
            job_match_section: Template::compile(set.job_match_section),
            job_skills_section: Template::compile(set.job_skills_section),
        }
    }
}

static CV_TEMPLATES_ES: Lazy<CompiledCvTemplates> =
    Lazy::new(|| CompiledCvTemplates::compile(Language::Es));
static CV_TEMPLATES_EN: Lazy<CompiledCvTemplates> =
    Lazy::new(|| CompiledCvTemplates::compile(Language::En));
static JOB_TEMPLATE: Lazy<Template> = Lazy::new(|| Template::compile(JOB_ANALYSIS_TEMPLATE));

fn cv_templates(language: Language) -> &'static CompiledCvTemplates {
    match language {
        Language::Es => &CV_TEMPLATES_ES,
        Language::En => &CV_TEMPLATES_EN,
    }
}

/// Resolves one slot. Job-dependent sections collapse to "" without a job description.
fn resolve_slot<'a>(slot: Slot, ctx: &PromptContext<'a>) -> Cow<'a, str> {
    let templates = cv_templates(ctx.language);
    let job_block = |template: &Template| -> Cow<'a, str> {
        match ctx.job_description {
            Some(_) => Cow::Owned(template.render(|inner| resolve_slot(inner, ctx))),
            None => Cow::Borrowed(""),
        }
    };

    match slot {
        Slot::CvText => Cow::Borrowed(ctx.cv_text),
        Slot::AtsSystems => Cow::Owned(ctx.ats_systems.join(", ")),
        Slot::JobDescription => Cow::Borrowed(ctx.job_description.unwrap_or_default()),
        Slot::JobDescriptionSection => job_block(&templates.job_description_section),
        Slot::JobMatchSection => job_block(&templates.job_match_section),
        Slot::JobSkillsSection => job_block(&templates.job_skills_section),
    }
}

/// Builds the CV analysis prompt for a validated request.
pub fn build_cv_prompt(request: &AnalysisRequest) -> BuiltPrompt {
    let ctx = PromptContext::from(request);
    let user = cv_templates(ctx.language)
        .body
        .render(|slot| resolve_slot(slot, &ctx));

    BuiltPrompt {
        system: cv_prompt_set(ctx.language).system.to_string(),
        user,
    }
}

/// Builds the job description keyword extraction prompt.
pub fn build_job_prompt(description: &str) -> BuiltPrompt {
    let user = JOB_TEMPLATE.render(|slot| match slot {
        Slot::JobDescription => Cow::Borrowed(description),
        _ => Cow::Borrowed(""),
    });

    BuiltPrompt {
        system: JOB_ANALYSIS_SYSTEM.to_string(),
        user,
    }
}
