//! Response Parser: pulls tagged sections out of the model's free-form reply.
//!
//! A section is the text between the first `<tag>` and the following `</tag>`,
//! case-sensitive, anywhere in the reply and possibly spanning lines.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::errors::AppError;
use crate::models::analysis::{AnalysisResult, JobInsights};

pub const REPORT_TAG: &str = "analysis_report";
pub const INITIAL_SCORE_TAG: &str = "initial_score";
pub const PROJECTED_SCORE_TAG: &str = "projected_score";

/// Leading decimal number, optionally signed, after whitespace.
static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?(?:\d+(?:\.\d*)?|\.\d+))").expect("valid regex"));

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("response is missing the <{0}> section")]
    MissingSection(&'static str),

    #[error("the <{0}> section is empty")]
    EmptySection(&'static str),

    #[error("<{tag}> does not contain a number: {value:?}")]
    InvalidScore { tag: &'static str, value: String },
}

impl From<ParseError> for AppError {
    fn from(err: ParseError) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Returns the content of the first `<tag>…</tag>` pair, untrimmed.
pub fn extract_section<'a>(text: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = text.find(&open)? + open.len();
    let len = text[start..].find(&close)?;
    Some(&text[start..start + len])
}

/// Parses the leading number of a score section the way a lenient float
/// parser would: `72/100` reads as 72.
fn parse_score(tag: &'static str, raw: &str) -> Result<f64, ParseError> {
    LEADING_NUMBER
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .ok_or_else(|| ParseError::InvalidScore {
            tag,
            value: raw.trim().to_string(),
        })
}

fn optional_score(text: &str, tag: &'static str) -> Result<f64, ParseError> {
    match extract_section(text, tag) {
        Some(raw) => parse_score(tag, raw),
        None => Ok(0.0),
    }
}

/// Parses a CV analysis reply. The report section is mandatory; missing
/// scores default to 0.
pub fn parse_analysis(text: &str, ats_systems: &[String]) -> Result<AnalysisResult, ParseError> {
    let report = extract_section(text, REPORT_TAG)
        .ok_or(ParseError::MissingSection(REPORT_TAG))?
        .trim();
    if report.is_empty() {
        return Err(ParseError::EmptySection(REPORT_TAG));
    }

    Ok(AnalysisResult {
        report: report.to_string(),
        initial_score: optional_score(text, INITIAL_SCORE_TAG)?,
        projected_score: optional_score(text, PROJECTED_SCORE_TAG)?,
        ats_systems: ats_systems.to_vec(),
    })
}

/// Splits a section into list items, dropping bullet markers and blank lines.
fn list_items(section: &str) -> Vec<String> {
    section
        .lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(&['-', '*', '•'][..])
                .trim()
                .to_string()
        })
        .filter(|item| !item.is_empty())
        .collect()
}

/// Parses a job description reply. Each section is optional, but a reply
/// with none of them is malformed.
pub fn parse_job_insights(text: &str) -> Result<JobInsights, ParseError> {
    let section = |tag: &str| extract_section(text, tag).map(list_items);

    let keywords = section("keywords");
    let hard_skills = section("hard_skills");
    let soft_skills = section("soft_skills");
    let requirements = section("requirements");

    if keywords.is_none() && hard_skills.is_none() && soft_skills.is_none() && requirements.is_none()
    {
        return Err(ParseError::MissingSection("keywords"));
    }

    Ok(JobInsights {
        keywords: keywords.unwrap_or_default(),
        hard_skills: hard_skills.unwrap_or_default(),
        soft_skills: soft_skills.unwrap_or_default(),
        requirements: requirements.unwrap_or_default(),
    })
}
