// CV Analysis
// Implements: PDF text extraction, prompt building, response parsing, job-description insights.
// All LLM calls go through llm_client; no direct Anthropic HTTP calls here.

pub mod extract;
pub mod handlers;
pub mod language;
pub mod parser;
pub mod prompts;
pub mod service;
pub mod template;
