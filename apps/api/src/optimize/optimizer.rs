//! Optimizer — pluggable, trait-based collaborator that rewrites resume
//! sections for a job description and extracts the job's keywords.
//!
//! `AppState` holds an `Option<Arc<dyn Optimizer>>`; `None` when no LLM
//! provider is configured. Model output is untrusted and is shape-checked
//! here before anything is merged.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::{
    Contact, EducationEntry, ExperienceEntry, OptimizedSections, ProjectEntry,
};
use crate::optimize::prompts;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait Optimizer: Send + Sync {
    /// Returns a sparse overlay; sections the model left alone are `None`.
    async fn optimize(
        &self,
        resume_text: &str,
        job: &str,
        missing_keywords: &[String],
    ) -> Result<OptimizedSections, AppError>;

    /// Ordered keyword/phrase list for a job description.
    async fn extract_keywords(&self, job: &str) -> Result<Vec<String>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmOptimizer
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmOptimizer {
    llm: LlmClient,
}

impl LlmOptimizer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Optimizer for LlmOptimizer {
    async fn optimize(
        &self,
        resume_text: &str,
        job: &str,
        missing_keywords: &[String],
    ) -> Result<OptimizedSections, AppError> {
        let prompt = prompts::build_optimize_prompt(resume_text, job, missing_keywords);
        let raw: Value = self
            .llm
            .call_json(&prompt, &prompts::optimize_system())
            .await?;

        let sections = validate_optimized(raw);
        info!(
            "Optimizer ({:?}/{}) returned overlay, empty={}",
            self.llm.provider(),
            self.llm.model(),
            sections.is_empty()
        );
        Ok(sections)
    }

    async fn extract_keywords(&self, job: &str) -> Result<Vec<String>, AppError> {
        let prompt = prompts::build_keywords_prompt(job);
        let raw: Value = self
            .llm
            .call_json(&prompt, &prompts::keywords_system())
            .await?;

        let keywords = validate_keyword_list(raw);
        info!("Extracted {} keywords", keywords.len());
        Ok(keywords)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Shape validation
// ────────────────────────────────────────────────────────────────────────────

/// Keeps only well-shaped sections. Unknown keys are ignored. A list entry
/// that fails to deserialize becomes an empty entry, so later entries keep
/// their positions for the merge.
pub fn validate_optimized(raw: Value) -> OptimizedSections {
    let Value::Object(mut map) = raw else {
        warn!("Optimizer output is not a JSON object; ignoring it");
        return OptimizedSections::default();
    };

    let contact = map
        .remove("contact")
        .and_then(|v| match v {
            Value::Object(_) => serde_json::from_value::<Contact>(v).ok(),
            _ => None,
        });

    OptimizedSections {
        contact,
        education: map.remove("education").and_then(entries::<EducationEntry>),
        experience: map.remove("experience").and_then(entries::<ExperienceEntry>),
        projects: map.remove("projects").and_then(entries::<ProjectEntry>),
        skills: map.remove("skills").and_then(string_list),
    }
}

fn entries<T: DeserializeOwned + Default>(section: Value) -> Option<Vec<T>> {
    let Value::Array(items) = section else {
        warn!("Dropping non-array section from optimizer output");
        return None;
    };
    Some(
        items
            .into_iter()
            .map(|item| match item {
                Value::Object(_) => serde_json::from_value(item).unwrap_or_default(),
                _ => T::default(),
            })
            .collect(),
    )
}

fn string_list(section: Value) -> Option<Vec<String>> {
    let Value::Array(items) = section else {
        return None;
    };
    Some(
        items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                _ => None,
            })
            .collect(),
    )
}

/// Accepts a bare array or `{ "keywords": [...] }`; drops blanks and
/// non-strings.
pub fn validate_keyword_list(raw: Value) -> Vec<String> {
    let list = match raw {
        Value::Object(mut map) => map.remove("keywords").unwrap_or(Value::Null),
        other => other,
    };
    string_list(list).unwrap_or_default()
}
