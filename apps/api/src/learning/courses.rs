//! Course suggestion, content resolution, and summarization.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::learning::prompts::{
    course_content_prompt, suggest_prompt, suggestions_schema, summarize_prompt,
};
use crate::llm_client::{GeminiClient, GenerationConfig, RetryPolicy};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSuggestion {
    pub title: String,
    pub description: String,
}

/// Where a resolved course body came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseSource {
    ExternalUrl,
    Curated,
    Generated,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseContent {
    pub title: String,
    pub content: String,
    pub source: CourseSource,
}

/// Suggests 5 course titles with short descriptions for a topic.
pub async fn suggest_courses(
    llm: &GeminiClient,
    topic: &str,
) -> Result<Vec<CourseSuggestion>, AppError> {
    let config = GenerationConfig::json(suggestions_schema()).with_temperature(0.7);
    let suggestions = llm
        .generate_json(
            &suggest_prompt(topic),
            Some(&config),
            RetryPolicy::GENERATION,
        )
        .await?;
    Ok(suggestions)
}

/// Resolves course material in priority order: an external URL wins, then
/// curated module text, and only then do we generate content with the LLM.
pub async fn resolve_course_content(
    llm: &GeminiClient,
    title: &str,
    content_url: Option<&str>,
    module_content: Option<&str>,
) -> Result<CourseContent, AppError> {
    if let Some(url) = content_url.filter(|u| !u.trim().is_empty()) {
        return Ok(CourseContent {
            title: title.to_string(),
            content: format!(
                "Please visit the external link to access the course material: {url}"
            ),
            source: CourseSource::ExternalUrl,
        });
    }

    if let Some(module) = module_content.filter(|m| !m.trim().is_empty()) {
        return Ok(CourseContent {
            title: title.to_string(),
            content: module.to_string(),
            source: CourseSource::Curated,
        });
    }

    let content = llm
        .generate_text(
            &course_content_prompt(title),
            None,
            RetryPolicy::GENERATION,
        )
        .await?;

    Ok(CourseContent {
        title: title.to_string(),
        content,
        source: CourseSource::Generated,
    })
}

/// Produces a 2–3 sentence summary of course material.
pub async fn summarize(llm: &GeminiClient, text: &str) -> Result<String, AppError> {
    let config = GenerationConfig::default().with_temperature(0.5);
    let summary = llm
        .generate_text(
            &summarize_prompt(text),
            Some(&config),
            RetryPolicy::GENERATION,
        )
        .await?;
    Ok(summary)
}
