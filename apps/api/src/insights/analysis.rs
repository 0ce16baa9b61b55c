//! LLM-backed insight operations, fronted by TTL caches so repeated
//! dashboard loads don't burn quota on identical questions.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::cache::TtlCache;
use crate::errors::AppError;
use crate::insights::prompts::{
    ideal_skills_prompt, ideal_skills_schema, jd_analysis_prompt, jd_analysis_schema,
};
use crate::llm_client::{GeminiClient, GenerationConfig, RetryPolicy};
use crate::models::user::SkillEntry;

/// One suggested skill for a target role, with its expected proficiency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdealSkill {
    pub skill_name: String,
    /// 0 (novice) – 5 (expert).
    pub proficiency: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAnalysis {
    pub job_summary: String,
    pub required_skills: Vec<String>,
    pub skill_gaps: Vec<String>,
    pub improvement_suggestions: String,
}

pub type IdealSkillsCache = TtlCache<String, Vec<IdealSkill>>;
pub type JobAnalysisCache = TtlCache<String, JobAnalysis>;

/// Returns the crucial skills for `role`, serving from the cache when the
/// same role was asked about within the TTL.
pub async fn ideal_role_skills(
    llm: &GeminiClient,
    cache: &IdealSkillsCache,
    role: &str,
) -> Result<Vec<IdealSkill>, AppError> {
    let key = role.trim().to_string();

    if let Some(cached) = cache.get(&key) {
        debug!("ideal skills cache hit for role '{key}'");
        return Ok(cached);
    }

    let config = GenerationConfig::json(ideal_skills_schema());
    let skills: Vec<IdealSkill> = llm
        .generate_json(
            &ideal_skills_prompt(&key),
            Some(&config),
            RetryPolicy::INTERACTIVE,
        )
        .await?;

    cache.insert(key, skills.clone());
    Ok(skills)
}

/// Analyzes a job description against the user's skills. Cached per
/// (user, jd_text) pair — the result depends on both.
pub async fn analyze_job_description(
    llm: &GeminiClient,
    cache: &JobAnalysisCache,
    user_id: Uuid,
    user_skills: &[SkillEntry],
    jd_text: &str,
) -> Result<JobAnalysis, AppError> {
    let key = format!("{user_id}\n{jd_text}");

    if let Some(cached) = cache.get(&key) {
        debug!("job analysis cache hit for user {user_id}");
        return Ok(cached);
    }

    let config = GenerationConfig::json(jd_analysis_schema());
    let analysis: JobAnalysis = llm
        .generate_json(
            &jd_analysis_prompt(&format_skills(user_skills), jd_text),
            Some(&config),
            RetryPolicy::INTERACTIVE,
        )
        .await?;

    cache.insert(key, analysis.clone());
    Ok(analysis)
}

/// Renders skills the way prompts expect: `Rust (Level: 4), SQL (Level: 2.5)`.
fn format_skills(skills: &[SkillEntry]) -> String {
    skills
        .iter()
        .map(|s| format!("{} (Level: {})", s.name, s.level))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{envelope, test_client, ScriptedTransport};
    use std::time::Duration;

    fn ideal_skills_body() -> String {
        envelope(r#"[{"skillName":"SQL","proficiency":4},{"skillName":"Python","proficiency":5}]"#)
    }

    fn analysis_body() -> String {
        envelope(
            r#"{"jobSummary":"Backend role","requiredSkills":["Rust"],"skillGaps":["Kubernetes"],"improvementSuggestions":"Learn k8s"}"#,
        )
    }

    #[test]
    fn test_format_skills_includes_fractional_levels() {
        let skills = vec![
            SkillEntry {
                name: "Rust".to_string(),
                level: 4.0,
            },
            SkillEntry {
                name: "SQL".to_string(),
                level: 2.5,
            },
        ];
        assert_eq!(format_skills(&skills), "Rust (Level: 4), SQL (Level: 2.5)");
    }

    #[tokio::test]
    async fn test_ideal_skills_second_call_is_served_from_cache() {
        let body = ideal_skills_body();
        let transport = ScriptedTransport::new(vec![(200, &body)]);
        let llm = test_client(transport.clone());
        let cache = IdealSkillsCache::new(Duration::from_secs(3600));

        let first = ideal_role_skills(&llm, &cache, "Data Engineer").await.unwrap();
        let second = ideal_role_skills(&llm, &cache, "Data Engineer").await.unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(second[0].skill_name, "SQL");
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_ideal_skills_distinct_roles_miss_the_cache() {
        let body = ideal_skills_body();
        let transport = ScriptedTransport::new(vec![(200, &body)]);
        let llm = test_client(transport.clone());
        let cache = IdealSkillsCache::new(Duration::from_secs(3600));

        ideal_role_skills(&llm, &cache, "Data Engineer").await.unwrap();
        ideal_role_skills(&llm, &cache, "ML Engineer").await.unwrap();

        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_jd_analysis_cache_is_per_user_and_jd() {
        let body = analysis_body();
        let transport = ScriptedTransport::new(vec![(200, &body)]);
        let llm = test_client(transport.clone());
        let cache = JobAnalysisCache::new(Duration::from_secs(3600));
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let jd = "We need a backend engineer.";
        analyze_job_description(&llm, &cache, alice, &[], jd).await.unwrap();
        analyze_job_description(&llm, &cache, alice, &[], jd).await.unwrap();
        assert_eq!(transport.calls(), 1);

        // A different user sees a fresh analysis of the same JD.
        analyze_job_description(&llm, &cache, bob, &[], jd).await.unwrap();
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_jd_analysis_decodes_wire_shape() {
        let body = analysis_body();
        let transport = ScriptedTransport::new(vec![(200, &body)]);
        let llm = test_client(transport);
        let cache = JobAnalysisCache::new(Duration::from_secs(3600));

        let analysis = analyze_job_description(&llm, &cache, Uuid::new_v4(), &[], "jd")
            .await
            .unwrap();
        assert_eq!(analysis.job_summary, "Backend role");
        assert_eq!(analysis.skill_gaps, vec!["Kubernetes"]);
    }
}
