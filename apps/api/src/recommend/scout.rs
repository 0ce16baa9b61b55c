//! Talent-scout matching: the LLM ranks stored employees against a target
//! role description, and we enrich its picks with the stored profiles.

use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::{GeminiClient, RetryPolicy};
use crate::models::user::{SkillEntry, UserRow};
use crate::recommend::prompts::scout_prompt;

/// One pick from the LLM, before enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedEmployee {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub matching_skills: Vec<String>,
    pub score: f64,
}

/// A pick joined back onto the stored profile. Recommendations whose id does
/// not match a stored user are dropped rather than surfaced half-formed.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedRecommendation {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub matching_skills: Vec<String>,
    pub score: f64,
    pub target_role: String,
    pub points: i32,
    pub skills: Vec<SkillEntry>,
}

/// Serializes candidates the way the scout prompt expects them: id, email,
/// fullName, and the skills array.
pub fn candidate_summaries(users: &[UserRow]) -> String {
    let summaries: Vec<_> = users
        .iter()
        .map(|user| {
            json!({
                "id": user.id,
                "email": user.email,
                "fullName": user.full_name,
                "skills": user.skills.0,
            })
        })
        .collect();
    json!(summaries).to_string()
}

/// Joins LLM picks back onto stored users, keeping the LLM's ordering.
pub fn enrich_recommendations(
    picks: Vec<RecommendedEmployee>,
    users: &[UserRow],
) -> Vec<EnrichedRecommendation> {
    picks
        .into_iter()
        .filter_map(|pick| {
            let user = users.iter().find(|u| u.id == pick.id)?;
            Some(EnrichedRecommendation {
                id: user.id,
                email: user.email.clone(),
                full_name: user.full_name.clone(),
                matching_skills: pick.matching_skills,
                score: pick.score,
                target_role: user.target_role.clone(),
                points: user.points,
                skills: user.skills.0.clone(),
            })
        })
        .collect()
}

/// Asks the LLM to pick the 3–5 best-fitting employees for a role.
pub async fn recommend_employees(
    llm: &GeminiClient,
    users: &[UserRow],
    role_description: &str,
) -> Result<Vec<EnrichedRecommendation>, AppError> {
    if users.is_empty() {
        return Ok(Vec::new());
    }

    let prompt = scout_prompt(&candidate_summaries(users), role_description);
    let picks: Vec<RecommendedEmployee> = llm
        .generate_json(&prompt, None, RetryPolicy::GENERATION)
        .await?;

    Ok(enrich_recommendations(picks, users))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{envelope, test_client, ScriptedTransport};
    use chrono::Utc;
    use sqlx::types::Json;

    fn user(id: Uuid, email: &str, name: &str) -> UserRow {
        UserRow {
            id,
            email: email.to_string(),
            full_name: name.to_string(),
            user_type: "employee".to_string(),
            target_role: "Backend Engineer".to_string(),
            points: 42,
            workflow_progress: 20,
            skills: Json(vec![SkillEntry {
                name: "Rust".to_string(),
                level: 4.0,
            }]),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_candidate_summaries_use_wire_field_names() {
        let users = vec![user(Uuid::new_v4(), "a@x.com", "Ada")];
        let json = candidate_summaries(&users);
        assert!(json.contains("\"fullName\":\"Ada\""));
        assert!(json.contains("\"skills\""));
        assert!(!json.contains("full_name"));
    }

    #[test]
    fn test_enrich_drops_picks_with_unknown_ids() {
        let known = Uuid::new_v4();
        let users = vec![user(known, "a@x.com", "Ada")];
        let picks = vec![
            RecommendedEmployee {
                id: known,
                email: "a@x.com".to_string(),
                full_name: "Ada".to_string(),
                matching_skills: vec!["Rust".to_string()],
                score: 91.0,
            },
            RecommendedEmployee {
                id: Uuid::new_v4(),
                email: "ghost@x.com".to_string(),
                full_name: "Ghost".to_string(),
                matching_skills: vec![],
                score: 88.0,
            },
        ];

        let enriched = enrich_recommendations(picks, &users);
        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].id, known);
        assert_eq!(enriched[0].points, 42);
        assert_eq!(enriched[0].matching_skills, vec!["Rust".to_string()]);
    }

    #[tokio::test]
    async fn test_recommend_skips_llm_when_no_candidates() {
        let transport = ScriptedTransport::new(vec![(200, "unused")]);
        let llm = test_client(transport.clone());

        let result = recommend_employees(&llm, &[], "Backend Engineer")
            .await
            .unwrap();
        assert!(result.is_empty());
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_recommend_parses_camel_case_picks() {
        let id = Uuid::new_v4();
        let users = vec![user(id, "a@x.com", "Ada")];
        let body = envelope(&format!(
            r#"[{{"id":"{id}","email":"a@x.com","fullName":"Ada","matchingSkills":["Rust"],"score":95}}]"#
        ));
        let transport = ScriptedTransport::new(vec![(200, &body)]);
        let llm = test_client(transport);

        let result = recommend_employees(&llm, &users, "Backend Engineer")
            .await
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].full_name, "Ada");
        assert_eq!(result[0].score, 95.0);
    }
}
