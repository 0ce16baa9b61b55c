//! Axum route handlers for the Insights API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::insights::analysis::{
    analyze_job_description, ideal_role_skills, IdealSkill, JobAnalysis,
};
use crate::profile::handlers::fetch_user;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IdealSkillsRequest {
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct IdealSkillsResponse {
    pub role: String,
    pub skills: Vec<IdealSkill>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeJdRequest {
    pub user_id: Uuid,
    pub jd_text: String,
}

/// POST /api/v1/insights/ideal-skills
///
/// The 5–7 crucial skills for a target role, for the dashboard radar chart.
pub async fn handle_ideal_skills(
    State(state): State<AppState>,
    Json(request): Json<IdealSkillsRequest>,
) -> Result<Json<IdealSkillsResponse>, AppError> {
    let role = request.role.trim().to_string();
    if role.is_empty() {
        return Err(AppError::Validation("role cannot be empty".to_string()));
    }

    let skills = ideal_role_skills(&state.llm, &state.ideal_skills_cache, &role).await?;
    Ok(Json(IdealSkillsResponse { role, skills }))
}

/// POST /api/v1/insights/analyze-jd
///
/// Summarizes a job description and surfaces skill gaps against the user's
/// stored profile.
pub async fn handle_analyze_jd(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeJdRequest>,
) -> Result<Json<JobAnalysis>, AppError> {
    if request.jd_text.trim().is_empty() {
        return Err(AppError::Validation("jd_text cannot be empty".to_string()));
    }

    let user = fetch_user(&state, request.user_id).await?;
    let analysis = analyze_job_description(
        &state.llm,
        &state.job_analysis_cache,
        user.id,
        &user.skills.0,
        request.jd_text.trim(),
    )
    .await?;

    Ok(Json(analysis))
}
