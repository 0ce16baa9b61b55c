//! Axum route handlers for the Assessment API.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::types::Json as SqlJson;
use uuid::Uuid;

use crate::assessment::generator::{
    evaluate_code, generate_assessment, generate_challenge, ChallengeProblem, CodeEvaluation,
    McqQuestion,
};
use crate::assessment::scoring::{apply_skill_update, grade, points_earned, GradedAssessment};
use crate::errors::AppError;
use crate::models::assessment::AssessmentResultRow;
use crate::models::user::{SkillEntry, UserRow};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateAssessmentRequest {
    pub topic: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateAssessmentResponse {
    pub topic: String,
    pub questions: Vec<McqQuestion>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateChallengeRequest {
    pub language: String,
    pub difficulty: String,
    pub topic: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateCodeRequest {
    pub problem: ChallengeProblem,
    pub user_code: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAssessmentRequest {
    pub user_id: Uuid,
    /// Topic doubles as the skill the result feeds back into.
    pub topic: String,
    pub title: Option<String>,
    pub questions: Vec<McqQuestion>,
    /// Question index (stringified) → chosen option letter.
    pub answers: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitAssessmentResponse {
    #[serde(flatten)]
    pub graded: GradedAssessment,
    pub points_earned: i32,
    pub total_points: i32,
    pub workflow_progress: i32,
    pub skills: Vec<SkillEntry>,
}

#[derive(Debug, Serialize)]
pub struct AssessmentHistoryResponse {
    pub results: Vec<AssessmentResultRow>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/assessments/generate
pub async fn handle_generate_assessment(
    State(state): State<AppState>,
    Json(request): Json<GenerateAssessmentRequest>,
) -> Result<Json<GenerateAssessmentResponse>, AppError> {
    let topic = request.topic.trim().to_string();
    if topic.is_empty() {
        return Err(AppError::Validation("topic cannot be empty".to_string()));
    }

    let questions = generate_assessment(&state.llm, &topic).await?;
    Ok(Json(GenerateAssessmentResponse { topic, questions }))
}

/// POST /api/v1/assessments/challenge
pub async fn handle_generate_challenge(
    State(state): State<AppState>,
    Json(request): Json<GenerateChallengeRequest>,
) -> Result<Json<ChallengeProblem>, AppError> {
    if request.language.trim().is_empty() || request.difficulty.trim().is_empty() {
        return Err(AppError::Validation(
            "language and difficulty are required".to_string(),
        ));
    }

    let problem = generate_challenge(
        &state.llm,
        request.language.trim(),
        request.difficulty.trim(),
        request.topic.as_deref(),
    )
    .await?;
    Ok(Json(problem))
}

/// POST /api/v1/assessments/evaluate-code
pub async fn handle_evaluate_code(
    State(state): State<AppState>,
    Json(request): Json<EvaluateCodeRequest>,
) -> Result<Json<CodeEvaluation>, AppError> {
    if request.user_code.trim().is_empty() {
        return Err(AppError::Validation("user_code cannot be empty".to_string()));
    }

    let evaluation = evaluate_code(&state.llm, &request.problem, &request.user_code).await?;
    Ok(Json(evaluation))
}

/// POST /api/v1/assessments/submit
///
/// Grades locally (no LLM call), then persists the attempt and the profile
/// effects — points, workflow progress, the topic skill's level — in one
/// transaction. The user row is locked for the duration so concurrent
/// submits serialize instead of overwriting each other's counters.
pub async fn handle_submit_assessment(
    State(state): State<AppState>,
    Json(request): Json<SubmitAssessmentRequest>,
) -> Result<Json<SubmitAssessmentResponse>, AppError> {
    if request.questions.is_empty() {
        return Err(AppError::Validation(
            "questions cannot be empty".to_string(),
        ));
    }

    let graded = grade(&request.questions, &request.answers);
    let earned = points_earned(graded.score_percent);

    let title = request
        .title
        .clone()
        .unwrap_or_else(|| format!("Dynamic Assessment: {}", request.topic.trim()));

    let reviewed_json =
        serde_json::to_value(&graded.reviewed).map_err(|e| AppError::Internal(e.into()))?;
    let answers_json =
        serde_json::to_value(&request.answers).map_err(|e| AppError::Internal(e.into()))?;

    let mut tx = state.db.begin().await?;

    let user = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1 FOR UPDATE")
        .bind(request.user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", request.user_id)))?;

    sqlx::query(
        "INSERT INTO assessment_results (id, user_id, title, score, answers, questions)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(Uuid::new_v4())
    .bind(user.id)
    .bind(&title)
    .bind(graded.score_percent)
    .bind(&answers_json)
    .bind(&reviewed_json)
    .execute(&mut *tx)
    .await?;

    let mut skills = user.skills.0;
    apply_skill_update(&mut skills, &request.topic, graded.score_percent);

    // Counters increment in SQL; the read above only feeds the skill update.
    let updated = sqlx::query_as::<_, UserRow>(
        "UPDATE users SET
            points = points + $2,
            workflow_progress = LEAST(workflow_progress + 10, 100),
            skills = $3
         WHERE id = $1
         RETURNING *",
    )
    .bind(user.id)
    .bind(earned)
    .bind(SqlJson(&skills))
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Json(SubmitAssessmentResponse {
        graded,
        points_earned: earned,
        total_points: updated.points,
        workflow_progress: updated.workflow_progress,
        skills,
    }))
}

/// GET /api/v1/users/:id/assessments
pub async fn handle_assessment_history(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<AssessmentHistoryResponse>, AppError> {
    let results = sqlx::query_as::<_, AssessmentResultRow>(
        "SELECT * FROM assessment_results WHERE user_id = $1 ORDER BY completed_at DESC",
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(AssessmentHistoryResponse { results }))
}
