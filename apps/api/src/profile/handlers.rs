//! Axum route handlers for the Profile API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::types::Json as SqlJson;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{SkillEntry, UserRow};
use crate::profile::skills::normalize_skills;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    #[serde(default)]
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub target_role: Option<String>,
    pub skills: Option<Vec<SkillEntry>>,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserRow>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub full_name: String,
    pub points: i32,
    pub workflow_progress: i32,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntry>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/users
///
/// Registers a new user with an empty skill profile. New users start as
/// "employee" with zero points and zero workflow progress.
pub async fn handle_register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserRow>), AppError> {
    let email = request.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("a valid email is required".to_string()));
    }

    let user = sqlx::query_as::<_, UserRow>(
        "INSERT INTO users (id, email, full_name, user_type, target_role, points, workflow_progress, skills)
         VALUES ($1, $2, $3, 'employee', '', 0, 0, '[]'::jsonb)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(request.full_name.trim())
    .fetch_one(&state.db)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            AppError::Conflict(format!("a user with email {email} already exists"))
        }
        _ => AppError::Database(e),
    })?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/users/:id/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserRow>, AppError> {
    let user = fetch_user(&state, user_id).await?;
    Ok(Json(user))
}

/// PUT /api/v1/users/:id/profile
///
/// Partial update: omitted fields are left untouched. Submitted skills are
/// normalized (trimmed, clamped to [0, 5], deduped) before persisting.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserRow>, AppError> {
    let skills = request.skills.map(normalize_skills);

    let user = sqlx::query_as::<_, UserRow>(
        "UPDATE users SET
            full_name = COALESCE($2, full_name),
            target_role = COALESCE($3, target_role),
            skills = COALESCE($4, skills)
         WHERE id = $1
         RETURNING *",
    )
    .bind(user_id)
    .bind(request.full_name.as_deref().map(str::trim))
    .bind(request.target_role.as_deref().map(str::trim))
    .bind(skills.map(SqlJson))
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;

    Ok(Json(user))
}

/// GET /api/v1/users
///
/// Admin: lists all users with their full profiles.
pub async fn handle_list_users(
    State(state): State<AppState>,
) -> Result<Json<UserListResponse>, AppError> {
    let users = sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY created_at")
        .fetch_all(&state.db)
        .await?;

    Ok(Json(UserListResponse { users }))
}

/// DELETE /api/v1/users/:id
///
/// Admin: removes a user and their assessment history.
pub async fn handle_delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("User {user_id} not found")));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/leaderboard
///
/// Users ranked by points, descending. Ties share insertion order.
pub async fn handle_leaderboard(
    State(state): State<AppState>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let entries = sqlx::query_as::<_, LeaderboardEntry>(
        "SELECT ROW_NUMBER() OVER (ORDER BY points DESC, created_at) AS rank,
                full_name, points, workflow_progress
         FROM users
         ORDER BY points DESC, created_at",
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(LeaderboardResponse { entries }))
}

pub(crate) async fn fetch_user(state: &AppState, user_id: Uuid) -> Result<UserRow, AppError> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
}
