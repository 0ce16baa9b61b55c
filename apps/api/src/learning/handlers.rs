//! Axum route handlers for the Learning API and curated-content admin CRUD.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::learning::courses::{
    resolve_course_content, suggest_courses, summarize, CourseContent, CourseSuggestion,
};
use crate::models::content::ContentRow;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub topic: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub topic: String,
    pub courses: Vec<CourseSuggestion>,
}

#[derive(Debug, Deserialize)]
pub struct CourseContentRequest {
    pub title: String,
    pub content_url: Option<String>,
    pub module_content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateContentRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub content_url: Option<String>,
    pub module_content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ContentListResponse {
    pub content: Vec<ContentRow>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/learning/suggest
pub async fn handle_suggest(
    State(state): State<AppState>,
    Json(request): Json<SuggestRequest>,
) -> Result<Json<SuggestResponse>, AppError> {
    let topic = request.topic.trim().to_string();
    if topic.is_empty() {
        return Err(AppError::Validation("topic cannot be empty".to_string()));
    }

    let courses = suggest_courses(&state.llm, &topic).await?;
    Ok(Json(SuggestResponse { topic, courses }))
}

/// POST /api/v1/learning/course-content
///
/// Resolves material for a course: external URL → curated text → generated.
pub async fn handle_course_content(
    State(state): State<AppState>,
    Json(request): Json<CourseContentRequest>,
) -> Result<Json<CourseContent>, AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }

    let content = resolve_course_content(
        &state.llm,
        request.title.trim(),
        request.content_url.as_deref(),
        request.module_content.as_deref(),
    )
    .await?;
    Ok(Json(content))
}

/// POST /api/v1/learning/summarize
pub async fn handle_summarize(
    State(state): State<AppState>,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    let summary = summarize(&state.llm, &request.text).await?;
    Ok(Json(SummarizeResponse { summary }))
}

/// GET /api/v1/content
pub async fn handle_list_content(
    State(state): State<AppState>,
) -> Result<Json<ContentListResponse>, AppError> {
    let content =
        sqlx::query_as::<_, ContentRow>("SELECT * FROM learning_content ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await?;

    Ok(Json(ContentListResponse { content }))
}

/// POST /api/v1/content
///
/// Admin: creates a curated content item.
pub async fn handle_create_content(
    State(state): State<AppState>,
    Json(request): Json<CreateContentRequest>,
) -> Result<(StatusCode, Json<ContentRow>), AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }

    let row = sqlx::query_as::<_, ContentRow>(
        "INSERT INTO learning_content (id, title, description, content_url, module_content)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(request.title.trim())
    .bind(request.description.trim())
    .bind(request.content_url.as_deref().map(str::trim))
    .bind(request.module_content.as_deref())
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// DELETE /api/v1/content/:id
pub async fn handle_delete_content(
    State(state): State<AppState>,
    Path(content_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM learning_content WHERE id = $1")
        .bind(content_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Content {content_id} not found"
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}
