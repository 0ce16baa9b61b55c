//! Axum route handlers for admin recommendations.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::recommend::scout::{recommend_employees, EnrichedRecommendation};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendationsRequest {
    pub role_description: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub role_description: String,
    pub recommendations: Vec<EnrichedRecommendation>,
}

/// POST /api/v1/admin/recommendations
///
/// Ranks stored employees against a target role description.
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Json(request): Json<RecommendationsRequest>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let role_description = request.role_description.trim().to_string();
    if role_description.is_empty() {
        return Err(AppError::Validation(
            "role_description cannot be empty".to_string(),
        ));
    }

    let users = sqlx::query_as::<_, UserRow>(
        "SELECT * FROM users WHERE user_type = 'employee' ORDER BY created_at",
    )
    .fetch_all(&state.db)
    .await?;

    let recommendations = recommend_employees(&state.llm, &users, &role_description).await?;
    Ok(Json(RecommendationsResponse {
        role_description,
        recommendations,
    }))
}
