pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;
use crate::{assessment, chat, insights, learning, profile, recommend};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profile API
        .route(
            "/api/v1/users",
            post(profile::handlers::handle_register).get(profile::handlers::handle_list_users),
        )
        .route(
            "/api/v1/users/:id/profile",
            get(profile::handlers::handle_get_profile).put(profile::handlers::handle_update_profile),
        )
        .route(
            "/api/v1/users/:id",
            delete(profile::handlers::handle_delete_user),
        )
        .route(
            "/api/v1/leaderboard",
            get(profile::handlers::handle_leaderboard),
        )
        // Chat API
        .route("/api/v1/chat", post(chat::handlers::handle_chat))
        // Assessment API
        .route(
            "/api/v1/assessments/generate",
            post(assessment::handlers::handle_generate_assessment),
        )
        .route(
            "/api/v1/assessments/challenge",
            post(assessment::handlers::handle_generate_challenge),
        )
        .route(
            "/api/v1/assessments/evaluate-code",
            post(assessment::handlers::handle_evaluate_code),
        )
        .route(
            "/api/v1/assessments/submit",
            post(assessment::handlers::handle_submit_assessment),
        )
        .route(
            "/api/v1/users/:id/assessments",
            get(assessment::handlers::handle_assessment_history),
        )
        // Insights API
        .route(
            "/api/v1/insights/ideal-skills",
            post(insights::handlers::handle_ideal_skills),
        )
        .route(
            "/api/v1/insights/analyze-jd",
            post(insights::handlers::handle_analyze_jd),
        )
        // Learning API
        .route(
            "/api/v1/learning/suggest",
            post(learning::handlers::handle_suggest),
        )
        .route(
            "/api/v1/learning/course-content",
            post(learning::handlers::handle_course_content),
        )
        .route(
            "/api/v1/learning/summarize",
            post(learning::handlers::handle_summarize),
        )
        .route(
            "/api/v1/content",
            get(learning::handlers::handle_list_content)
                .post(learning::handlers::handle_create_content),
        )
        .route(
            "/api/v1/content/:id",
            delete(learning::handlers::handle_delete_content),
        )
        // Admin recommendations
        .route(
            "/api/v1/admin/recommendations",
            post(recommend::handlers::handle_recommendations),
        )
        .with_state(state)
}
