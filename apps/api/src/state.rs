use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::insights::analysis::{IdealSkillsCache, JobAnalysisCache};
use crate::llm_client::GeminiClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: GeminiClient,
    pub config: Config,
    /// Ideal-skills responses keyed by trimmed role name.
    pub ideal_skills_cache: Arc<IdealSkillsCache>,
    /// JD analyses keyed by user id plus JD text, so one user's analysis
    /// never leaks to another.
    pub job_analysis_cache: Arc<JobAnalysisCache>,
}
