use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Admin-curated learning content. A learner resolves an item in priority
/// order: external `content_url` first, then inline `module_content`, and
/// only then AI-generated material.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContentRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub content_url: Option<String>,
    pub module_content: Option<String>,
    pub created_at: DateTime<Utc>,
}
