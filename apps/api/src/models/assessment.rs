use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A completed assessment attempt. `answers` and `questions` are stored as
/// the JSON the client submitted (questions carry per-question review data).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssessmentResultRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    /// Percentage score, 0.0–100.0.
    pub score: f64,
    pub answers: Value,
    pub questions: Value,
    pub completed_at: DateTime<Utc>,
}
