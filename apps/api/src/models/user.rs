use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// One skill on a user's profile. Levels run 0 (novice) to 5 (expert).
///
/// Levels are f64 rather than integer on purpose: the assessment penalty
/// subtracts half a point, so half-step levels like 2.5 are legal and
/// surfaced as-is by the profile API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub name: String,
    pub level: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    /// "employee" or "admin". New registrations default to "employee".
    pub user_type: String,
    pub target_role: String,
    pub points: i32,
    /// 0–100, bumped by 10 per completed assessment.
    pub workflow_progress: i32,
    pub skills: Json<Vec<SkillEntry>>,
    pub created_at: DateTime<Utc>,
}
