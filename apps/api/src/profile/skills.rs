//! Skill list normalization applied on every profile write.

use crate::models::user::SkillEntry;

pub const MIN_LEVEL: f64 = 0.0;
pub const MAX_LEVEL: f64 = 5.0;

/// Normalizes a submitted skill list:
/// - trims names and drops empties
/// - clamps levels to [0, 5] (half-steps allowed)
/// - dedupes case-insensitively, last entry wins
pub fn normalize_skills(skills: Vec<SkillEntry>) -> Vec<SkillEntry> {
    let mut normalized: Vec<SkillEntry> = Vec::with_capacity(skills.len());

    for skill in skills {
        let name = skill.name.trim();
        if name.is_empty() {
            continue;
        }
        let level = skill.level.clamp(MIN_LEVEL, MAX_LEVEL);

        if let Some(existing) = normalized
            .iter_mut()
            .find(|s| s.name.eq_ignore_ascii_case(name))
        {
            existing.level = level;
        } else {
            normalized.push(SkillEntry {
                name: name.to_string(),
                level,
            });
        }
    }

    normalized
}
