//! Local grading and profile effects. Pure functions — no I/O, no LLM.

use std::collections::HashMap;

use serde::Serialize;

use crate::assessment::generator::McqQuestion;
use crate::models::user::SkillEntry;

/// Points awarded per assessment: score/5, so a perfect run earns 20.
pub fn points_earned(score_percent: f64) -> i32 {
    (score_percent / 5.0).round() as i32
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewedQuestion {
    #[serde(flatten)]
    pub question: McqQuestion,
    pub user_answer: Option<String>,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GradedAssessment {
    /// Percentage score, 0.0–100.0.
    pub score_percent: f64,
    pub correct_count: usize,
    pub total_questions: usize,
    pub reviewed: Vec<ReviewedQuestion>,
}

/// Grades submitted answers against the question set. `answers` is keyed by
/// the question index (as a string, matching the submitted JSON object) and
/// holds the chosen option letter.
pub fn grade(questions: &[McqQuestion], answers: &HashMap<String, String>) -> GradedAssessment {
    let total_questions = questions.len();
    let mut correct_count = 0;

    let reviewed = questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let user_answer = answers.get(&index.to_string()).cloned();
            let is_correct = user_answer
                .as_deref()
                .is_some_and(|a| a.eq_ignore_ascii_case(&question.correct_answer));
            if is_correct {
                correct_count += 1;
            }
            ReviewedQuestion {
                question: question.clone(),
                user_answer,
                is_correct,
            }
        })
        .collect();

    let score_percent = if total_questions == 0 {
        0.0
    } else {
        correct_count as f64 / total_questions as f64 * 100.0
    };

    GradedAssessment {
        score_percent,
        correct_count,
        total_questions,
        reviewed,
    }
}

/// Applies the assessment outcome to the user's skill list, treating the
/// assessment topic as a skill name (case-insensitive match).
///
/// Existing skill: score ≥ 80 raises the level by 1 (capped at 5); score
/// below 60 lowers it by 0.5 (floored at 1) — half-step levels are the
/// documented behavior here, not an accident. A topic the user has never
/// practiced is inserted at 4 / 3 / 2 / 1 for score ≥ 80 / 60 / 40 / below.
pub fn apply_skill_update(skills: &mut Vec<SkillEntry>, topic: &str, score_percent: f64) {
    let topic = topic.trim();
    if topic.is_empty() {
        return;
    }

    if let Some(skill) = skills
        .iter_mut()
        .find(|s| s.name.eq_ignore_ascii_case(topic))
    {
        if score_percent >= 80.0 {
            skill.level = (skill.level + 1.0).min(5.0);
        } else if score_percent < 60.0 {
            skill.level = (skill.level - 0.5).max(1.0);
        }
        return;
    }

    let initial_level = if score_percent >= 80.0 {
        4.0
    } else if score_percent >= 60.0 {
        3.0
    } else if score_percent >= 40.0 {
        2.0
    } else {
        1.0
    };
    skills.push(SkillEntry {
        name: topic.to_string(),
        level: initial_level,
    });
}
