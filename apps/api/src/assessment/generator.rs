//! LLM-backed generators: MCQ assessments, coding challenges, code evaluation.
//!
//! Types here mirror the model's structured-output schema, so they keep the
//! camelCase field names of the wire format end to end.

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::assessment::prompts::{
    challenge_prompt, challenge_schema, evaluation_prompt, evaluation_schema, mcq_prompt,
    mcq_schema,
};
use crate::errors::AppError;
use crate::llm_client::{GeminiClient, GenerationConfig, RetryPolicy};

// ────────────────────────────────────────────────────────────────────────────
// LLM output shapes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McqQuestion {
    pub question_text: String,
    /// Exactly four option texts, without A./B./C./D. labels.
    pub options: Vec<String>,
    /// The correct option letter: "A", "B", "C", or "D".
    pub correct_answer: String,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeTestCase {
    pub input: String,
    pub expected_output: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeProblem {
    pub title: String,
    pub problem_statement: String,
    pub language: String,
    pub difficulty: String,
    pub test_cases: Vec<ChallengeTestCase>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseResult {
    pub input: String,
    pub expected: String,
    pub actual: String,
    pub passed: bool,
    pub feedback: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeEvaluation {
    pub overall_feedback: String,
    /// 0–100.
    pub score: f64,
    pub test_case_results: Vec<TestCaseResult>,
    pub suggestions_for_improvement: String,
    pub identified_error: String,
    pub correction_needed: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Generators
// ────────────────────────────────────────────────────────────────────────────

/// Generates a 20-question MCQ assessment on `topic`.
pub async fn generate_assessment(
    llm: &GeminiClient,
    topic: &str,
) -> Result<Vec<McqQuestion>, AppError> {
    let config = GenerationConfig::json(mcq_schema()).with_temperature(0.7);
    let questions: Vec<McqQuestion> = llm
        .generate_json(&mcq_prompt(topic), Some(&config), RetryPolicy::GENERATION)
        .await?;

    if questions.is_empty() {
        return Err(AppError::Internal(anyhow!(
            "model returned an empty assessment for topic '{topic}'"
        )));
    }

    Ok(questions)
}

/// Generates a single coding challenge.
pub async fn generate_challenge(
    llm: &GeminiClient,
    language: &str,
    difficulty: &str,
    topic: Option<&str>,
) -> Result<ChallengeProblem, AppError> {
    let config = GenerationConfig::json(challenge_schema()).with_temperature(0.7);
    let problem = llm
        .generate_json(
            &challenge_prompt(language, difficulty, topic),
            Some(&config),
            RetryPolicy::GENERATION,
        )
        .await?;
    Ok(problem)
}

/// Evaluates a submitted solution against a challenge. The model executes the
/// code mentally; a lower temperature keeps the verdict consistent.
pub async fn evaluate_code(
    llm: &GeminiClient,
    problem: &ChallengeProblem,
    user_code: &str,
) -> Result<CodeEvaluation, AppError> {
    let problem_json = serde_json::to_string(problem).map_err(|e| AppError::Internal(e.into()))?;
    let config = GenerationConfig::json(evaluation_schema()).with_temperature(0.5);

    let evaluation = llm
        .generate_json(
            &evaluation_prompt(&problem_json, user_code),
            Some(&config),
            RetryPolicy::GENERATION,
        )
        .await?;
    Ok(evaluation)
}
