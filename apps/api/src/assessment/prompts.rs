// All LLM prompt constants and response-schema hints for the Assessment module.

use serde_json::{json, Value};

use crate::llm_client::prompts::RAW_JSON_INSTRUCTION;

/// MCQ generation prompt. Replace `{topic}` before sending.
pub const MCQ_PROMPT_TEMPLATE: &str = r#"Generate a 20-question multiple-choice assessment on "{topic}". Each question should have a question text, exactly 4 distinct options (labeled A, B, C, D), clearly specify the correct option letter, and provide a concise explanation for the correct answer. Ensure the questions are relevant to the topic and vary in difficulty.

IMPORTANT: The 'options' array should ONLY contain the option text, WITHOUT the leading A., B., C., D. labels. The correct option letter should be in the 'correctAnswer' field.

Respond in a JSON array of objects. Each object should have:
- "questionText": string
- "options": array of 4 strings
- "correctAnswer": string (the correct option letter, e.g., "A", "B", "C", or "D")
- "explanation": string (concise explanation for the correct answer)"#;

/// Coding-challenge prompt. Replace `{difficulty}`, `{language}`,
/// `{topic_instruction}` before sending.
pub const CHALLENGE_PROMPT_TEMPLATE: &str = r#"Generate a {difficulty} difficulty coding challenge problem {topic_instruction} in {language}.
The problem should include:
1. A clear problem statement.
2. Input constraints.
3. Output format.
4. At least 2-3 example test cases with input and expected output.
5. The problem statement should be concise and clear.

The JSON structure MUST be exactly as follows:
{
  "title": "string",
  "problemStatement": "string",
  "language": "string",
  "difficulty": "string",
  "testCases": [
    { "input": "string", "expectedOutput": "string" }
  ]
}"#;

/// Code-evaluation prompt. Replace `{problem_json}` and `{user_code}`.
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"Act as an expert code reviewer and judge. Given the coding challenge below and the user's submitted solution, mentally execute the solution against each test case and evaluate its correctness, efficiency, and style.

Coding challenge (JSON):
{problem_json}

User's submitted code:
{user_code}

Respond with a JSON object of this exact shape:
{
  "overallFeedback": "string",
  "score": number (0-100),
  "testCaseResults": [
    { "input": "string", "expected": "string", "actual": "string", "passed": boolean, "feedback": "string" }
  ],
  "suggestionsForImprovement": "string (e.g., 'Consider edge cases', 'Improve efficiency')",
  "identifiedError": "string (description of the user's error)",
  "correctionNeeded": "string (actionable steps or corrected code snippet)"
}"#;

pub fn mcq_prompt(topic: &str) -> String {
    MCQ_PROMPT_TEMPLATE.replace("{topic}", topic)
}

pub fn challenge_prompt(language: &str, difficulty: &str, topic: Option<&str>) -> String {
    let topic_instruction = match topic {
        Some(t) if !t.trim().is_empty() => format!("on the topic of \"{}\"", t.trim()),
        _ => "on a diverse and interesting topic (e.g., data structures, algorithms, \
              string manipulation, recursion, object-oriented programming)"
            .to_string(),
    };
    format!(
        "{}\n\n{}",
        CHALLENGE_PROMPT_TEMPLATE
            .replace("{difficulty}", difficulty)
            .replace("{language}", language)
            .replace("{topic_instruction}", &topic_instruction),
        RAW_JSON_INSTRUCTION
    )
}

pub fn evaluation_prompt(problem_json: &str, user_code: &str) -> String {
    format!(
        "{}\n\n{}",
        EVALUATION_PROMPT_TEMPLATE
            .replace("{problem_json}", problem_json)
            .replace("{user_code}", user_code),
        RAW_JSON_INSTRUCTION
    )
}

/// Response schema for MCQ generation: array of four-option questions.
pub fn mcq_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "questionText": { "type": "STRING" },
                "options": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "minItems": 4,
                    "maxItems": 4
                },
                "correctAnswer": { "type": "STRING" },
                "explanation": { "type": "STRING" }
            },
            "required": ["questionText", "options", "correctAnswer", "explanation"]
        }
    })
}

pub fn challenge_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "problemStatement": { "type": "STRING" },
            "language": { "type": "STRING" },
            "difficulty": { "type": "STRING" },
            "testCases": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "input": { "type": "STRING" },
                        "expectedOutput": { "type": "STRING" }
                    }
                }
            }
        },
        "required": ["title", "problemStatement", "language", "difficulty", "testCases"]
    })
}

pub fn evaluation_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "overallFeedback": { "type": "STRING" },
            "score": { "type": "NUMBER" },
            "testCaseResults": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "input": { "type": "STRING" },
                        "expected": { "type": "STRING" },
                        "actual": { "type": "STRING" },
                        "passed": { "type": "BOOLEAN" },
                        "feedback": { "type": "STRING" }
                    }
                }
            },
            "suggestionsForImprovement": { "type": "STRING" },
            "identifiedError": { "type": "STRING" },
            "correctionNeeded": { "type": "STRING" }
        },
        "required": [
            "overallFeedback", "score", "testCaseResults",
            "suggestionsForImprovement", "identifiedError", "correctionNeeded"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mcq_prompt_substitutes_topic() {
        let prompt = mcq_prompt("Rust ownership");
        assert!(prompt.contains("\"Rust ownership\""));
        assert!(!prompt.contains("{topic}"));
    }

    #[test]
    fn test_challenge_prompt_with_explicit_topic() {
        let prompt = challenge_prompt("Python", "hard", Some("recursion"));
        assert!(prompt.contains("on the topic of \"recursion\""));
        assert!(prompt.contains("hard difficulty"));
        assert!(prompt.contains("in Python"));
    }

    #[test]
    fn test_challenge_prompt_without_topic_uses_diverse_default() {
        let prompt = challenge_prompt("Go", "easy", None);
        assert!(prompt.contains("diverse and interesting topic"));
    }

    #[test]
    fn test_blank_topic_falls_back_to_default() {
        let prompt = challenge_prompt("Go", "easy", Some("   "));
        assert!(prompt.contains("diverse and interesting topic"));
    }

    #[test]
    fn test_mcq_schema_pins_four_options() {
        let schema = mcq_schema();
        assert_eq!(schema["items"]["properties"]["options"]["minItems"], 4);
        assert_eq!(schema["items"]["properties"]["options"]["maxItems"], 4);
    }

    #[test]
    fn test_evaluation_prompt_embeds_problem_and_code() {
        let prompt = evaluation_prompt("{\"title\":\"FizzBuzz\"}", "print(1)");
        assert!(prompt.contains("FizzBuzz"));
        assert!(prompt.contains("print(1)"));
    }
}
