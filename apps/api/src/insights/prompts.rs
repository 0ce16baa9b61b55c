// All LLM prompt constants and response-schema hints for the Insights module.

use serde_json::{json, Value};

/// Ideal-skills prompt. Replace `{role}` before sending.
pub const IDEAL_SKILLS_PROMPT_TEMPLATE: &str = r#"For the job role "{role}", identify the 5-7 most crucial skills and their typical proficiency levels. Assign a numerical proficiency score from 0 (Novice) to 5 (Expert) for each skill. Provide the response as a JSON array of objects, where each object has "skillName" (string) and "proficiency" (integer from 0-5)."#;

/// JD analysis prompt. Replace `{user_skills}` and `{jd_text}` before sending.
pub const JD_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the following job description and provide:
1. A brief summary of the job.
2. A list of key required skills for this job.
3. Compare these required skills with the user's current skills: "{user_skills}".
4. Identify any skill gaps and suggest specific areas for improvement or learning modules.

Format the response as a JSON object with the following structure:
{
  "jobSummary": "string",
  "requiredSkills": ["skill1", "skill2"],
  "skillGaps": ["skill_gap1", "skill_gap2"],
  "improvementSuggestions": "string"
}

Job Description:
{jd_text}"#;

pub fn ideal_skills_prompt(role: &str) -> String {
    IDEAL_SKILLS_PROMPT_TEMPLATE.replace("{role}", role)
}

pub fn jd_analysis_prompt(user_skills: &str, jd_text: &str) -> String {
    JD_ANALYSIS_PROMPT_TEMPLATE
        .replace("{user_skills}", user_skills)
        .replace("{jd_text}", jd_text)
}

pub fn ideal_skills_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "skillName": { "type": "STRING" },
                "proficiency": { "type": "NUMBER" }
            },
            "propertyOrdering": ["skillName", "proficiency"]
        }
    })
}

pub fn jd_analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "jobSummary": { "type": "STRING" },
            "requiredSkills": { "type": "ARRAY", "items": { "type": "STRING" } },
            "skillGaps": { "type": "ARRAY", "items": { "type": "STRING" } },
            "improvementSuggestions": { "type": "STRING" }
        },
        "propertyOrdering": [
            "jobSummary", "requiredSkills", "skillGaps", "improvementSuggestions"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ideal_skills_prompt_substitutes_role() {
        let prompt = ideal_skills_prompt("Data Engineer");
        assert!(prompt.contains("\"Data Engineer\""));
        assert!(!prompt.contains("{role}"));
    }

    #[test]
    fn test_jd_analysis_prompt_embeds_skills_and_jd() {
        let prompt = jd_analysis_prompt("Rust (Level: 4)", "We need a backend engineer.");
        assert!(prompt.contains("Rust (Level: 4)"));
        assert!(prompt.contains("We need a backend engineer."));
    }
}
