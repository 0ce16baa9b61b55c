// All LLM prompt constants and response-schema hints for the Learning module.

use serde_json::{json, Value};

/// Course-suggestion prompt. Replace `{topic}` before sending.
pub const SUGGEST_PROMPT_TEMPLATE: &str = r#"Suggest 5 unique learning course titles and brief descriptions (1-2 sentences) on the topic "{topic}". Respond in a JSON array of objects, each with "title" and "description" fields."#;

/// Long-form course content prompt. Replace `{title}` before sending.
pub const COURSE_CONTENT_PROMPT_TEMPLATE: &str = r#"Provide detailed learning content for a course titled "{title}". Structure the content with clear headings, subheadings, and bullet points. Make it comprehensive, engaging, and suitable for self-study. Aim for a response length of 500-800 words."#;

/// Summary prompt. Replace `{text}` before sending.
pub const SUMMARIZE_PROMPT_TEMPLATE: &str =
    "Summarize the following learning content concisely (2-3 sentences): \n\n {text}";

pub fn suggest_prompt(topic: &str) -> String {
    SUGGEST_PROMPT_TEMPLATE.replace("{topic}", topic)
}

pub fn course_content_prompt(title: &str) -> String {
    COURSE_CONTENT_PROMPT_TEMPLATE.replace("{title}", title)
}

pub fn summarize_prompt(text: &str) -> String {
    SUMMARIZE_PROMPT_TEMPLATE.replace("{text}", text)
}

pub fn suggestions_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "description": { "type": "STRING" }
            },
            "propertyOrdering": ["title", "description"]
        }
    })
}
