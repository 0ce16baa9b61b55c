/// Persona prompt for the assistant. The current query is substituted for
/// `{query}` and sent as the final user turn after the history.
pub const ASSISTANT_PROMPT_TEMPLATE: &str = "You are Maverick, an AI assistant for career \
    development. Respond to the user's query regarding their career, skills, learning, or \
    job search. Be helpful, concise, and professional. Current user query: {query}";

pub fn assistant_prompt(query: &str) -> String {
    ASSISTANT_PROMPT_TEMPLATE.replace("{query}", query)
}
