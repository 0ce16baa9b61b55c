// Cross-cutting prompt fragments shared by the feature modules.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Instruction appended to prompts that must yield machine-readable output
/// even without a response schema hint.
pub const RAW_JSON_INSTRUCTION: &str = "\
    IMPORTANT: The response MUST be raw JSON. \
    Do NOT include any markdown formatting (like ```json) \
    or any extra text before or after the JSON.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_json_instruction_mentions_fences() {
        assert!(RAW_JSON_INSTRUCTION.contains("```json"));
    }
}
