// Prompt for the talent-scout recommendation flow.

/// Replace `{employees}` with a JSON array of candidate summaries and
/// `{role_description}` with the target role before sending.
pub const SCOUT_PROMPT_TEMPLATE: &str = r#"Task: Act as a talent scout. Given a target role description, identify the best-fitting employees from a provided list. Employee Data (JSON array): {employees} Instructions: 1. Analyze the "Target Role Description" to infer the required skills. 2. Match these skills against the "skills" array of each employee. 3. Recommend the top 3 to 5 employees who are the best fit. 4. For each recommended employee, provide their 'id', 'email', 'fullName', a list of their 'matchingSkills' (skills that match the inferred role requirements), and a 'score' (a number from 0-100 indicating how well they fit the role). 5. The score should be based on the number of matching skills and their proficiency levels. 6. Output the result as a raw JSON array of objects. Do not include any additional text, markdown, or explanations before or after the JSON.

Target Role Description: {role_description}"#;

pub fn scout_prompt(employees_json: &str, role_description: &str) -> String {
    SCOUT_PROMPT_TEMPLATE
        .replace("{employees}", employees_json)
        .replace("{role_description}", role_description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scout_prompt_substitutes_both_slots() {
        let prompt = scout_prompt(r#"[{"id":"1"}]"#, "Backend Engineer");
        assert!(prompt.contains(r#"[{"id":"1"}]"#));
        assert!(prompt.contains("Backend Engineer"));
        assert!(!prompt.contains("{employees}"));
        assert!(!prompt.contains("{role_description}"));
    }
}
