//! Axum route handlers for the assistant chat API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::chat::prompts::assistant_prompt;
use crate::errors::AppError;
use crate::llm_client::{Content, GenerationConfig, RetryPolicy};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Model,
}

/// One prior turn of the conversation, oldest first.
#[derive(Debug, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /api/v1/chat
///
/// Replays the conversation history, then sends the persona-wrapped query.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let contents = build_contents(&request);
    let config = GenerationConfig {
        temperature: Some(0.7),
        top_p: Some(0.95),
        top_k: Some(40),
        ..Default::default()
    };

    let reply = state
        .llm
        .generate(&contents, Some(&config), RetryPolicy::INTERACTIVE)
        .await?;

    Ok(Json(ChatResponse { reply }))
}

fn build_contents(request: &ChatRequest) -> Vec<Content> {
    let mut contents: Vec<Content> = request
        .history
        .iter()
        .map(|turn| match turn.role {
            ChatRole::User => Content::user(turn.text.clone()),
            ChatRole::Model => Content::model(turn.text.clone()),
        })
        .collect();
    contents.push(Content::user(assistant_prompt(request.message.trim())));
    contents
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_contents_appends_persona_turn_last() {
        let request = ChatRequest {
            message: "what next?".to_string(),
            history: vec![
                ChatTurn {
                    role: ChatRole::User,
                    text: "hi".to_string(),
                },
                ChatTurn {
                    role: ChatRole::Model,
                    text: "hello!".to_string(),
                },
            ],
        };

        let contents = build_contents(&request);
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0].role, "user");
        assert_eq!(contents[1].role, "model");
        assert_eq!(contents[2].role, "user");
        assert!(contents[2].parts[0].text.contains("what next?"));
        assert!(contents[2].parts[0].text.contains("Maverick"));
    }

    #[test]
    fn test_chat_role_deserializes_snake_case() {
        let role: ChatRole = serde_json::from_str(r#""model""#).unwrap();
        assert_eq!(role, ChatRole::Model);
    }
}
