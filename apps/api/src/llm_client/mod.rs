/// LLM Client — the single point of entry for all Gemini API calls in Maverick.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All LLM interactions MUST go through this module. The half-dozen inline
/// retry loops of the legacy frontend collapse into `GeminiClient::generate`.
///
/// Retry contract: HTTP 429 is the only retried condition. The wait before
/// retry `k` (zero-based) is `base_delay * 2^k` — no jitter. Every other
/// failure (transport error, non-2xx status, undecodable body) is terminal
/// and reported on the first attempt.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

use crate::config::Config;

const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("network error: {0}")]
    Network(anyhow::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("malformed LLM response: {reason}")]
    Decode {
        reason: String,
        /// The undecodable text, preserved verbatim for diagnostics.
        raw: String,
    },
}

/// Retry knobs for a single call. Observed call sites use 3–5 attempts with
/// a 1–2 s base delay; interactive endpoints retry harder than batch ones.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Interactive endpoints: chat, insights. 5 attempts, 1 s base.
    pub const INTERACTIVE: RetryPolicy = RetryPolicy::new(5, Duration::from_millis(1000));

    /// Heavier generation endpoints: assessments, learning content. 3 attempts, 2 s base.
    pub const GENERATION: RetryPolicy = RetryPolicy::new(3, Duration::from_millis(2000));
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types — Gemini generateContent request/response envelope
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Part {
    pub text: String,
}

/// One turn of a Gemini conversation. Roles are "user" and "model".
#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub role: &'static str,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user",
            parts: vec![Part { text: text.into() }],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: "model",
            parts: vec![Part { text: text.into() }],
        }
    }
}

/// `generationConfig` knobs. Only set fields are serialized.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
}

impl GenerationConfig {
    /// Structured-output config: JSON mime type plus a response schema hint.
    pub fn json(schema: Value) -> Self {
        Self {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema),
            ..Default::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: &'a [Content],
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<&'a GenerationConfig>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiApiError {
    error: GeminiApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiApiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Transport seam
// ────────────────────────────────────────────────────────────────────────────

/// A raw HTTP exchange result: status plus body text, undecoded.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// The HTTP seam. `GeminiClient` drives the retry state machine against this
/// trait; tests substitute a scripted transport for deterministic coverage.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, url: &str, body: &Value) -> anyhow::Result<RawResponse>;
}

/// Production transport backed by reqwest with a hard per-attempt timeout.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(ATTEMPT_TIMEOUT)
                .build()?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, body: &Value) -> anyhow::Result<RawResponse> {
        let response = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single Gemini client shared by all services in Maverick.
/// Owns no per-call state: each invocation carries its own retry counter.
#[derive(Clone)]
pub struct GeminiClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            transport: Arc::new(HttpTransport::new()?),
            base_url: config.gemini_base_url.clone(),
            model: config.gemini_model.clone(),
            api_key: config.gemini_api_key.clone(),
        })
    }

    /// Test constructor: inject a transport directly.
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        // The credential rides as a query parameter — Gemini wire convention.
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    /// Sends a full conversation and returns the first candidate's text.
    ///
    /// Retries only on 429, waiting `base_delay * 2^attempt` between sends,
    /// for at most `policy.max_retries` sends total.
    pub async fn generate(
        &self,
        contents: &[Content],
        config: Option<&GenerationConfig>,
        policy: RetryPolicy,
    ) -> Result<String, LlmError> {
        let url = self.endpoint();
        let body = serde_json::to_value(GeminiRequest {
            contents,
            generation_config: config,
        })
        .map_err(|e| LlmError::Decode {
            reason: format!("failed to serialize request: {e}"),
            raw: String::new(),
        })?;

        let mut attempt: u32 = 0;

        loop {
            let response = self
                .transport
                .post_json(&url, &body)
                .await
                .map_err(LlmError::Network)?;

            if response.status == 429 {
                let delay = policy.base_delay * 2u32.pow(attempt);
                warn!(
                    "Gemini rate limit hit (attempt {}/{}), retrying in {}ms",
                    attempt + 1,
                    policy.max_retries,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                if attempt >= policy.max_retries {
                    return Err(LlmError::RateLimited { retries: attempt });
                }
                continue;
            }

            if !(200..300).contains(&response.status) {
                // Prefer the structured error message; fall back to the raw body.
                let message = serde_json::from_str::<GeminiApiError>(&response.body)
                    .map(|e| e.error.message)
                    .unwrap_or(response.body);
                return Err(LlmError::Api {
                    status: response.status,
                    message,
                });
            }

            let text = extract_candidate_text(&response.body)?;
            debug!("Gemini call succeeded ({} chars)", text.len());
            return Ok(text);
        }
    }

    /// Single-prompt convenience wrapper around `generate`.
    pub async fn generate_text(
        &self,
        prompt: &str,
        config: Option<&GenerationConfig>,
        policy: RetryPolicy,
    ) -> Result<String, LlmError> {
        self.generate(&[Content::user(prompt)], config, policy).await
    }

    /// Calls the LLM and deserializes the candidate text as JSON.
    /// The prompt (or response schema) must steer the model toward valid JSON.
    pub async fn generate_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        config: Option<&GenerationConfig>,
        policy: RetryPolicy,
    ) -> Result<T, LlmError> {
        let text = self.generate_text(prompt, config, policy).await?;

        let payload = extract_json_payload(&text);
        serde_json::from_str(payload).map_err(|e| LlmError::Decode {
            reason: format!("candidate text is not valid JSON: {e}"),
            raw: text.clone(),
        })
    }
}

/// Pulls the first candidate's first text part out of the response envelope.
/// Anything short of that shape — unparseable body, empty candidate list,
/// missing parts — is a `Decode` error carrying the raw body.
fn extract_candidate_text(body: &str) -> Result<String, LlmError> {
    let envelope: GeminiResponse =
        serde_json::from_str(body).map_err(|e| LlmError::Decode {
            reason: format!("response body is not valid JSON: {e}"),
            raw: body.to_string(),
        })?;

    envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or_else(|| LlmError::Decode {
            reason: "response contains no candidate text".to_string(),
            raw: body.to_string(),
        })
}

/// Best-effort extraction of a JSON payload from model output: strips
/// markdown code fences, then falls back to the outermost `{...}` / `[...]`
/// block when the model wraps JSON in prose.
fn extract_json_payload(text: &str) -> &str {
    let text = strip_json_fences(text);

    let trimmed = text.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return trimmed;
    }

    let object = outermost_block(text, '{', '}');
    let array = outermost_block(text, '[', ']');
    match (object, array) {
        (Some(o), Some(a)) => {
            if o.0 < a.0 {
                &text[o.0..o.1]
            } else {
                &text[a.0..a.1]
            }
        }
        (Some(o), None) => &text[o.0..o.1],
        (None, Some(a)) => &text[a.0..a.1],
        (None, None) => trimmed,
    }
}

fn outermost_block(text: &str, open: char, close: char) -> Option<(usize, usize)> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end > start {
        Some((start, end + close.len_utf8()))
    } else {
        None
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Test doubles for the transport seam, shared by modules that exercise
/// LLM-backed paths without a network.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Deterministic transport: replays a fixed script of responses.
    /// Once the script is exhausted the final response repeats.
    pub struct ScriptedTransport {
        script: Mutex<Vec<RawResponse>>,
        calls: AtomicUsize,
    }

    impl ScriptedTransport {
        pub fn new(script: Vec<(u16, &str)>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(
                    script
                        .into_iter()
                        .map(|(status, body)| RawResponse {
                            status,
                            body: body.to_string(),
                        })
                        .collect(),
                ),
                calls: AtomicUsize::new(0),
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn post_json(&self, _url: &str, _body: &Value) -> anyhow::Result<RawResponse> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let script = self.script.lock().unwrap();
            let idx = n.min(script.len() - 1);
            Ok(script[idx].clone())
        }
    }

    /// A Gemini response envelope wrapping a single candidate text.
    pub fn envelope(text: &str) -> String {
        serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": text}]}}]
        })
        .to_string()
    }

    pub fn test_client(transport: Arc<ScriptedTransport>) -> GeminiClient {
        GeminiClient::with_transport(transport, "http://gemini.test/v1beta", "test-model", "k")
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{envelope, test_client as client, ScriptedTransport};
    use super::*;
    use serde_json::json;
    use tokio::time::Instant;

    const OK_BODY: &str =
        r#"{"candidates":[{"content":{"parts":[{"text":"{\"ok\":true}"}]}}]}"#;

    #[tokio::test(start_paused = true)]
    async fn test_retries_twice_on_429_then_succeeds() {
        let transport =
            ScriptedTransport::new(vec![(429, ""), (429, ""), (200, OK_BODY)]);
        let llm = client(transport.clone());
        let policy = RetryPolicy::new(3, Duration::from_millis(1000));

        let start = Instant::now();
        let value: Value = llm.generate_json("prompt", None, policy).await.unwrap();

        assert_eq!(value, json!({"ok": true}));
        assert_eq!(transport.calls(), 3);
        // Backoff doubles from the base delay: 1000ms then 2000ms.
        assert_eq!(start.elapsed(), Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_return_rate_limited() {
        let transport = ScriptedTransport::new(vec![(429, "")]);
        let llm = client(transport.clone());
        let policy = RetryPolicy::new(3, Duration::from_millis(1000));

        let start = Instant::now();
        let err = llm
            .generate_text("prompt", None, policy)
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::RateLimited { retries: 3 }));
        assert_eq!(transport.calls(), 3);
        // Delays 1000, 2000, 4000 — the final wait happens before giving up.
        assert_eq!(start.elapsed(), Duration::from_millis(7000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_error_is_terminal_with_no_retry() {
        let transport =
            ScriptedTransport::new(vec![(500, r#"{"error":{"message":"boom"}}"#)]);
        let llm = client(transport.clone());

        let start = Instant::now();
        let err = llm
            .generate_text("prompt", None, RetryPolicy::INTERACTIVE)
            .await
            .unwrap_err();

        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        assert_eq!(transport.calls(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_unstructured_error_body_is_passed_through() {
        let transport = ScriptedTransport::new(vec![(403, "forbidden")]);
        let llm = client(transport);

        let err = llm
            .generate_text("prompt", None, RetryPolicy::INTERACTIVE)
            .await
            .unwrap_err();

        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "forbidden");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_error_with_raw_preserved() {
        let transport = ScriptedTransport::new(vec![(200, "not json")]);
        let llm = client(transport.clone());

        let err = llm
            .generate_text("prompt", None, RetryPolicy::INTERACTIVE)
            .await
            .unwrap_err();

        match err {
            LlmError::Decode { raw, .. } => assert_eq!(raw, "not json"),
            other => panic!("expected Decode error, got {other:?}"),
        }
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_candidate_list_is_decode_error() {
        let transport = ScriptedTransport::new(vec![(200, r#"{"candidates":[]}"#)]);
        let llm = client(transport);

        let err = llm
            .generate_text("prompt", None, RetryPolicy::INTERACTIVE)
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_candidate_text_that_is_not_json_preserves_raw() {
        let body = envelope("sorry, I can't help with that");
        let transport = ScriptedTransport::new(vec![(200, &body)]);
        let llm = client(transport);

        let err = llm
            .generate_json::<Value>("prompt", None, RetryPolicy::INTERACTIVE)
            .await
            .unwrap_err();

        match err {
            LlmError::Decode { raw, .. } => {
                assert_eq!(raw, "sorry, I can't help with that");
            }
            other => panic!("expected Decode error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_identical_inputs_yield_identical_outcomes() {
        let run = || async {
            let transport = ScriptedTransport::new(vec![(200, OK_BODY)]);
            let llm = client(transport);
            llm.generate_json::<Value>("prompt", None, RetryPolicy::GENERATION)
                .await
        };

        let first = run().await.unwrap();
        let second = run().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_fenced_candidate_json_is_parsed() {
        let body = envelope("```json\n{\"title\": \"Rust Basics\"}\n```");
        let transport = ScriptedTransport::new(vec![(200, &body)]);
        let llm = client(transport);

        let value: Value = llm
            .generate_json("prompt", None, RetryPolicy::GENERATION)
            .await
            .unwrap();
        assert_eq!(value, json!({"title": "Rust Basics"}));
    }

    #[tokio::test]
    async fn test_json_wrapped_in_prose_is_extracted() {
        let body = envelope("Here is the result: {\"score\": 85} — good luck!");
        let transport = ScriptedTransport::new(vec![(200, &body)]);
        let llm = client(transport);

        let value: Value = llm
            .generate_json("prompt", None, RetryPolicy::GENERATION)
            .await
            .unwrap();
        assert_eq!(value, json!({"score": 85}));
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_extract_json_payload_prefers_earliest_block() {
        let input = "prefix [1, 2] and {\"a\": 1}";
        assert_eq!(extract_json_payload(input), "[1, 2]");
    }

    #[test]
    fn test_generation_config_serializes_camel_case() {
        let config = GenerationConfig::json(json!({"type": "ARRAY"})).with_temperature(0.7);
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["responseMimeType"], "application/json");
        assert_eq!(value["responseSchema"]["type"], "ARRAY");
        assert_eq!(value["temperature"], 0.7);
        assert!(value.get("topP").is_none());
    }

    #[test]
    fn test_endpoint_embeds_model_and_key() {
        let transport = ScriptedTransport::new(vec![(200, OK_BODY)]);
        let llm = client(transport);
        assert_eq!(
            llm.endpoint(),
            "http://gemini.test/v1beta/models/test-model:generateContent?key=k"
        );
    }
}
