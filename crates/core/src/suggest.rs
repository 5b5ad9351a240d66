//! AI suggestion client
//!
//! Calls a hosted chat-completion model to suggest a continuation for a
//! partially typed todo. This is an enhancement, not a dependency of
//! correctness: every failure path returns an empty suggestion instead of an
//! error.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

const SUGGEST_TIMEOUT: Duration = Duration::from_secs(10);

const SYSTEM_PROMPT: &str = "You are a helpful assistant that suggests completions \
for todo item descriptions. Reply with only the text that continues the partial \
description, nothing else.";

/// Configuration for the suggestion upstream
#[derive(Debug, Clone)]
pub struct SuggestConfig {
    /// Base URL of an OpenAI-compatible API, e.g. `https://api.openai.com/v1`
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
}

impl SuggestConfig {
    /// Read configuration from the environment
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("BLOOM_SUGGEST_URL").ok(),
            api_key: std::env::var("BLOOM_SUGGEST_API_KEY").ok(),
            model: std::env::var("BLOOM_SUGGEST_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Client for the hosted text-completion model
pub struct SuggestClient {
    config: SuggestConfig,
    http: reqwest::Client,
}

impl SuggestClient {
    pub fn new(config: SuggestConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(SUGGEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self { config, http }
    }

    /// Suggest a continuation for a partial todo description.
    ///
    /// Returns an empty string for empty input, missing configuration, or any
    /// upstream failure (timeout, non-2xx status, malformed body).
    pub async fn complete(&self, partial: &str) -> String {
        if partial.trim().is_empty() {
            return String::new();
        }

        let Some(base_url) = &self.config.base_url else {
            debug!("Suggestion upstream not configured, returning empty completion");
            return String::new();
        };

        let mut request = self
            .http
            .post(format!("{}/chat/completions", base_url.trim_end_matches('/')))
            .json(&serde_json::json!({
                "model": self.config.model,
                "messages": [
                    {"role": "system", "content": SYSTEM_PROMPT},
                    {"role": "user", "content": partial},
                ],
                "max_tokens": 60,
                "temperature": 0.4,
            }));

        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let resp = match request.send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("Suggestion request failed: {}", e);
                return String::new();
            }
        };

        if !resp.status().is_success() {
            warn!("Suggestion upstream returned HTTP {}", resp.status());
            return String::new();
        }

        let body: ChatResponse = match resp.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to parse suggestion response: {}", e);
                return String::new();
            }
        };

        body.choices
            .first()
            .map(|choice| strip_echo(partial, &choice.message.content))
            .unwrap_or_default()
    }
}

/// Models sometimes repeat the prompt before continuing it; keep only the
/// continuation so the caller can append it verbatim.
fn strip_echo(partial: &str, completion: &str) -> String {
    let completion = completion.trim_end();
    completion
        .strip_prefix(partial)
        .unwrap_or(completion)
        .to_string()
}
