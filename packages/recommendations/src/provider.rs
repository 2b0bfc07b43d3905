//! Chat-completions provider abstraction.
//!
//! Any `OpenAI`-compatible endpoint works (Groq by default, or a local
//! server via `AI_BASE_URL`).

use serde::{Deserialize, Serialize};

use crate::RecommendationError;

/// Groq's `OpenAI`-compatible chat completions endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const TEMPERATURE: f64 = 0.3;
pub const MAX_TOKENS: u32 = 1500;

pub const API_KEY_ENV: &str = "GROQ_API_KEY";
pub const BASE_URL_ENV: &str = "AI_BASE_URL";
pub const MODEL_ENV: &str = "AI_MODEL";

/// Something that turns a system prompt and a user prompt into text.
#[async_trait::async_trait]
pub trait RecommendationProvider: Send + Sync {
    /// Sends one completion request and returns the raw assistant text.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendationError`] if the request fails or the response
    /// carries no text.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, RecommendationError>;
}

/// `OpenAI`-compatible chat completions provider.
pub struct ChatCompletionsProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl ChatCompletionsProvider {
    #[must_use]
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Creates a provider from the environment.
///
/// `GROQ_API_KEY` is required. `AI_BASE_URL` and `AI_MODEL` take precedence
/// over `base_url` and `model`, which in turn override the defaults.
///
/// # Errors
///
/// Returns [`RecommendationError::MissingApiKey`] if no API key is set.
pub fn provider_from_env(
    base_url: Option<&str>,
    model: Option<&str>,
) -> Result<ChatCompletionsProvider, RecommendationError> {
    let api_key = env_var(API_KEY_ENV).ok_or(RecommendationError::MissingApiKey)?;
    let model = env_var(MODEL_ENV)
        .or_else(|| model.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let base_url = env_var(BASE_URL_ENV)
        .or_else(|| base_url.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    log::debug!("Using chat completions provider {base_url} with model {model}");
    Ok(ChatCompletionsProvider::new(api_key, model).with_base_url(base_url))
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatError {
    error: ChatErrorDetail,
}

#[derive(Deserialize)]
struct ChatErrorDetail {
    message: String,
}

impl<'a> ChatRequest<'a> {
    const fn new(model: &'a str, system: &'a str, prompt: &'a str) -> Self {
        Self {
            model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }
}

/// Pulls the assistant text out of a successful response body.
fn response_text(body: &str) -> Result<String, RecommendationError> {
    let response: ChatResponse = serde_json::from_str(body)?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or(RecommendationError::EmptyResponse)
}

#[async_trait::async_trait]
impl RecommendationProvider for ChatCompletionsProvider {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, RecommendationError> {
        let request = ChatRequest::new(&self.model, system, prompt);

        let resp = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ChatError>(&body)
                .map_or_else(|_| format!("HTTP {status}: {body}"), |e| e.error.message);
            return Err(RecommendationError::Provider { message });
        }

        response_text(&body)
    }
}
