//! LLM agent module for abstractive summarization.
//!
//! The pipeline depends on the [`Summarizer`] capability only. Gemini is reached through
//! rstructor, OpenAI-compatible chat endpoints through reqwest. There is no retry or
//! backoff here; a failed call is returned to the caller as is.

use crate::config::{Config, ConfigError};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use rstructor::{GeminiClient, GeminiModel, LLMClient};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default timeout for LLM requests
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("LLM request failed: {0}")]
    RequestFailed(String),
    #[error("LLM rate limit or quota exceeded: {0}")]
    RateLimited(String),
    #[error("failed to parse response: {0}")]
    ParseError(String),
    #[error("LLM returned an empty response")]
    EmptyResponse,
    #[error("configuration error: {0}")]
    ConfigError(#[from] ConfigError),
}

/// A hosted model that turns a prompt into summary text.
pub trait Summarizer {
    fn summarize(&self, prompt: &str) -> impl Future<Output = Result<String, AgentError>>;
}

impl<S: Summarizer> Summarizer for &S {
    async fn summarize(&self, prompt: &str) -> Result<String, AgentError> {
        (**self).summarize(prompt).await
    }
}

/// Summarize `text` with `summarizer`, placing `instruction_prompt` before it.
pub async fn summarize_with<S: Summarizer>(
    summarizer: &S,
    text: &str,
    instruction_prompt: &str,
) -> Result<String, AgentError> {
    let prompt = format!("{}{}", instruction_prompt, text);
    debug!(chars = prompt.len(), "sending prompt to summarizer");
    let summary = summarizer.summarize(&prompt).await?;
    if summary.trim().is_empty() {
        return Err(AgentError::EmptyResponse);
    }
    Ok(summary)
}

/// Gemini summarizer backed by rstructor
pub struct GeminiSummarizer {
    client: GeminiClient,
}

impl GeminiSummarizer {
    pub fn new(api_key: &str, model: &str) -> Result<Self, AgentError> {
        let client = GeminiClient::new(api_key)
            .map_err(|e| AgentError::RequestFailed(e.to_string()))?
            .model(parse_gemini_model(model));
        Ok(Self { client })
    }
}

impl Summarizer for GeminiSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<String, AgentError> {
        let result = self
            .client
            .generate_with_metadata(prompt)
            .await
            .map_err(|e| classify_failure(e.to_string()))?;
        Ok(result.text)
    }
}

/// Summarizer for OpenAI-compatible chat completion endpoints
pub struct OpenAiSummarizer {
    client: Client,
    endpoint: String,
    model: String,
}

impl OpenAiSummarizer {
    pub fn new(api_key: &str, model: &str, base_url: Option<&str>) -> Result<Self, AgentError> {
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey("openai".to_string()).into());
        }
        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|_| AgentError::RequestFailed("invalid OpenAI API key".to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| AgentError::RequestFailed(e.to_string()))?;
        let base = base_url.unwrap_or(OPENAI_BASE_URL);
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base.trim_end_matches('/')),
            model: model.to_string(),
        })
    }
}

impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<String, AgentError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::RequestFailed(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            let message = format!("{}: {}", status, text);
            return Err(if status == StatusCode::TOO_MANY_REQUESTS {
                AgentError::RateLimited(message)
            } else {
                AgentError::RequestFailed(message)
            });
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| AgentError::ParseError(e.to_string()))?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(AgentError::EmptyResponse)
    }
}

/// Summarizer selected by the configured provider
pub enum ProviderSummarizer {
    Gemini(GeminiSummarizer),
    OpenAi(OpenAiSummarizer),
}

impl ProviderSummarizer {
    /// Build the summarizer named by `config.agent.provider`
    pub fn from_config(config: &Config) -> Result<Self, AgentError> {
        let api_key = config.api_key()?;
        let model = config.agent.model.as_str();
        info!(provider = %config.agent.provider, model, "using summarizer");
        match config.agent.provider.as_str() {
            "gemini" => Ok(Self::Gemini(GeminiSummarizer::new(api_key, model)?)),
            "openai" => Ok(Self::OpenAi(OpenAiSummarizer::new(
                api_key,
                model,
                config.agent.base_url.as_deref(),
            )?)),
            other => Err(ConfigError::UnknownProvider(other.to_string()).into()),
        }
    }
}

impl Summarizer for ProviderSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<String, AgentError> {
        match self {
            Self::Gemini(s) => s.summarize(prompt).await,
            Self::OpenAi(s) => s.summarize(prompt).await,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}

/// Map a client error message onto rate-limit or request failure
fn classify_failure(message: String) -> AgentError {
    let lower = message.to_lowercase();
    if lower.contains("429") || lower.contains("quota") || lower.contains("rate limit") {
        AgentError::RateLimited(message)
    } else {
        AgentError::RequestFailed(message)
    }
}

/// Parse a model string into a GeminiModel
fn parse_gemini_model(model: &str) -> GeminiModel {
    match model {
        "gemini-2.0-flash" => GeminiModel::Gemini20Flash,
        "gemini-2.5-flash" => GeminiModel::Gemini25Flash,
        "gemini-2.5-pro" => GeminiModel::Gemini25Pro,
        _ => GeminiModel::Gemini20Flash, // Default
    }
}
