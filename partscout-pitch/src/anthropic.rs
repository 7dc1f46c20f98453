//! HTTP client for the Anthropic Messages API.

use serde::{Deserialize, Serialize};
use tokio::time::Duration;

use crate::error::PitchError;

const BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-3-5-haiku-20241022";
const MAX_TOKENS: u32 = 500;

/// Client for generating pitch text via the Messages API.
pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, PitchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Send a single user prompt and return the first text block of the reply.
    pub async fn generate(&self, prompt: &str) -> Result<String, PitchError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let resp = self
            .http
            .post(format!("{}/v1/messages", BASE_URL))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(PitchError::InvalidCredentials(
                "Anthropic API key rejected".to_string(),
            ));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PitchError::RateLimit);
        }
        if !status.is_success() {
            return Err(PitchError::Api(format!(
                "Anthropic API returned {}: {}",
                status,
                &text[..text.len().min(200)]
            )));
        }

        let response: MessagesResponse = serde_json::from_str(&text).map_err(|e| {
            PitchError::Api(format!(
                "Failed to parse Messages response: {e}. Response: {}",
                &text[..text.len().min(200)]
            ))
        })?;

        response
            .content
            .into_iter()
            .map(|block| block.text)
            .find(|t| !t.is_empty())
            .ok_or_else(|| PitchError::Api("Messages response carried no text".to_string()))
    }

    /// Validate the API key with a cheap models listing call.
    pub async fn validate(&self) -> Result<(), PitchError> {
        let resp = self
            .http
            .get(format!("{}/v1/models", BASE_URL))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(PitchError::InvalidCredentials(
                "Anthropic API key rejected".to_string(),
            ));
        }
        if !status.is_success() {
            let text = resp.text().await?;
            return Err(PitchError::Api(format!(
                "Anthropic API returned {}: {}",
                status,
                &text[..text.len().min(200)]
            )));
        }
        Ok(())
    }
}
