//! Anthropic messages-API extraction backend.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{BackendError, ExtractionBackend, parse_intent_reply, parse_split_reply, prompts};
use crate::intent::RawIntent;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-3-5-haiku-latest";
const API_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Extraction backend talking to the Anthropic HTTP API.
#[derive(Clone)]
pub struct AnthropicBackend {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl AnthropicBackend {
    /// Creates the backend; a `None` key leaves it disabled.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Overrides the API base URL, mainly for tests against a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn api_key(&self) -> Result<&str, BackendError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| BackendError::MissingCredentials(self.name().to_string()))
    }

    async fn message(&self, system: &str, user: &str) -> Result<String, BackendError> {
        let api_key = self.api_key()?;
        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: 1024,
            system: system.to_string(),
            messages: vec![UserMessage {
                role: "user".to_string(),
                content: user.to_string(),
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;
        debug!("Anthropic response: {body}");

        if body.get("type").and_then(|t| t.as_str()) == Some("error") {
            let message = body
                .pointer("/error/message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown error")
                .to_string();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MessagesResponse = serde_json::from_value(body)
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;
        parsed
            .content
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or_else(|| BackendError::MalformedResponse("no content in response".to_string()))
    }
}

#[async_trait]
impl ExtractionBackend for AnthropicBackend {
    fn name(&self) -> &str {
        "Anthropic"
    }

    fn enabled(&self) -> bool {
        self.api_key.is_some()
    }

    async fn check_connection(&self) -> bool {
        let Ok(api_key) = self.api_key() else {
            return false;
        };
        match self
            .client
            .get(format!("{}/v1/models", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                error!("error pinging Anthropic: {e}");
                false
            }
        }
    }

    async fn extract(&self, text: &str) -> Result<RawIntent, BackendError> {
        let content = self.message(&prompts::extraction_prompt(), text).await?;
        parse_intent_reply(&content)
    }

    async fn split_text(&self, text: &str) -> Result<Vec<String>, BackendError> {
        let content = self
            .message("You segment messages into tasks.", &prompts::split_prompt(text))
            .await?;
        parse_split_reply(&content)
    }
}

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<UserMessage>,
}

#[derive(Serialize)]
struct UserMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}
