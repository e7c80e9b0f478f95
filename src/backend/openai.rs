//! OpenAI chat-completions extraction backend.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{BackendError, ExtractionBackend, parse_intent_reply, parse_split_reply, prompts};
use crate::intent::RawIntent;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Extraction backend talking to the OpenAI HTTP API.
#[derive(Clone)]
pub struct OpenAiBackend {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl OpenAiBackend {
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

    async fn chat(&self, system: &str, user: &str) -> Result<String, BackendError> {
        let api_key = self.api_key()?;
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: 0.2,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;
        debug!("OpenAI response: {body}");

        if let Some(err) = body.get("error") {
            let message = err
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown error")
                .to_string();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = serde_json::from_value(body)
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| BackendError::MalformedResponse("no choices in response".to_string()))
    }
}

#[async_trait]
impl ExtractionBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "OpenAI"
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
            .get(format!("{}/models", self.base_url))
            .bearer_auth(api_key)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                error!("error pinging OpenAI: {e}");
                false
            }
        }
    }

    async fn extract(&self, text: &str) -> Result<RawIntent, BackendError> {
        let content = self.chat(&prompts::extraction_prompt(), text).await?;
        parse_intent_reply(&content)
    }

    async fn split_text(&self, text: &str) -> Result<Vec<String>, BackendError> {
        let content = self
            .chat("You segment messages into tasks.", &prompts::split_prompt(text))
            .await?;
        parse_split_reply(&content)
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}
