//! Google Gemini extraction backend.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{BackendError, ExtractionBackend, parse_intent_reply, parse_split_reply, prompts};
use crate::intent::RawIntent;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Extraction backend talking to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiBackend {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiBackend {
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

    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        let api_key = self.api_key()?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );

        let response = self
            .client
            .post(url)
            .timeout(REQUEST_TIMEOUT)
            .json(&json!({ "contents": [{ "parts": [{ "text": prompt }] }] }))
            .send()
            .await?;

        let status = response.status();
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;
        debug!("Gemini response: {body}");

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

        let parsed: GenerateResponse = serde_json::from_value(body)
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;
        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| BackendError::MalformedResponse("no candidates in response".to_string()))
    }
}

#[async_trait]
impl ExtractionBackend for GeminiBackend {
    fn name(&self) -> &str {
        "Gemini"
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
            .get(format!("{}/v1beta/models?key={}", self.base_url, api_key))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                error!("error pinging Gemini: {e}");
                false
            }
        }
    }

    async fn extract(&self, text: &str) -> Result<RawIntent, BackendError> {
        let prompt = format!(
            "{}\n\nUser message: '{text}'",
            prompts::extraction_prompt()
        );
        let content = self.generate(&prompt).await?;
        parse_intent_reply(&content)
    }

    async fn split_text(&self, text: &str) -> Result<Vec<String>, BackendError> {
        let content = self.generate(&prompts::split_prompt(text)).await?;
        parse_split_reply(&content)
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_without_key() {
        assert!(!GeminiBackend::new(None).enabled());
        assert!(GeminiBackend::new(Some("key".to_string())).enabled());
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "candidates": [{
                "content": { "parts": [{ "text": "[\"Buy milk\"]" }] }
            }]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.candidates[0].content.parts[0].text, "[\"Buy milk\"]");
    }
}
