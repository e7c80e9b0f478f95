//! Extraction backends.
//!
//! An [`ExtractionBackend`] turns one phrase into an unvalidated
//! [`RawIntent`](crate::intent::RawIntent). Zero or more remote backends may
//! be configured with credentials; the deterministic [`FallbackParser`] is
//! always available and never fails, so the [`BackendSelector`] can always
//! produce a usable result.

pub mod error;
pub mod fallback;
pub mod prompts;
pub mod selector;

pub mod anthropic;
pub mod gemini;
pub mod openai;

pub use anthropic::AnthropicBackend;
pub use error::BackendError;
pub use fallback::FallbackParser;
pub use gemini::GeminiBackend;
pub use openai::OpenAiBackend;
pub use selector::BackendSelector;

use async_trait::async_trait;

use crate::intent::RawIntent;

/// Capability interface for a (possibly remote) extraction service.
#[async_trait]
pub trait ExtractionBackend: Send + Sync {
    /// Backend name for logs and status reports.
    fn name(&self) -> &str;

    /// True iff the backend has the credentials it needs. A backend
    /// without an API key is never selected.
    fn enabled(&self) -> bool;

    /// Best-effort reachability probe. Diagnostics only; never gates
    /// extraction.
    async fn check_connection(&self) -> bool;

    /// Extracts a raw intent from one phrase.
    async fn extract(&self, text: &str) -> Result<RawIntent, BackendError>;

    /// Splits a message into independently processable phrases.
    async fn split_text(&self, text: &str) -> Result<Vec<String>, BackendError>;
}

/// Pulls the first JSON object out of a model reply.
///
/// Replies are frequently wrapped in prose or markdown fences; we only care
/// about the outermost `{ ... }` span.
pub(crate) fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Pulls the first JSON array out of a model reply.
pub(crate) fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

/// Parses a model reply into a [`RawIntent`], tolerating fenced or
/// prose-wrapped JSON.
pub(crate) fn parse_intent_reply(content: &str) -> Result<RawIntent, BackendError> {
    let json = extract_json_object(content).ok_or_else(|| {
        BackendError::MalformedResponse("no JSON object in model reply".to_string())
    })?;
    serde_json::from_str(json).map_err(|e| BackendError::MalformedResponse(e.to_string()))
}

/// Parses a model reply into a list of segment phrases.
pub(crate) fn parse_split_reply(content: &str) -> Result<Vec<String>, BackendError> {
    let json = extract_json_array(content).ok_or_else(|| {
        BackendError::MalformedResponse("no JSON array in model reply".to_string())
    })?;
    let segments: Vec<String> =
        serde_json::from_str(json).map_err(|e| BackendError::MalformedResponse(e.to_string()))?;
    if segments.iter().all(|s| s.trim().is_empty()) {
        return Err(BackendError::MalformedResponse(
            "model returned only empty segments".to_string(),
        ));
    }
    Ok(segments
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}
