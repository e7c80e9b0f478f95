//! Backend selection with graceful degradation.
//!
//! The selector tries enabled remote backends in a random order, so no
//! single backend becomes a hidden single point of failure, and falls
//! back to the deterministic [`FallbackParser`] when none succeed. From
//! the caller's point of view it never fails.

use log::{error, warn};
use rand::Rng;
use rand::seq::SliceRandom;

use super::{
    AnthropicBackend, ExtractionBackend, FallbackParser, GeminiBackend, OpenAiBackend,
};
use crate::config::BotConfig;
use crate::intent::RawIntent;

pub struct BackendSelector {
    backends: Vec<Box<dyn ExtractionBackend>>,
    fallback: FallbackParser,
}

impl BackendSelector {
    /// Builds the selector from explicit backends.
    pub fn new(backends: Vec<Box<dyn ExtractionBackend>>) -> Self {
        Self {
            backends,
            fallback: FallbackParser::new(),
        }
    }

    /// Builds the standard remote-backend set from configured credentials.
    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(vec![
            Box::new(OpenAiBackend::new(
                config.openai_api_key().map(String::from),
            )),
            Box::new(AnthropicBackend::new(
                config.anthropic_api_key().map(String::from),
            )),
            Box::new(GeminiBackend::new(
                config.gemini_api_key().map(String::from),
            )),
        ])
    }

    /// All configured backends, for status reporting.
    pub fn backends(&self) -> &[Box<dyn ExtractionBackend>] {
        &self.backends
    }

    pub fn fallback(&self) -> &FallbackParser {
        &self.fallback
    }

    /// Enabled backends in an order drawn from `rng`. Pure with respect
    /// to the random source, so tests can inject a fixed ordering.
    fn shuffled_enabled<R: Rng>(&self, rng: &mut R) -> Vec<&dyn ExtractionBackend> {
        let mut enabled: Vec<&dyn ExtractionBackend> = self
            .backends
            .iter()
            .map(|b| b.as_ref())
            .filter(|b| b.enabled())
            .collect();
        enabled.shuffle(rng);
        enabled
    }

    /// Extracts a raw intent for one phrase. Always returns a usable
    /// result; worst case is the fallback parser's output.
    pub async fn extract(&self, text: &str) -> RawIntent {
        let order = self.shuffled_enabled(&mut rand::thread_rng());
        self.extract_ordered(order, text).await
    }

    /// Extraction with an injected random source.
    pub async fn extract_with<R: Rng>(&self, rng: &mut R, text: &str) -> RawIntent {
        let order = self.shuffled_enabled(rng);
        self.extract_ordered(order, text).await
    }

    async fn extract_ordered(
        &self,
        order: Vec<&dyn ExtractionBackend>,
        text: &str,
    ) -> RawIntent {
        if order.is_empty() {
            warn!("no extraction backends enabled, using rule-based parsing");
            return self.fallback.parse(text);
        }

        for backend in order {
            match backend.extract(text).await {
                Ok(raw) => return raw,
                Err(e) => warn!("error extracting with {}: {e}", backend.name()),
            }
        }

        error!("all extraction backends failed, falling back to rule-based parsing");
        self.fallback.parse(text)
    }

    /// Splits a message into task phrases, with the same degradation
    /// protocol as [`extract`](Self::extract).
    pub async fn split_text(&self, text: &str) -> Vec<String> {
        let order = self.shuffled_enabled(&mut rand::thread_rng());
        self.split_ordered(order, text).await
    }

    /// Segmentation with an injected random source.
    pub async fn split_text_with<R: Rng>(&self, rng: &mut R, text: &str) -> Vec<String> {
        let order = self.shuffled_enabled(rng);
        self.split_ordered(order, text).await
    }

    async fn split_ordered(&self, order: Vec<&dyn ExtractionBackend>, text: &str) -> Vec<String> {
        for backend in order {
            match backend.split_text(text).await {
                Ok(segments) if !segments.is_empty() => return segments,
                Ok(_) => warn!("{} returned no segments", backend.name()),
                Err(e) => warn!("error splitting text with {}: {e}", backend.name()),
            }
        }
        crate::segment::segment(text)
    }
}
