//! Message processing: segmentation, extraction, middleware, dedup, commit.
//!
//! Segments are processed sequentially in source order; deduplication of
//! a later segment depends on the keys accumulated from earlier ones in
//! the same message. Distinct messages share no mutable state and may be
//! processed concurrently.

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, info};

use crate::backend::BackendSelector;
use crate::commit::{Committer, IntentRecord, IntentStore, MemoryStore, NullCommitter};
use crate::config::BotConfig;
use crate::intent::{DedupKey, Intent, MessageResult, SegmentOutcome, SegmentResult};
use crate::middleware::{MiddlewarePipeline, min_words};

/// Drives the full per-message pipeline and assembles the result.
pub struct Processor {
    selector: BackendSelector,
    pipeline: MiddlewarePipeline,
    committer: Arc<dyn Committer>,
    store: Arc<dyn IntentStore>,
}

impl Processor {
    /// Builds a processor from configuration, with the offline committer
    /// and an in-memory store.
    pub fn from_config(config: &BotConfig) -> Self {
        Self {
            selector: BackendSelector::from_config(config),
            pipeline: MiddlewarePipeline::standard(config.bot_name(), config.default_invitees()),
            committer: Arc::new(NullCommitter::new()),
            store: Arc::new(MemoryStore::new()),
        }
    }

    pub fn with_selector(mut self, selector: BackendSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_committer(mut self, committer: Arc<dyn Committer>) -> Self {
        self.committer = committer;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn IntentStore>) -> Self {
        self.store = store;
        self
    }

    pub fn selector(&self) -> &BackendSelector {
        &self.selector
    }

    /// Processes one raw user message into per-segment outcomes.
    ///
    /// One segment's failure never aborts the batch, and even when nothing
    /// was created the result enumerates every segment's fate.
    pub async fn process_message(&self, message: &str, user_id: &str) -> MessageResult {
        let segments = self.selector.split_text(message).await;
        info!("processing {} segment(s) for user {user_id}", segments.len());

        let mut seen: HashSet<DedupKey> = HashSet::new();
        let mut results = MessageResult::default();

        for phrase in segments {
            let result = self.process_segment(&phrase, &mut seen).await;
            self.store.record(IntentRecord {
                user_id: user_id.to_string(),
                phrase: phrase.clone(),
                intent: result.intent.clone(),
                committed: result.is_created(),
            });
            results.segments.push(result);
        }

        results
    }

    async fn process_segment(&self, phrase: &str, seen: &mut HashSet<DedupKey>) -> SegmentResult {
        match self.evaluate_segment(phrase).await {
            Ok(intent) => {
                let key = intent.dedup_key();
                if seen.contains(&key) {
                    debug!("segment '{phrase}' duplicates an earlier intent, skipping");
                    return SegmentResult {
                        phrase: phrase.to_string(),
                        feedback: format!("Skipped duplicate: {}", intent.title),
                        intent: Some(intent),
                        outcome: SegmentOutcome::Duplicate,
                    };
                }
                seen.insert(key);

                match self.committer.commit(&intent).await {
                    Ok(id) => SegmentResult {
                        phrase: phrase.to_string(),
                        feedback: format!("Successfully created: {}", intent.title),
                        intent: Some(intent),
                        outcome: SegmentOutcome::Created { id },
                    },
                    Err(e) => {
                        debug!("commit failed for '{phrase}': {e}");
                        SegmentResult {
                            phrase: phrase.to_string(),
                            feedback: format!(
                                "I understood the {} \"{}\" but couldn't create it; saved for retry.",
                                intent.kind, intent.title
                            ),
                            intent: Some(intent),
                            outcome: SegmentOutcome::Unconfirmed,
                        }
                    }
                }
            }
            Err(reason) => {
                info!("error processing '{phrase}': {reason}");
                SegmentResult {
                    phrase: phrase.to_string(),
                    intent: None,
                    feedback: format!("Failed to create: {reason}"),
                    outcome: SegmentOutcome::Failed { reason },
                }
            }
        }
    }

    /// Extraction plus validation for one segment. Any error is already a
    /// human-readable reason.
    async fn evaluate_segment(&self, phrase: &str) -> Result<Intent, String> {
        min_words::validate(phrase).map_err(|e| e.to_string())?;

        let raw = self.selector.extract(phrase).await;
        let intent = raw.into_intent().map_err(|e| e.to_string())?;
        self.pipeline
            .process(phrase, intent)
            .map_err(|e| e.to_string())
    }
}

/// Single entry point for callers: processes `message` for `user_id`
/// under `config`, committing through the offline committer.
pub async fn process_message(config: &BotConfig, message: &str, user_id: &str) -> MessageResult {
    Processor::from_config(config).process_message(message, user_id).await
}
