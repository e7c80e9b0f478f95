//! External-collaborator capabilities.
//!
//! The real calendar/task service and durable persistence live outside
//! this crate; these traits are the seams they plug into. The bundled
//! implementations exist for offline use and tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use thiserror::Error;

use crate::intent::Intent;

#[derive(Debug, Error)]
pub enum CommitError {
    /// The external service refused or failed to create the item. The
    /// intent is still considered processed, just unconfirmed.
    #[error("commit rejected: {0}")]
    Rejected(String),
}

/// Creates intents in the external calendar/task service, dispatched by
/// kind on the implementor's side. Returns an opaque identifier.
#[async_trait]
pub trait Committer: Send + Sync {
    async fn commit(&self, intent: &Intent) -> Result<String, CommitError>;
}

/// Committer that confirms everything with a synthetic identifier.
#[derive(Debug, Default)]
pub struct NullCommitter {
    counter: AtomicU64,
}

impl NullCommitter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Committer for NullCommitter {
    async fn commit(&self, intent: &Intent) -> Result<String, CommitError> {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        Ok(format!("{}-{n}", intent.kind))
    }
}

/// One persisted processing record.
#[derive(Debug, Clone)]
pub struct IntentRecord {
    pub user_id: String,
    pub phrase: String,
    pub intent: Option<Intent>,
    pub committed: bool,
}

/// Record-keeping of processed segments. Invoked once per segment after
/// commit is attempted, regardless of outcome.
pub trait IntentStore: Send + Sync {
    fn record(&self, record: IntentRecord);
}

/// In-memory store, mostly useful in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<IntentRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<IntentRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl IntentStore for MemoryStore {
    fn record(&self, record: IntentRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
    }
}
