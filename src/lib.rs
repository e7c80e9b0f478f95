//! `intake` - turn free-text requests into structured intents.
//!
//! This library takes a message like "Schedule a meeting with John
//! tomorrow at 2pm" and produces one or more structured intents — task,
//! calendar event, or reminder — ready to hand to an external
//! calendar/task backend. The interesting part is the
//! natural-language-to-structured-data pipeline:
//!
//! - **Backend selection with graceful degradation**: zero or more remote
//!   extraction backends (OpenAI, Anthropic, Gemini) are tried in a
//!   random order; when none are configured or all fail, a deterministic
//!   rule-based parser takes over, so extraction never fails outright.
//! - **A bilingual fallback parser**: English/Spanish keyword, date and
//!   time rules that always produce a well-formed result.
//! - **Segmentation**: one message may contain several independent
//!   requests; splitting preserves embedded time expressions.
//! - **A middleware pipeline**: each extracted intent is validated,
//!   title-prefixed, invitee-enriched and type-promoted before commit,
//!   with per-segment failure isolation and in-message deduplication.
//!
//! # Example
//!
//! ```rust,no_run
//! use intake::{BotConfig, process_message};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BotConfig::load("config.toml")?;
//! let result = process_message(&config, "Buy milk, call mom at 15:00", "user-1").await;
//! for segment in &result.segments {
//!     println!("{}", segment.feedback);
//! }
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod commit;
pub mod config;
pub mod intent;
pub mod middleware;
pub mod processor;
pub mod segment;
pub mod status;

pub use backend::{
    AnthropicBackend, BackendError, BackendSelector, ExtractionBackend, FallbackParser,
    GeminiBackend, OpenAiBackend,
};
pub use commit::{CommitError, Committer, IntentRecord, IntentStore, MemoryStore, NullCommitter};
pub use config::{BotConfig, ConfigError, ContextConfig};
pub use intent::{
    DedupKey, Intent, IntentError, IntentKind, MessageResult, RawIntent, SegmentOutcome,
    SegmentResult,
};
pub use middleware::{Middleware, MiddlewarePipeline, PipelineError};
pub use processor::{Processor, process_message};
pub use segment::segment;
pub use status::{StatusItem, StatusLevel, status_report};
