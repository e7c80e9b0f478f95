//! Structured intent data model.
//!
//! An [`Intent`] is the validated result of extracting a task, calendar event
//! or reminder from free text. Extraction backends produce an unvalidated
//! [`RawIntent`] first; conversion to [`Intent`] is where unknown kinds,
//! empty titles and malformed date/time strings are rejected.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of things a user message can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    Task,
    Event,
    Reminder,
}

impl IntentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentKind::Task => "task",
            IntentKind::Event => "event",
            IntentKind::Reminder => "reminder",
        }
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntentKind {
    type Err = IntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "task" => Ok(IntentKind::Task),
            "event" => Ok(IntentKind::Event),
            "reminder" => Ok(IntentKind::Reminder),
            other => Err(IntentError::UnknownKind(other.to_string())),
        }
    }
}

/// Errors raised while converting a [`RawIntent`] into an [`Intent`].
#[derive(Debug, Error)]
pub enum IntentError {
    /// The extraction backend emitted a kind outside the closed enum.
    #[error("unknown intent kind: '{0}'")]
    UnknownKind(String),

    /// The title is empty after trimming.
    #[error("intent title must not be empty")]
    EmptyTitle,

    /// The date string does not parse as `YYYY-MM-DD`.
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The time string does not parse as `HH:MM`.
    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTime(String),
}

/// A validated, immutable extraction result.
///
/// Middleware stages never mutate an `Intent` in place; each stage returns
/// either the same value or a new one reflecting its transform. That keeps
/// every stage a pure `(message, Intent) -> Intent` function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub kind: IntentKind,
    pub title: String,
    pub description: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    /// `None` means "use defaults"; `Some(vec![])` means explicitly nobody.
    pub invitees: Option<Vec<String>>,
}

impl Intent {
    /// The dedup identity of this intent within one message.
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            title: self.title.to_lowercase(),
            date: self.date,
            time: self.time,
            kind: self.kind,
        }
    }
}

/// An unvalidated, dict-like extraction result as emitted by a backend.
///
/// Field names follow the wire format the extraction prompt asks for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawIntent {
    #[serde(default)]
    pub task_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub invitees: Option<Vec<String>>,
}

impl RawIntent {
    /// Validates this raw value into an [`Intent`].
    ///
    /// Unrecognized kinds are an input-validation condition here, not a
    /// parse error at extraction time.
    pub fn into_intent(self) -> Result<Intent, IntentError> {
        let kind = self.task_type.parse::<IntentKind>()?;

        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(IntentError::EmptyTitle);
        }

        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .map_err(|_| IntentError::InvalidDate(s.to_string()))?,
            ),
        };

        let time = match self.time.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(
                NaiveTime::parse_from_str(s, "%H:%M")
                    .map_err(|_| IntentError::InvalidTime(s.to_string()))?,
            ),
        };

        Ok(Intent {
            kind,
            title,
            description: self.description,
            date,
            time,
            invitees: self.invitees,
        })
    }
}

/// Identity of "the same" intent across segments of one message.
///
/// Ephemeral: only ever lives in the aggregator's per-message seen-set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub title: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub kind: IntentKind,
}

/// What happened to a single segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentOutcome {
    /// The intent was committed to the external backend.
    Created { id: String },
    /// The intent is valid but the external commit did not confirm.
    Unconfirmed,
    /// An earlier segment in the same message already produced this intent.
    Duplicate,
    /// Extraction or validation failed.
    Failed { reason: String },
}

/// Pairs a segment's source phrase with its processing outcome.
#[derive(Debug, Clone)]
pub struct SegmentResult {
    pub phrase: String,
    pub intent: Option<Intent>,
    pub outcome: SegmentOutcome,
    pub feedback: String,
}

impl SegmentResult {
    pub fn is_created(&self) -> bool {
        matches!(self.outcome, SegmentOutcome::Created { .. })
    }
}

/// Ordered per-segment results for one processed message.
///
/// Even when nothing was created the result enumerates every segment's
/// fate, so a caller can show the user why.
#[derive(Debug, Clone, Default)]
pub struct MessageResult {
    pub segments: Vec<SegmentResult>,
}

impl MessageResult {
    pub fn created_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_created()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
