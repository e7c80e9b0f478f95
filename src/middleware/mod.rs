//! Post-extraction middleware.
//!
//! Each stage is a pure `(message, Intent) -> Intent` function: it either
//! passes the intent through unchanged, returns a transformed copy, or
//! fails with a validation error that aborts the segment (only that
//! segment; siblings are unaffected).
//!
//! Stage order matters. The canonical pipeline runs date validation first,
//! then title prefixing, then invitee injection, then type promotion —
//! later stages depend on earlier invariants, and promotion runs after
//! invitee injection so it never has to re-check invitee defaults.

pub mod date_validation;
pub mod just_me;
pub mod min_words;
pub mod promotion;
pub mod title_prefix;

pub use date_validation::DateValidation;
pub use just_me::InviteeInjection;
pub use promotion::TypePromotion;
pub use title_prefix::TitlePrefix;

use thiserror::Error;

use crate::intent::Intent;

/// Validation failures raised by middleware stages.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("intent date {0} cannot be in the past")]
    DateInPast(chrono::NaiveDate),

    #[error("message is too short, it must contain at least {min} words")]
    TooShort { min: usize },
}

/// One stage of the post-extraction pipeline.
pub trait Middleware: Send + Sync {
    /// Stage name for logs.
    fn name(&self) -> &str;

    /// Applies this stage to an intent extracted from `message`.
    fn process(&self, message: &str, intent: Intent) -> Result<Intent, PipelineError>;
}

/// An ordered, fixed chain of middleware stages.
pub struct MiddlewarePipeline {
    stages: Vec<Box<dyn Middleware>>,
}

impl MiddlewarePipeline {
    pub fn new(stages: Vec<Box<dyn Middleware>>) -> Self {
        Self { stages }
    }

    /// The canonical stage order used for every processed segment.
    pub fn standard(bot_name: &str, default_invitees: &[String]) -> Self {
        Self::new(vec![
            Box::new(DateValidation),
            Box::new(TitlePrefix::new(bot_name)),
            Box::new(InviteeInjection::new(default_invitees.to_vec())),
            Box::new(TypePromotion),
        ])
    }

    /// Folds the intent through every stage in order.
    pub fn process(&self, message: &str, intent: Intent) -> Result<Intent, PipelineError> {
        self.stages
            .iter()
            .try_fold(intent, |intent, stage| stage.process(message, intent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{IntentKind, RawIntent};
    use chrono::{Days, Local, NaiveTime};

    fn intent(kind: &str, title: &str) -> Intent {
        RawIntent {
            task_type: kind.to_string(),
            title: title.to_string(),
            description: title.to_string(),
            ..Default::default()
        }
        .into_intent()
        .unwrap()
    }

    #[test]
    fn test_standard_pipeline_order() {
        let pipeline =
            MiddlewarePipeline::standard("TaskBot", &["ana@example.com".to_string()]);

        let mut input = intent("task", "plan the offsite");
        input.date = Some(Local::now().date_naive() + Days::new(1));
        input.time = NaiveTime::from_hms_opt(10, 0, 0);

        let out = pipeline.process("plan the offsite", input).unwrap();
        // Prefixed, promoted to event because date and time are both set,
        // but invitees untouched: injection ran before promotion, and the
        // intent was still a task at that point.
        assert_eq!(out.title, "TaskBot plan the offsite");
        assert_eq!(out.kind, IntentKind::Event);
        assert_eq!(out.invitees, None);
    }

    #[test]
    fn test_event_gets_default_invitees() {
        let pipeline =
            MiddlewarePipeline::standard("TaskBot", &["ana@example.com".to_string()]);
        let out = pipeline
            .process("meet with ana", intent("event", "meet with ana"))
            .unwrap();
        assert_eq!(out.invitees, Some(vec!["ana@example.com".to_string()]));
    }

    #[test]
    fn test_failing_stage_aborts_chain() {
        let pipeline = MiddlewarePipeline::standard("TaskBot", &[]);
        let mut input = intent("task", "pay rent");
        input.date = Local::now().date_naive().checked_sub_days(Days::new(1));
        let err = pipeline.process("pay rent", input).unwrap_err();
        assert!(matches!(err, PipelineError::DateInPast(_)));
    }
}
