//! Rejects intents dated in the past.

use chrono::Local;

use super::{Middleware, PipelineError};
use crate::intent::Intent;

/// Fails the segment when the intent's date is strictly before today in
/// the invocation's local time. Does not touch `time`; an intent with no
/// date passes through.
pub struct DateValidation;

impl Middleware for DateValidation {
    fn name(&self) -> &str {
        "DateValidation"
    }

    fn process(&self, _message: &str, intent: Intent) -> Result<Intent, PipelineError> {
        if let Some(date) = intent.date {
            if date < Local::now().date_naive() {
                return Err(PipelineError::DateInPast(date));
            }
        }
        Ok(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::RawIntent;
    use chrono::Days;

    fn intent_with_date(date: Option<chrono::NaiveDate>) -> Intent {
        let mut intent = RawIntent {
            task_type: "task".to_string(),
            title: "pay rent".to_string(),
            ..Default::default()
        }
        .into_intent()
        .unwrap();
        intent.date = date;
        intent
    }

    #[test]
    fn test_yesterday_fails() {
        let yesterday = Local::now().date_naive() - Days::new(1);
        let err = DateValidation
            .process("pay rent", intent_with_date(Some(yesterday)))
            .unwrap_err();
        assert!(matches!(err, PipelineError::DateInPast(d) if d == yesterday));
    }

    #[test]
    fn test_today_and_future_pass() {
        let today = Local::now().date_naive();
        for date in [today, today + Days::new(30)] {
            let out = DateValidation
                .process("pay rent", intent_with_date(Some(date)))
                .unwrap();
            assert_eq!(out.date, Some(date));
        }
    }

    #[test]
    fn test_absent_date_passes() {
        assert!(DateValidation.process("pay rent", intent_with_date(None)).is_ok());
    }
}
