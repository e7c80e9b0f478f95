//! Task-to-event promotion.

use log::debug;

use super::{Middleware, PipelineError};
use crate::intent::{Intent, IntentKind};

/// A non-event intent carrying both a specific date and a specific time
/// is, semantically, an appointment; promote it to an event. Events pass
/// through untouched.
pub struct TypePromotion;

impl Middleware for TypePromotion {
    fn name(&self) -> &str {
        "TypePromotion"
    }

    fn process(&self, _message: &str, intent: Intent) -> Result<Intent, PipelineError> {
        if intent.kind == IntentKind::Event {
            return Ok(intent);
        }

        if intent.date.is_some() && intent.time.is_some() {
            debug!("intent '{}' has date and time, promoting to event", intent.title);
            return Ok(Intent {
                kind: IntentKind::Event,
                ..intent
            });
        }

        Ok(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::RawIntent;
    use chrono::{NaiveDate, NaiveTime};

    fn intent(kind: &str, date: bool, time: bool) -> Intent {
        let mut intent = RawIntent {
            task_type: kind.to_string(),
            title: "dentist".to_string(),
            ..Default::default()
        }
        .into_intent()
        .unwrap();
        if date {
            intent.date = NaiveDate::from_ymd_opt(2030, 1, 15);
        }
        if time {
            intent.time = NaiveTime::from_hms_opt(9, 0, 0);
        }
        intent
    }

    #[test]
    fn test_task_with_date_and_time_becomes_event() {
        let out = TypePromotion.process("", intent("task", true, true)).unwrap();
        assert_eq!(out.kind, IntentKind::Event);
    }

    #[test]
    fn test_reminder_with_date_and_time_becomes_event() {
        let out = TypePromotion
            .process("", intent("reminder", true, true))
            .unwrap();
        assert_eq!(out.kind, IntentKind::Event);
    }

    #[test]
    fn test_task_missing_time_stays_task() {
        let out = TypePromotion.process("", intent("task", true, false)).unwrap();
        assert_eq!(out.kind, IntentKind::Task);
        let out = TypePromotion.process("", intent("task", false, true)).unwrap();
        assert_eq!(out.kind, IntentKind::Task);
    }

    #[test]
    fn test_event_passes_through() {
        let out = TypePromotion.process("", intent("event", false, false)).unwrap();
        assert_eq!(out.kind, IntentKind::Event);
    }
}
