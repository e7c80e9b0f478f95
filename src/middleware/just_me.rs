//! "Just me" detection and default-invitee injection.

use std::sync::LazyLock;

use log::info;
use regex::Regex;

use super::{Middleware, PipelineError};
use crate::intent::{Intent, IntentKind};

/// Fixed bilingual table of phrases meaning "this event is for me only".
/// Treated as a closed list, not a general i18n mechanism.
static JUST_ME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"just me",
        r"only me",
        r"myself",
        r"solo a mi",
        r"solamente a mi",
        r"apunta en mi calendario",
        r"sólo a mí",
        r"sólo para mí",
        r"sólo yo",
        r"solo yo",
        r"para mí solo",
        r"para mi solo",
        r"en mi calendario",
        r"sólo en mi calendario",
        r"only in my calendar",
        r"add to my calendar",
        r"apúntalo sólo para mí",
        r"apúntalo solo para mí",
        r"apúntalo en mi calendario",
        r"apúntame",
        r"ponlo sólo para mí",
        r"ponlo solo para mí",
        r"ponlo en mi calendario",
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){p}")).expect("just-me pattern"))
    .collect()
});

/// For event intents with configured default invitees, always produces a
/// definite invitee list: empty when the source phrase says "just me",
/// the defaults otherwise. Non-events and empty defaults pass through.
pub struct InviteeInjection {
    default_invitees: Vec<String>,
}

impl InviteeInjection {
    pub fn new(default_invitees: Vec<String>) -> Self {
        Self { default_invitees }
    }
}

impl Middleware for InviteeInjection {
    fn name(&self) -> &str {
        "InviteeInjection"
    }

    fn process(&self, message: &str, intent: Intent) -> Result<Intent, PipelineError> {
        if intent.kind != IntentKind::Event || self.default_invitees.is_empty() {
            return Ok(intent);
        }

        let invitees = if let Some(pattern) = JUST_ME_PATTERNS.iter().find(|p| p.is_match(message))
        {
            info!("'{pattern}' matched, setting invitees to empty list");
            Vec::new()
        } else {
            self.default_invitees.clone()
        };

        Ok(Intent {
            invitees: Some(invitees),
            ..intent
        })
    }
}
