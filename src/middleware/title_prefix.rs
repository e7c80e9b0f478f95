//! Title truncation and bot-name prefixing.

use super::{Middleware, PipelineError};
use crate::intent::Intent;

const TITLE_MAX_LEN: usize = 50;

/// Truncates the title to 50 characters (with a trailing ellipsis) and
/// then prepends the configured bot name. Truncation happens first so the
/// prefix itself is never truncated away.
pub struct TitlePrefix {
    bot_name: String,
}

impl TitlePrefix {
    pub fn new(bot_name: impl Into<String>) -> Self {
        Self {
            bot_name: bot_name.into(),
        }
    }
}

impl Middleware for TitlePrefix {
    fn name(&self) -> &str {
        "TitlePrefix"
    }

    fn process(&self, _message: &str, intent: Intent) -> Result<Intent, PipelineError> {
        let title = if intent.title.chars().count() > TITLE_MAX_LEN {
            let truncated: String = intent.title.chars().take(TITLE_MAX_LEN).collect();
            format!("{truncated}...")
        } else {
            intent.title.clone()
        };

        Ok(Intent {
            title: format!("{} {title}", self.bot_name),
            ..intent
        })
    }
}
