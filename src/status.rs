//! Diagnostics report for callers that want to show a status screen.
//!
//! Connection probes are best-effort and never influence backend
//! selection.

use crate::backend::{BackendSelector, ExtractionBackend};
use crate::config::BotConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Ok,
    Error,
    Info,
}

#[derive(Debug, Clone)]
pub struct StatusItem {
    pub name: String,
    pub level: StatusLevel,
}

/// Collects configuration facts and per-backend reachability.
pub async fn status_report(selector: &BackendSelector, config: &BotConfig) -> Vec<StatusItem> {
    let mut items = vec![
        StatusItem {
            name: format!("Bot name: {}", config.bot_name()),
            level: StatusLevel::Info,
        },
        StatusItem {
            name: format!("Active context: {}", config.current_context),
            level: StatusLevel::Info,
        },
    ];

    for backend in selector.backends() {
        if !backend.enabled() {
            items.push(StatusItem {
                name: format!("{} API: not configured", backend.name()),
                level: StatusLevel::Info,
            });
            continue;
        }
        let level = if backend.check_connection().await {
            StatusLevel::Ok
        } else {
            StatusLevel::Error
        };
        items.push(StatusItem {
            name: format!("{} API", backend.name()),
            level,
        });
    }

    items
}
