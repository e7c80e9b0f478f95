//! Configuration loading and context switching.
//!
//! Configuration is a TOML file with top-level keys forming the base
//! context and optional `[context.<name>]` tables overriding it:
//!
//! ```toml
//! bot_name = "TaskBot"
//! gemini_api_key = "..."
//! current_context = "work"
//!
//! [context.work]
//! bot_name = "WorkBot"
//! default_invitees = ["team@example.com"]
//! ```
//!
//! Overrides are merged once at load time into an explicit
//! [`ContextConfig`] with named optional fields; there is no runtime
//! attribute-miss interception.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("context '{0}' not found in available contexts")]
    UnknownContext(String),

    #[error("context 'default' is not allowed as an explicit configuration context")]
    ReservedContext,
}

/// The merged settings active for one context.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContextConfig {
    /// Name token prepended to created intent titles.
    pub bot_name: Option<String>,
    pub default_timezone: Option<String>,
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    #[serde(default)]
    pub default_invitees: Vec<String>,
}

impl ContextConfig {
    /// Overlays `other`'s set fields on top of `self`.
    fn merged_with(&self, other: &ContextConfig) -> ContextConfig {
        ContextConfig {
            bot_name: other.bot_name.clone().or_else(|| self.bot_name.clone()),
            default_timezone: other
                .default_timezone
                .clone()
                .or_else(|| self.default_timezone.clone()),
            openai_api_key: other
                .openai_api_key
                .clone()
                .or_else(|| self.openai_api_key.clone()),
            anthropic_api_key: other
                .anthropic_api_key
                .clone()
                .or_else(|| self.anthropic_api_key.clone()),
            gemini_api_key: other
                .gemini_api_key
                .clone()
                .or_else(|| self.gemini_api_key.clone()),
            default_invitees: if other.default_invitees.is_empty() {
                self.default_invitees.clone()
            } else {
                other.default_invitees.clone()
            },
        }
    }
}

/// On-disk layout of the configuration file.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    current_context: Option<String>,
    #[serde(default)]
    context: std::collections::BTreeMap<String, ContextConfig>,
    #[serde(flatten)]
    base: ContextConfig,
}

/// Loaded configuration with the active context already resolved.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub current_context: String,
    pub config_path: Option<PathBuf>,
    active: ContextConfig,
    available: Vec<String>,
}

const DEFAULT_BOT_NAME: &str = "TaskBot";

impl BotConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&text)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text)?;

        if file.context.contains_key("default") {
            return Err(ConfigError::ReservedContext);
        }

        let current_context = file
            .current_context
            .unwrap_or_else(|| "default".to_string());

        let active = match file.context.get(&current_context) {
            Some(overlay) => file.base.merged_with(overlay),
            None if current_context == "default" => file.base.clone(),
            None => return Err(ConfigError::UnknownContext(current_context)),
        };

        Ok(BotConfig {
            current_context,
            config_path: None,
            active,
            available: file.context.keys().cloned().collect(),
        })
    }

    /// Builds an in-memory configuration from a single context, useful for
    /// embedding and tests.
    pub fn from_context(context: ContextConfig) -> Self {
        BotConfig {
            current_context: "default".to_string(),
            config_path: None,
            active: context,
            available: Vec::new(),
        }
    }

    /// Persists a new `current_context` to the configuration file and
    /// reloads. `default` is never switchable explicitly.
    pub fn switch_context(&self, new_context: &str) -> Result<BotConfig, ConfigError> {
        if new_context == "default" {
            return Err(ConfigError::ReservedContext);
        }
        if !self.available.iter().any(|c| c == new_context) {
            return Err(ConfigError::UnknownContext(new_context.to_string()));
        }
        let path = self
            .config_path
            .clone()
            .ok_or_else(|| ConfigError::NotFound(PathBuf::from("<in-memory>")))?;

        let text = std::fs::read_to_string(&path)?;
        let mut table: toml::Table = toml::from_str(&text)?;
        table.insert(
            "current_context".to_string(),
            toml::Value::String(new_context.to_string()),
        );
        std::fs::write(&path, toml::to_string_pretty(&table)?)?;
        Self::load(&path)
    }

    pub fn bot_name(&self) -> &str {
        self.active.bot_name.as_deref().unwrap_or(DEFAULT_BOT_NAME)
    }

    pub fn default_timezone(&self) -> Option<&str> {
        self.active.default_timezone.as_deref()
    }

    pub fn openai_api_key(&self) -> Option<&str> {
        self.active.openai_api_key.as_deref()
    }

    pub fn anthropic_api_key(&self) -> Option<&str> {
        self.active.anthropic_api_key.as_deref()
    }

    pub fn gemini_api_key(&self) -> Option<&str> {
        self.active.gemini_api_key.as_deref()
    }

    pub fn default_invitees(&self) -> &[String] {
        &self.active.default_invitees
    }

    /// Context names a caller may switch to.
    pub fn available_contexts(&self) -> &[String] {
        &self.available
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self::from_context(ContextConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
bot_name = "TaskBot"
gemini_api_key = "base-key"
current_context = "work"

[context.work]
bot_name = "WorkBot"
default_invitees = ["team@example.com"]

[context.home]
bot_name = "HomeBot"
"#;

    #[test]
    fn test_active_context_overrides_base() {
        let config = BotConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.current_context, "work");
        assert_eq!(config.bot_name(), "WorkBot");
        // Inherited from the base context.
        assert_eq!(config.gemini_api_key(), Some("base-key"));
        assert_eq!(config.default_invitees(), ["team@example.com"]);
    }

    #[test]
    fn test_missing_current_context_uses_base() {
        let config = BotConfig::from_toml_str("bot_name = \"Solo\"").unwrap();
        assert_eq!(config.current_context, "default");
        assert_eq!(config.bot_name(), "Solo");
        assert!(config.gemini_api_key().is_none());
    }

    #[test]
    fn test_explicit_default_context_rejected() {
        let err = BotConfig::from_toml_str("[context.default]\nbot_name = \"x\"").unwrap_err();
        assert!(matches!(err, ConfigError::ReservedContext));
    }

    #[test]
    fn test_unknown_current_context_rejected() {
        let err = BotConfig::from_toml_str("current_context = \"nope\"").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownContext(c) if c == "nope"));
    }

    #[test]
    fn test_switch_context_rewrites_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = BotConfig::load(file.path()).unwrap();
        let switched = config.switch_context("home").unwrap();
        assert_eq!(switched.current_context, "home");
        assert_eq!(switched.bot_name(), "HomeBot");

        // Reloading from disk sees the persisted switch.
        let reloaded = BotConfig::load(file.path()).unwrap();
        assert_eq!(reloaded.current_context, "home");
    }

    #[test]
    fn test_switch_to_unknown_context_fails() {
        let config = BotConfig::from_toml_str(SAMPLE).unwrap();
        assert!(matches!(
            config.switch_context("missing").unwrap_err(),
            ConfigError::UnknownContext(_)
        ));
        assert!(matches!(
            config.switch_context("default").unwrap_err(),
            ConfigError::ReservedContext
        ));
    }
}
