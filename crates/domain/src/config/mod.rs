mod agent;
mod chat;
mod intake;
mod llm;

pub use agent::*;
pub use chat::*;
pub use intake::*;
pub use llm::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub intake: IntakeConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl ConfigError {
    fn error(field: &str, message: impl Into<String>) -> Self {
        Self {
            severity: ConfigSeverity::Error,
            field: field.into(),
            message: message.into(),
        }
    }

    fn warning(field: &str, message: impl Into<String>) -> Self {
        Self {
            severity: ConfigSeverity::Warning,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.llm.model.trim().is_empty() {
            errors.push(ConfigError::error("llm.model", "model must not be empty"));
        }

        if !is_http_url(&self.llm.base_url) {
            errors.push(ConfigError::error(
                "llm.base_url",
                "base_url must start with http:// or https://",
            ));
        }

        if self.agent.persona.trim().is_empty() {
            errors.push(ConfigError::warning(
                "agent.persona",
                "empty persona: the model gets no instructions",
            ));
        }

        if let Some(t) = self.agent.temperature {
            if !(0.0..=2.0).contains(&t) {
                errors.push(ConfigError::error(
                    "agent.temperature",
                    "temperature must be between 0.0 and 2.0",
                ));
            }
        }

        // Checked in every mode: `--mode tools` can be picked per session.
        if self.agent.max_tool_loops == 0 {
            errors.push(ConfigError::error(
                "agent.max_tool_loops",
                "max_tool_loops must be greater than 0",
            ));
        }

        if !is_http_url(&self.intake.webhook_url) {
            errors.push(ConfigError::error(
                "intake.webhook_url",
                "webhook_url must start with http:// or https://",
            ));
        } else if self.intake.webhook_url == PLACEHOLDER_WEBHOOK_URL {
            errors.push(ConfigError::warning(
                "intake.webhook_url",
                "still the placeholder endpoint; service requests will not reach a backend",
            ));
        }

        if self.intake.source.trim().is_empty() {
            errors.push(ConfigError::error("intake.source", "source must not be empty"));
        }

        let auth = &self.llm.auth;
        if auth.key.is_none()
            && auth.env.is_none()
            && auth.secrets_file.is_none()
            && (auth.service.is_none() || auth.account.is_none())
        {
            errors.push(ConfigError::error(
                "llm.auth",
                "no API key source configured: set 'key', 'env', 'secrets_file', or 'service'+'account'",
            ));
        }

        if auth.key.is_some() {
            errors.push(ConfigError::warning(
                "llm.auth.key",
                "plaintext key in config (prefer 'env' or the OS keychain)",
            ));
        }

        errors
    }
}

fn is_http_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}
