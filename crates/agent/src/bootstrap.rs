//! Runtime construction shared by `chat` and `run`.
//!
//! Startup is the only place a fault is fatal: a bad config, a missing API
//! key, or a key the provider rejects all stop here with a diagnostic.

use std::sync::Arc;

use anyhow::Context;

use bb_domain::config::{Config, ConfigSeverity, DispatchMode};
use bb_providers::util::resolve_api_key;
use bb_providers::{GoogleProvider, LlmProvider};
use bb_tools::{IntakeTool, ToolRegistry};

use crate::runtime::{render_with_hint, ChatSession};

/// Everything a session needs, built once per process.
#[derive(Clone)]
pub struct Runtime {
    pub config: Arc<Config>,
    pub provider: Arc<dyn LlmProvider>,
    pub tools: Arc<ToolRegistry>,
}

impl Runtime {
    /// Start a session with optional CLI overrides for mode and model.
    pub fn session(&self, mode: Option<DispatchMode>, model: Option<String>) -> ChatSession {
        ChatSession::new(
            self.provider.clone(),
            self.tools.clone(),
            self.config.agent.clone(),
        )
        .with_mode(mode.unwrap_or(self.config.agent.mode))
        .with_model(model)
    }
}

/// Validate config, resolve the API key, build the provider and tool
/// registry, and (unless disabled) probe the provider with the key.
pub async fn build_runtime(config: Arc<Config>) -> anyhow::Result<Runtime> {
    // ── Config validation ────────────────────────────────────────────
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    let error_count = issues
        .iter()
        .filter(|i| i.severity == ConfigSeverity::Error)
        .count();
    if error_count > 0 {
        anyhow::bail!("config validation failed with {error_count} error(s)");
    }

    // ── API key ──────────────────────────────────────────────────────
    let api_key = resolve_api_key(&config.llm.auth)
        .map_err(|e| anyhow::anyhow!(render_with_hint("cannot start without an API key", &e)))?;

    // ── Provider ─────────────────────────────────────────────────────
    let provider: Arc<dyn LlmProvider> = Arc::new(
        GoogleProvider::new(&config.llm, api_key).context("initializing Gemini provider")?,
    );
    tracing::info!(
        provider = provider.provider_id(),
        model = provider.default_model(),
        "LLM provider ready"
    );

    if config.llm.verify_on_startup {
        provider.verify_credentials().await.map_err(|e| {
            anyhow::anyhow!(render_with_hint("the model provider rejected the API key", &e))
        })?;
        tracing::info!("API key accepted by provider");
    }

    // ── Tools ────────────────────────────────────────────────────────
    let tools = Arc::new(build_tools(&config));
    tracing::info!(tools = ?tools.tool_names(), "tool registry ready");

    Ok(Runtime {
        config,
        provider,
        tools,
    })
}

/// Register every local tool. Built regardless of the configured mode so a
/// session can switch to tool mode mid-conversation.
pub fn build_tools(config: &Config) -> ToolRegistry {
    let mut reg = ToolRegistry::new();
    reg.register(IntakeTool::new(&config.intake));
    reg
}
