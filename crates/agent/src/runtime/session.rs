//! Per-conversation context: the visible log plus the provider-side
//! history, and the handles needed to dispatch a turn.

use std::sync::Arc;

use bb_domain::config::{AgentConfig, DispatchMode};
use bb_domain::tool::Message;
use bb_providers::LlmProvider;
use bb_sessions::ConversationLog;
use bb_tools::ToolRegistry;

use super::dispatch::{self, DispatchOutcome};
use super::fault::render_fault;

pub struct ChatSession {
    log: ConversationLog,
    /// Provider-side context for tool mode. Never includes the persona.
    history: Vec<Message>,
    mode: DispatchMode,
    model: Option<String>,
    agent: AgentConfig,
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
}

impl ChatSession {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        agent: AgentConfig,
    ) -> Self {
        Self {
            log: ConversationLog::new(),
            history: Vec::new(),
            mode: agent.mode,
            model: None,
            agent,
            provider,
            tools,
        }
    }

    pub fn with_mode(mut self, mode: DispatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DispatchMode) {
        self.mode = mode;
    }

    /// Model override, or `None` for the provider default.
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn set_model(&mut self, model: Option<String>) {
        self.model = model;
    }

    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    /// Drop the log and provider history and start a new session id.
    pub fn reset(&mut self) {
        self.log = ConversationLog::new();
        self.history.clear();
    }

    /// Dispatch one utterance and record it.
    ///
    /// The user turn is always logged. An assistant turn is logged only for
    /// a non-empty reply; diagnostics are shown but never logged. This is
    /// the boundary where provider faults stop propagating.
    pub async fn handle_utterance(&mut self, text: &str) -> DispatchOutcome {
        self.log.push_user(text);

        let result = match self.mode {
            DispatchMode::Tools => {
                dispatch::run_tool_turn(
                    self.provider.as_ref(),
                    &self.tools,
                    &self.agent,
                    self.model.as_deref(),
                    &mut self.history,
                    text,
                )
                .await
            }
            DispatchMode::Completion => {
                dispatch::complete_once(
                    self.provider.as_ref(),
                    &self.agent,
                    self.model.as_deref(),
                    text,
                )
                .await
            }
        };

        match result {
            Ok(Some(reply)) => {
                self.log.push_assistant(reply.as_str());
                DispatchOutcome::Reply(reply)
            }
            Ok(None) => DispatchOutcome::Empty,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    mode = %self.mode,
                    session_id = %self.log.session_id(),
                    "dispatch failed"
                );
                DispatchOutcome::Diagnostic(render_fault(&e))
            }
        }
    }
}
