//! The two dispatchers.
//!
//! - [`run_tool_turn`]: multi-turn, tools declared, the model may call them
//!   any number of times (bounded) before it answers.
//! - [`complete_once`]: one stateless request with the persona and the
//!   utterance, nothing else.
//!
//! Both return `Ok(None)` when the model produced no text.

use serde::Serialize;

use bb_domain::config::AgentConfig;
use bb_domain::error::{Error, Result};
use bb_domain::tool::Message;
use bb_providers::{ChatRequest, LlmProvider, Usage};
use bb_tools::ToolRegistry;

/// What the surface renders after one utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "text", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// Assistant text, already appended to the log.
    Reply(String),
    /// The model answered with no text.
    Empty,
    /// A provider fault, rendered for display. Not part of the log.
    Diagnostic(String),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tool-augmented turn
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Send `utterance` with the full `history` and run the tool loop until
/// the model answers without calling a tool.
///
/// On success `history` holds the utterance, every tool exchange, and the
/// final answer. On error it is restored to what it was before the call.
pub async fn run_tool_turn(
    provider: &dyn LlmProvider,
    tools: &ToolRegistry,
    agent: &AgentConfig,
    model: Option<&str>,
    history: &mut Vec<Message>,
    utterance: &str,
) -> Result<Option<String>> {
    let checkpoint = history.len();
    history.push(Message::user(utterance));

    let result = tool_loop(provider, tools, agent, model, history).await;
    if result.is_err() {
        history.truncate(checkpoint);
    }
    result
}

async fn tool_loop(
    provider: &dyn LlmProvider,
    tools: &ToolRegistry,
    agent: &AgentConfig,
    model: Option<&str>,
    history: &mut Vec<Message>,
) -> Result<Option<String>> {
    let tool_defs = tools.definitions();
    let mut total_usage = Usage::default();

    for loop_idx in 0..agent.max_tool_loops {
        tracing::debug!(loop_idx, "tool loop iteration");

        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.extend(persona_message(agent));
        messages.extend(history.iter().cloned());

        let req = ChatRequest {
            messages,
            tools: tool_defs.clone(),
            temperature: agent.temperature,
            max_tokens: None,
            model: model.map(str::to_owned),
        };
        let resp = provider.chat(&req).await?;
        if let Some(ref usage) = resp.usage {
            total_usage.accumulate(usage);
        }

        if resp.tool_calls.is_empty() {
            tracing::debug!(
                loop_idx,
                total_tokens = total_usage.total_tokens,
                finish_reason = resp.finish_reason.as_deref().unwrap_or(""),
                "turn complete"
            );
            if resp.content.trim().is_empty() {
                return Ok(None);
            }
            history.push(Message::assistant(resp.content.clone()));
            return Ok(Some(resp.content));
        }

        history.push(Message::assistant_tool_calls(&resp.content, &resp.tool_calls));

        // In order, one at a time: results go back in call order.
        for tc in &resp.tool_calls {
            let (content, is_error) = tools.dispatch(&tc.tool_name, &tc.arguments).await;
            history.push(Message::tool_result(
                &tc.call_id,
                &tc.tool_name,
                content,
                is_error,
            ));
        }
    }

    Err(Error::Other(format!(
        "tool loop limit reached ({} model calls without a final answer)",
        agent.max_tool_loops
    )))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Stateless completion
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Send `utterance` alone with the persona. No history, no tools.
pub async fn complete_once(
    provider: &dyn LlmProvider,
    agent: &AgentConfig,
    model: Option<&str>,
    utterance: &str,
) -> Result<Option<String>> {
    let mut messages: Vec<Message> = persona_message(agent).into_iter().collect();
    messages.push(Message::user(utterance));

    let req = ChatRequest {
        messages,
        temperature: agent.temperature,
        model: model.map(str::to_owned),
        ..Default::default()
    };
    let resp = provider.chat(&req).await?;

    if resp.content.trim().is_empty() {
        tracing::debug!(
            finish_reason = resp.finish_reason.as_deref().unwrap_or(""),
            "empty completion"
        );
        return Ok(None);
    }
    Ok(Some(resp.content))
}

fn persona_message(agent: &AgentConfig) -> Option<Message> {
    if agent.persona.trim().is_empty() {
        None
    } else {
        Some(Message::system(agent.persona.as_str()))
    }
}
