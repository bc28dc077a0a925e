use serde::Serialize;

/// Structured trace events emitted across the BattleBorn crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    LlmRequest {
        provider: String,
        model: String,
        tools: usize,
        duration_ms: u64,
        prompt_tokens: Option<u32>,
        completion_tokens: Option<u32>,
    },
    ToolDispatched {
        tool_name: String,
        is_error: bool,
        duration_ms: u64,
    },
    IntakeSubmitted {
        status: Option<u16>,
        duration_ms: u64,
    },
    TurnAppended {
        session_id: String,
        role: String,
        turns: usize,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "bb_event");
    }
}
