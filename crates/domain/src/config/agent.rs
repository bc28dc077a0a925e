use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Turn dispatcher
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Fixed persona / system instruction sent with every dispatch.
pub const DEFAULT_PERSONA: &str = "\
You are the friendly, humble, and enthusiastic AI assistant for BattleBorn Infrastructures. \
You specialize in discussing our network design, professional installations, and repair services. \
Consultations are free. If a customer needs a service, you MUST collect their Name, Email, Phone, \
Service Type, Site Type (Residential/Commercial), Zip Code, and Urgency. \
Once you have all details, use the submit_service_request tool to log it, then warmly confirm with the user.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Which dispatcher drives the conversation.
    #[serde(default)]
    pub mode: DispatchMode,
    /// System instruction for the model.
    #[serde(default = "d_persona")]
    pub persona: String,
    /// Upper bound on model calls within one tool-augmented turn.
    #[serde(default = "d_10")]
    pub max_tool_loops: usize,
    /// Sampling temperature. `None` lets the provider choose.
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            mode: DispatchMode::default(),
            persona: d_persona(),
            max_tool_loops: 10,
            temperature: None,
        }
    }
}

/// Dispatcher variant.
///
/// - `tools`: multi-turn session with the intake tool declared; the model
///   may call it before producing its reply.
/// - `completion`: every utterance is sent alone with the persona, no
///   history and no tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    #[default]
    Tools,
    Completion,
}

impl std::str::FromStr for DispatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tools" | "a" => Ok(Self::Tools),
            "completion" | "b" => Ok(Self::Completion),
            other => Err(format!("unknown mode '{other}' (expected 'tools' or 'completion')")),
        }
    }
}

impl std::fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tools => f.write_str("tools"),
            Self::Completion => f.write_str("completion"),
        }
    }
}

fn d_persona() -> String {
    DEFAULT_PERSONA.into()
}
fn d_10() -> usize {
    10
}
