use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LLM provider
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider id used in logs and fault messages.
    #[serde(default = "d_provider_id")]
    pub provider_id: String,
    #[serde(default = "d_base_url")]
    pub base_url: String,
    #[serde(default = "d_model")]
    pub model: String,
    /// Request timeout for model calls. 0 = reqwest default (none).
    #[serde(default = "d_60000u")]
    pub timeout_ms: u64,
    /// Probe the provider with the resolved key before entering the chat
    /// loop, so a rejected key halts startup instead of the first turn.
    #[serde(default = "d_true")]
    pub verify_on_startup: bool,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider_id: d_provider_id(),
            base_url: d_base_url(),
            model: d_model(),
            timeout_ms: 60_000,
            verify_on_startup: true,
            auth: AuthConfig::default(),
        }
    }
}

/// Where the API key comes from. See `bb_providers::util::resolve_api_key`
/// for the precedence order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Env var containing the key.
    #[serde(default = "d_key_env")]
    pub env: Option<String>,
    /// Direct key (for throwaway setups; prefer env or keychain).
    #[serde(default)]
    pub key: Option<String>,
    /// Keychain service name (e.g., "battleborn").
    #[serde(default)]
    pub service: Option<String>,
    /// Keychain account name (e.g., "google-api-key").
    #[serde(default)]
    pub account: Option<String>,
    /// TOML secrets file with a top-level string entry holding the key.
    #[serde(default)]
    pub secrets_file: Option<PathBuf>,
    /// Entry name looked up in `secrets_file`.
    #[serde(default = "d_secrets_key")]
    pub secrets_key: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            env: d_key_env(),
            key: None,
            service: None,
            account: None,
            secrets_file: None,
            secrets_key: d_secrets_key(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_provider_id() -> String {
    "google".into()
}
fn d_base_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}
fn d_model() -> String {
    "gemini-1.5-flash".into()
}
fn d_60000u() -> u64 {
    60_000
}
fn d_true() -> bool {
    true
}
fn d_key_env() -> Option<String> {
    Some("GOOGLE_API_KEY".into())
}
fn d_secrets_key() -> String {
    "GOOGLE_API_KEY".into()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
