use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Intake webhook
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Placeholder shipped until a real backend endpoint is configured.
pub const PLACEHOLDER_WEBHOOK_URL: &str = "https://www.yourdomain.com/_functions/your_wix_webhook";

/// Origin tag stamped on every submitted service request.
pub const DEFAULT_SOURCE: &str = "BattleBorn_AI_Agent";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    #[serde(default = "d_webhook_url")]
    pub webhook_url: String,
    #[serde(default = "d_source")]
    pub source: String,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            webhook_url: d_webhook_url(),
            source: d_source(),
        }
    }
}

fn d_webhook_url() -> String {
    PLACEHOLDER_WEBHOOK_URL.into()
}
fn d_source() -> String {
    DEFAULT_SOURCE.into()
}
