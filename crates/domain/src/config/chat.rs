use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Chat surface
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "d_title")]
    pub title: String,
    #[serde(default = "d_caption")]
    pub caption: String,
    /// Hint shown above the input prompt.
    #[serde(default = "d_placeholder")]
    pub placeholder: String,
    /// Persist readline history under `~/.battleborn/`.
    #[serde(default = "d_true")]
    pub history_file: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            title: d_title(),
            caption: d_caption(),
            placeholder: d_placeholder(),
            history_file: true,
        }
    }
}

fn d_title() -> String {
    "BattleBorn Infrastructures Support".into()
}
fn d_caption() -> String {
    "Ask us about network design, installs, or request a free consultation!".into()
}
fn d_placeholder() -> String {
    "How can we upgrade your network today?".into()
}
fn d_true() -> bool {
    true
}
