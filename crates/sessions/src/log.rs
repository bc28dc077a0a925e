//! Append-only conversation log.
//!
//! Turns are immutable once pushed and there is no removal API: the only
//! way to drop history is to drop the whole log with its session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bb_domain::trace::TraceEvent;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One role-tagged utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    role: TurnRole,
    content: String,
    created_at: DateTime<Utc>,
}

impl Turn {
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn role(&self) -> TurnRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Ordered, append-only sequence of turns owned by one session.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationLog {
    session_id: String,
    turns: Vec<Turn>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::with_session_id(uuid::Uuid::new_v4().to_string())
    }

    pub fn with_session_id(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            turns: Vec::new(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Append a turn and return a reference to it.
    pub fn push(&mut self, role: TurnRole, content: impl Into<String>) -> &Turn {
        self.turns.push(Turn::new(role, content));

        TraceEvent::TurnAppended {
            session_id: self.session_id.clone(),
            role: role.as_str().to_owned(),
            turns: self.turns.len(),
        }
        .emit();

        // Just pushed, so the vec is non-empty.
        &self.turns[self.turns.len() - 1]
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> &Turn {
        self.push(TurnRole::User, content)
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) -> &Turn {
        self.push(TurnRole::Assistant, content)
    }

    /// Replay the log in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a ConversationLog {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_preserves_insertion_order() {
        let mut log = ConversationLog::new();
        let n = 12;
        for i in 0..n {
            if i % 2 == 0 {
                log.push_user(format!("u{i}"));
            } else {
                log.push_assistant(format!("a{i}"));
            }
        }

        assert_eq!(log.len(), n);
        for (i, turn) in log.iter().enumerate() {
            let expected_role = if i % 2 == 0 { TurnRole::User } else { TurnRole::Assistant };
            let prefix = if i % 2 == 0 { "u" } else { "a" };
            assert_eq!(turn.role(), expected_role);
            assert_eq!(turn.content(), format!("{prefix}{i}"));
        }
    }

    #[test]
    fn replaying_twice_yields_identical_sequences() {
        let mut log = ConversationLog::new();
        log.push_user("hello");
        log.push_assistant("hi, how can I help?");
        let first: Vec<Turn> = log.iter().cloned().collect();
        let second: Vec<Turn> = (&log).into_iter().cloned().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn push_returns_the_new_turn() {
        let mut log = ConversationLog::with_session_id("s-1");
        let turn = log.push_user("My wifi is down");
        assert_eq!(turn.role(), TurnRole::User);
        assert_eq!(turn.content(), "My wifi is down");
        assert_eq!(log.session_id(), "s-1");
        assert_eq!(log.last().unwrap().content(), "My wifi is down");
    }

    #[test]
    fn timestamps_are_non_decreasing() {
        let mut log = ConversationLog::new();
        log.push_user("a");
        log.push_assistant("b");
        let t = log.turns();
        assert!(t[0].created_at() <= t[1].created_at());
    }

    #[test]
    fn new_logs_get_distinct_session_ids() {
        assert_ne!(ConversationLog::new().session_id(), ConversationLog::new().session_id());
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Turn::new(TurnRole::Assistant, "x")).unwrap();
        assert!(json.contains(r#""role":"assistant""#));
    }
}
