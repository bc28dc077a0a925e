//! Conversation state for one chat session.
//!
//! A session owns an append-only [`ConversationLog`] of role-tagged
//! [`Turn`]s. The log lives in memory for the life of the session and is
//! replayed verbatim to redraw the transcript.

pub mod log;

pub use log::{ConversationLog, Turn, TurnRole};
