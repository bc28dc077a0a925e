//! Shared types for the BattleBorn intake assistant: the error type,
//! provider-agnostic messages and tool calls, the configuration tree,
//! and structured trace events.

pub mod config;
pub mod error;
pub mod tool;
pub mod trace;
