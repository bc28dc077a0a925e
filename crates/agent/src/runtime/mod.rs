//! Turn dispatch: everything between a user utterance and the text shown
//! back to them.

pub mod dispatch;
pub mod fault;
pub mod session;

pub use dispatch::{complete_once, run_tool_turn, DispatchOutcome};
pub use fault::{render_fault, render_with_hint};
pub use session::ChatSession;
