//! `battleborn run`: one-shot dispatch.
//!
//! Sends a single message, prints the outcome, and exits. A diagnostic
//! exits with code 1 so scripts can tell a fault from an answer.

use std::sync::Arc;

use bb_domain::config::{Config, DispatchMode};

use crate::bootstrap;
use crate::runtime::DispatchOutcome;

pub async fn run(
    config: Arc<Config>,
    message: String,
    mode: Option<DispatchMode>,
    model: Option<String>,
    json_output: bool,
) -> anyhow::Result<()> {
    let runtime = bootstrap::build_runtime(config).await?;
    let mut session = runtime.session(mode, model);

    let outcome = session.handle_utterance(&message).await;

    if json_output {
        let json = serde_json::to_string_pretty(&outcome)
            .map_err(|e| anyhow::anyhow!("serializing outcome: {e}"))?;
        println!("{json}");
    } else {
        match &outcome {
            DispatchOutcome::Reply(text) => println!("{text}"),
            DispatchOutcome::Empty => eprintln!("(empty response)"),
            DispatchOutcome::Diagnostic(message) => eprintln!("error: {message}"),
        }
    }

    if matches!(outcome, DispatchOutcome::Diagnostic(_)) {
        std::process::exit(1);
    }

    Ok(())
}
