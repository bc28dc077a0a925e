//! `battleborn chat`: the interactive support REPL.
//!
//! Each line is dispatched through a [`ChatSession`] and the outcome is
//! printed. Replies go to stdout; banners, the busy indicator, and
//! diagnostics go to stderr.

use std::io::Write;
use std::sync::Arc;

use bb_domain::config::{Config, DispatchMode};
use bb_sessions::TurnRole;

use crate::bootstrap;
use crate::runtime::{ChatSession, DispatchOutcome};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Public entry point
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Run the interactive chat REPL until `/exit` or Ctrl+D.
pub async fn chat(
    config: Arc<Config>,
    mode: Option<DispatchMode>,
    model: Option<String>,
) -> anyhow::Result<()> {
    // 1. Boot the runtime (halts here on a bad key).
    let runtime = bootstrap::build_runtime(config.clone()).await?;
    let mut session = runtime.session(mode, model);

    // 2. Readline editor, optionally with persistent history.
    let history_path = if config.chat.history_file {
        dirs::home_dir().map(|home| home.join(".battleborn").join("chat_history.txt"))
    } else {
        None
    };
    if let Some(parent) = history_path.as_ref().and_then(|p| p.parent()) {
        std::fs::create_dir_all(parent).ok();
    }
    let mut rl = rustyline::DefaultEditor::new()?;
    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    // 3. Banner.
    eprintln!("{}", config.chat.title);
    eprintln!("{}", config.chat.caption);
    eprintln!("Mode: {}  |  Type /help for commands, Ctrl+D to exit", session.mode());
    eprintln!();
    eprintln!("\x1B[2m{}\x1B[0m", config.chat.placeholder);

    // 4. REPL loop.
    loop {
        match rl.readline("you> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                rl.add_history_entry(&line).ok();

                if trimmed.starts_with('/') {
                    if handle_slash_command(trimmed, &mut session) {
                        break;
                    }
                    continue;
                }

                let outcome = dispatch_with_indicator(&mut session, trimmed).await;
                print_outcome(&outcome);
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                eprintln!("(Use Ctrl+D or /exit to quit)");
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                break;
            }
            Err(e) => {
                eprintln!("\x1B[31mreadline error: {e}\x1B[0m");
                break;
            }
        }
    }

    // 5. Save history.
    if let Some(ref path) = history_path {
        rl.save_history(path).ok();
    }

    eprintln!("Goodbye!");
    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Dispatch + rendering
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Show `Thinking...` on stderr for as long as the dispatch runs.
async fn dispatch_with_indicator(session: &mut ChatSession, text: &str) -> DispatchOutcome {
    eprint!("\x1B[2mThinking...\x1B[0m");
    std::io::stderr().flush().ok();

    let outcome = session.handle_utterance(text).await;

    // Erase the indicator line.
    eprint!("\r\x1B[2K");
    std::io::stderr().flush().ok();
    outcome
}

fn print_outcome(outcome: &DispatchOutcome) {
    match outcome {
        DispatchOutcome::Reply(text) => {
            println!("{text}");
            println!();
        }
        DispatchOutcome::Empty => {
            eprintln!("\x1B[33m(the assistant returned an empty response)\x1B[0m");
            eprintln!();
        }
        DispatchOutcome::Diagnostic(message) => {
            eprintln!("\x1B[31m{message}\x1B[0m");
            eprintln!();
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Slash command handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Process a slash command.  Returns `true` if the REPL should exit.
fn handle_slash_command(input: &str, session: &mut ChatSession) -> bool {
    let (cmd, arg) = match input.split_once(' ') {
        Some((cmd, rest)) => (cmd, Some(rest.trim()).filter(|s| !s.is_empty())),
        None => (input, None),
    };

    match cmd {
        "/exit" | "/quit" => return true,

        "/history" => {
            if session.log().is_empty() {
                eprintln!("(no turns yet)");
            }
            for turn in session.log() {
                let who = match turn.role() {
                    TurnRole::User => "you",
                    TurnRole::Assistant => "assistant",
                };
                println!("{who}> {}", turn.content());
            }
        }

        "/reset" => {
            session.reset();
            eprintln!("Session reset. New session: {}", session.log().session_id());
        }

        "/mode" => match arg.map(str::parse::<DispatchMode>) {
            Some(Ok(mode)) => {
                session.set_mode(mode);
                eprintln!("Mode set to: {mode}");
            }
            Some(Err(e)) => eprintln!("{e}"),
            None => {
                eprintln!("Current mode: {}", session.mode());
                eprintln!("Usage: /mode <tools|completion>");
            }
        },

        "/model" => {
            if let Some(name) = arg {
                session.set_model(Some(name.to_string()));
                eprintln!("Model set to: {name}");
            } else {
                let current = session
                    .model()
                    .unwrap_or_else(|| session.provider().default_model());
                eprintln!("Current model: {current}");
                eprintln!("Usage: /model <name>");
            }
        }

        "/clear" => {
            // ANSI escape: clear screen and move cursor to top-left.
            eprint!("\x1B[2J\x1B[1;1H");
        }

        "/help" => {
            eprintln!("Commands:");
            eprintln!("  /history         Replay this conversation");
            eprintln!("  /reset           Forget the conversation and start over");
            eprintln!("  /mode <name>     Switch dispatcher (tools or completion)");
            eprintln!("  /model <name>    Set the model (e.g. gemini-1.5-pro)");
            eprintln!("  /clear           Clear the screen");
            eprintln!("  /exit, /quit     Exit the chat");
            eprintln!("  /help            Show this help");
        }

        other => {
            eprintln!("Unknown command: {other}  (type /help for a list)");
        }
    }

    false
}
