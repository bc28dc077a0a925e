use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bb_agent::cli::{self, Cli, Command, ConfigCommand};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_cli_tracing();

    match cli.command {
        // Default to chat when no subcommand is given.
        None => {
            let (config, _) = cli::load_config()?;
            cli::chat::chat(Arc::new(config), None, None).await
        }
        Some(Command::Chat { mode, model }) => {
            let (config, _) = cli::load_config()?;
            cli::chat::chat(Arc::new(config), mode, model).await
        }
        Some(Command::Run { message, mode, model, json }) => {
            let (config, _) = cli::load_config()?;
            cli::run::run(Arc::new(config), message, mode, model, json).await
        }
        Some(Command::Submit(args)) => {
            let (config, _) = cli::load_config()?;
            let outcome = cli::submit::submit(&config, args).await;
            if !outcome.is_logged() {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::Doctor) => {
            let (config, config_path) = cli::load_config()?;
            let passed = cli::doctor::run(&config, &config_path).await?;
            if !passed {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::Config(ConfigCommand::Validate)) => {
            let (config, config_path) = cli::load_config()?;
            let valid = cli::config::validate(&config, &config_path);
            if !valid {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::Config(ConfigCommand::Show)) => {
            let (config, _) = cli::load_config()?;
            cli::config::show(&config)
        }
        Some(Command::Config(ConfigCommand::SetSecret)) => {
            let (config, _) = cli::load_config()?;
            cli::config::set_secret(&config)
        }
        Some(Command::Version) => {
            println!("battleborn {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Compact stderr logging for an interactive CLI.
///
/// Quiet by default so log lines don't interleave with the conversation;
/// `RUST_LOG=bb_agent=debug` shows the tool loop.
fn init_cli_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
