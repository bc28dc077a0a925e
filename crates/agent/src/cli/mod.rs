pub mod chat;
pub mod config;
pub mod doctor;
pub mod run;
pub mod submit;

use clap::{Args, Parser, Subcommand};

use bb_domain::config::DispatchMode;

/// BattleBorn Infrastructures support assistant.
#[derive(Debug, Parser)]
#[command(name = "battleborn", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive chat (default when no subcommand is given).
    Chat {
        /// Dispatcher: "tools" (multi-turn, intake tool) or "completion".
        #[arg(long)]
        mode: Option<DispatchMode>,
        /// Model override (e.g. "gemini-1.5-pro").
        #[arg(long)]
        model: Option<String>,
    },
    /// Send a single message and print the reply.
    Run {
        /// The message to send.
        message: String,
        #[arg(long)]
        mode: Option<DispatchMode>,
        #[arg(long)]
        model: Option<String>,
        /// Print the outcome as JSON instead of plain text.
        #[arg(long)]
        json: bool,
    },
    /// POST a service request to the intake webhook and print the result.
    Submit(SubmitArgs),
    /// Run diagnostic checks against the current configuration.
    Doctor,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Args)]
pub struct SubmitArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub service_type: String,
    /// Residential or Commercial.
    #[arg(long)]
    pub site_type: String,
    /// Site zip code.
    #[arg(long)]
    pub location: String,
    #[arg(long)]
    pub issue: String,
    #[arg(long)]
    pub urgency: String,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
    /// Store the API key in the OS keychain under [llm.auth] service/account.
    SetSecret,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path in `BB_CONFIG` (or `config.toml`
/// by default). A missing file yields the defaults.
///
/// Returns the parsed [`Config`](bb_domain::config::Config) and the path
/// that was used.
pub fn load_config() -> anyhow::Result<(bb_domain::config::Config, String)> {
    let config_path = std::env::var("BB_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let config = load_config_from(&config_path)?;
    Ok((config, config_path))
}

pub fn load_config_from(config_path: &str) -> anyhow::Result<bb_domain::config::Config> {
    if !std::path::Path::new(config_path).exists() {
        return Ok(bb_domain::config::Config::default());
    }
    let raw = std::fs::read_to_string(config_path)
        .map_err(|e| anyhow::anyhow!("reading {config_path}: {e}"))?;
    toml::from_str(&raw).map_err(|e| anyhow::anyhow!("parsing {config_path}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let cfg = load_config_from("/definitely/not/here/config.toml").unwrap();
        assert_eq!(cfg.llm.model, "gemini-1.5-flash");
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[agent]\nmode = \"completion\"\n[llm]\nmodel = \"gemini-2.0-flash\"").unwrap();
        let cfg = load_config_from(file.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.agent.mode, DispatchMode::Completion);
        assert_eq!(cfg.llm.model, "gemini-2.0-flash");
    }

    #[test]
    fn malformed_file_names_the_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[agent\nmode = ").unwrap();
        let path = file.path().to_str().unwrap().to_owned();
        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains(&path));
    }

    #[test]
    fn cli_parses_mode_flag() {
        let cli = Cli::parse_from(["battleborn", "run", "hello", "--mode", "completion"]);
        match cli.command {
            Some(Command::Run { message, mode, .. }) => {
                assert_eq!(message, "hello");
                assert_eq!(mode, Some(DispatchMode::Completion));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn no_subcommand_means_chat() {
        let cli = Cli::parse_from(["battleborn"]);
        assert!(cli.command.is_none());
    }
}
