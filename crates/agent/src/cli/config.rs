use bb_domain::config::{Config, ConfigSeverity};
use bb_providers::util::{mask_secret, store_in_keychain};

/// Parse and validate the config, printing any issues.
///
/// Returns `true` when no errors (warnings allowed) were found.
pub fn validate(config: &Config, config_path: &str) -> bool {
    let issues = config.validate();

    if issues.is_empty() {
        println!("Config OK ({config_path})");
        return true;
    }

    let error_count = issues
        .iter()
        .filter(|e| e.severity == ConfigSeverity::Error)
        .count();
    let warning_count = issues.len() - error_count;

    for issue in &issues {
        println!("{issue}");
    }

    println!(
        "\n{} error(s), {} warning(s) in {config_path}",
        error_count, warning_count,
    );

    error_count == 0
}

/// Dump the resolved config (with all defaults filled in) as TOML.
///
/// A plaintext `llm.auth.key` is masked.
pub fn show(config: &Config) -> anyhow::Result<()> {
    let mut redacted = config.clone();
    if let Some(ref key) = redacted.llm.auth.key {
        redacted.llm.auth.key = Some(mask_secret(key));
    }
    let output = toml::to_string_pretty(&redacted)
        .map_err(|e| anyhow::anyhow!("serializing config: {e}"))?;
    print!("{output}");
    Ok(())
}

/// Prompt for the API key without echo and store it in the OS keychain.
///
/// `[llm.auth]` must name a `service` and `account`; those are the
/// coordinates the key is later resolved from.
pub fn set_secret(config: &Config) -> anyhow::Result<()> {
    let auth = &config.llm.auth;
    let (Some(service), Some(account)) = (auth.service.as_deref(), auth.account.as_deref()) else {
        anyhow::bail!(
            "set [llm.auth] service and account first, e.g.\n\n\
             [llm.auth]\nservice = \"battleborn\"\naccount = \"google-api-key\""
        );
    };

    let secret =
        rpassword::prompt_password_stderr(&format!("API key for {service}/{account}: "))?;
    let secret = secret.trim();
    if secret.is_empty() {
        anyhow::bail!("empty key, nothing stored");
    }

    store_in_keychain(service, account, secret)?;
    eprintln!("Stored {} in the OS keychain ({service}/{account}).", mask_secret(secret));
    Ok(())
}
