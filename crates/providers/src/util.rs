//! Shared utility functions for provider adapters.

use std::path::Path;

use bb_domain::config::AuthConfig;
use bb_domain::error::{describe_chain, Error, Result};

/// Convert a [`reqwest::Error`] into the domain [`Error`] type.
///
/// Timeout errors map to [`Error::Timeout`]; everything else maps to
/// [`Error::Http`]. The request URL is stripped first: Gemini URLs carry
/// the API key as a query parameter. The source chain is kept so the
/// underlying cause (refused, DNS, TLS) stays visible.
pub fn from_reqwest(e: reqwest::Error) -> Error {
    let is_timeout = e.is_timeout();
    let text = describe_chain(&e.without_url());
    if is_timeout {
        Error::Timeout(text)
    } else {
        Error::Http(text)
    }
}

/// Resolve the API key from an [`AuthConfig`].
///
/// Precedence:
/// 1. `key` field (plaintext, warns)
/// 2. `service` + `account` → OS keychain via `keyring`
/// 3. `secrets_file` → TOML table entry named `secrets_key`
/// 4. `env` field (reads environment variable)
/// 5. Fallback for keychain mode: env var `{SERVICE}_{ACCOUNT}` uppercased
/// 6. Error
pub fn resolve_api_key(auth: &AuthConfig) -> Result<String> {
    // 1. Plaintext key (warn the user)
    if let Some(ref key) = auth.key {
        tracing::warn!(
            "API key loaded from plaintext config field 'key'; \
             prefer 'env' or the OS keychain instead"
        );
        return non_empty(key.clone(), "config field 'key'");
    }

    // 2. OS keychain via service + account
    if let (Some(ref service), Some(ref account)) = (&auth.service, &auth.account) {
        match resolve_from_keychain(service, account) {
            Ok(secret) => return non_empty(secret, "keychain"),
            Err(e) => {
                tracing::warn!(
                    service = %service,
                    account = %account,
                    error = %e,
                    "keychain lookup failed, falling through"
                );
            }
        }
    }

    // 3. Secrets file
    if let Some(ref path) = auth.secrets_file {
        match resolve_from_secrets_file(path, &auth.secrets_key) {
            Ok(secret) => return non_empty(secret, "secrets file"),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "secrets file lookup failed, falling through"
                );
            }
        }
    }

    // 4. Env var
    if let Some(ref env_var) = auth.env {
        if let Ok(val) = std::env::var(env_var) {
            return non_empty(val, env_var);
        }
        // Keep looking only when a keychain fallback could still apply.
        if auth.service.is_none() || auth.account.is_none() {
            return Err(Error::Auth(format!(
                "environment variable '{}' not set or not valid UTF-8",
                env_var
            )));
        }
    }

    // 5. Headless fallback: {SERVICE}_{ACCOUNT} uppercased
    if let (Some(ref service), Some(ref account)) = (&auth.service, &auth.account) {
        let fallback_var = keychain_fallback_env_name(service, account);
        if let Ok(val) = std::env::var(&fallback_var) {
            tracing::info!(
                env_var = %fallback_var,
                "API key resolved from keychain headless fallback env var"
            );
            return non_empty(val, &fallback_var);
        }
    }

    // 6. No key found
    Err(Error::Auth(
        "no API key configured: set 'key', 'env', 'secrets_file', or keychain \
         'service'+'account' in [llm.auth]"
            .into(),
    ))
}

fn non_empty(secret: String, origin: &str) -> Result<String> {
    if secret.trim().is_empty() {
        return Err(Error::Auth(format!("API key from {origin} is empty")));
    }
    Ok(secret)
}

/// Try to read a secret from the OS keychain.
///
/// Uses the `keyring` crate which wraps platform-native credential stores
/// (macOS Keychain, Windows Credential Manager, Linux Secret Service / D-Bus).
/// Returns an error on headless systems where no keychain daemon is available.
pub fn resolve_from_keychain(service: &str, account: &str) -> Result<String> {
    let entry = keyring::Entry::new(service, account)
        .map_err(|e| Error::Auth(format!("keyring entry creation failed: {e}")))?;
    entry
        .get_password()
        .map_err(|e| Error::Auth(format!("keyring get_password failed: {e}")))
}

/// Store a secret in the OS keychain.
pub fn store_in_keychain(service: &str, account: &str, secret: &str) -> Result<()> {
    let entry = keyring::Entry::new(service, account)
        .map_err(|e| Error::Auth(format!("keyring entry creation failed: {e}")))?;
    entry
        .set_password(secret)
        .map_err(|e| Error::Auth(format!("keyring set_password failed: {e}")))
}

/// Read a top-level string entry from a TOML secrets file
/// (e.g. `GOOGLE_API_KEY = "..."`).
pub fn resolve_from_secrets_file(path: &Path, key: &str) -> Result<String> {
    let raw = std::fs::read_to_string(path)?;
    let table: toml::Table = toml::from_str(&raw)
        .map_err(|e| Error::Config(format!("parsing {}: {e}", path.display())))?;
    table
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .ok_or_else(|| Error::Auth(format!("'{key}' not found in {}", path.display())))
}

/// Build the headless fallback env var name for a keychain service/account.
///
/// Uppercases both parts and replaces hyphens with underscores, then joins
/// with `_`. Example: `("battleborn", "google-api-key")` → `"BATTLEBORN_GOOGLE_API_KEY"`.
pub fn keychain_fallback_env_name(service: &str, account: &str) -> String {
    format!(
        "{}_{}",
        service.to_uppercase().replace('-', "_"),
        account.to_uppercase().replace('-', "_"),
    )
}

/// Mask a secret for display: keep the first and last four characters.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_sources() -> AuthConfig {
        AuthConfig {
            env: None,
            ..Default::default()
        }
    }

    #[test]
    fn fallback_env_name_basic() {
        assert_eq!(
            keychain_fallback_env_name("battleborn", "google-api-key"),
            "BATTLEBORN_GOOGLE_API_KEY"
        );
    }

    #[test]
    fn resolve_api_key_plaintext() {
        let auth = AuthConfig {
            key: Some("AIza-test-123".into()),
            ..no_sources()
        };
        assert_eq!(resolve_api_key(&auth).unwrap(), "AIza-test-123");
    }

    #[test]
    fn resolve_api_key_blank_plaintext_is_rejected() {
        let auth = AuthConfig {
            key: Some("  ".into()),
            ..no_sources()
        };
        let err = resolve_api_key(&auth).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn resolve_api_key_env_var() {
        let var_name = "BB_TEST_RESOLVE_ENV_KEY_1234";
        std::env::set_var(var_name, "env-secret-value");
        let auth = AuthConfig {
            env: Some(var_name.into()),
            ..no_sources()
        };
        assert_eq!(resolve_api_key(&auth).unwrap(), "env-secret-value");
        std::env::remove_var(var_name);
    }

    #[test]
    fn resolve_api_key_env_var_missing() {
        let auth = AuthConfig {
            env: Some("BB_TEST_NONEXISTENT_VAR_8888".into()),
            ..no_sources()
        };
        let err = resolve_api_key(&auth).unwrap_err();
        assert!(err.to_string().contains("BB_TEST_NONEXISTENT_VAR_8888"));
    }

    #[test]
    fn resolve_api_key_no_config() {
        let err = resolve_api_key(&no_sources()).unwrap_err();
        assert!(err.to_string().contains("no API key configured"));
    }

    #[test]
    fn resolve_api_key_from_secrets_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "GOOGLE_API_KEY = \"from-secrets-file\"").unwrap();
        let auth = AuthConfig {
            secrets_file: Some(file.path().to_path_buf()),
            ..no_sources()
        };
        assert_eq!(resolve_api_key(&auth).unwrap(), "from-secrets-file");
    }

    #[test]
    fn secrets_file_missing_entry_falls_through_to_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "OTHER = \"x\"").unwrap();
        let var_name = "BB_TEST_SECRETS_FALLTHROUGH_5555";
        std::env::set_var(var_name, "env-after-secrets");
        let auth = AuthConfig {
            secrets_file: Some(file.path().to_path_buf()),
            env: Some(var_name.into()),
            ..Default::default()
        };
        assert_eq!(resolve_api_key(&auth).unwrap(), "env-after-secrets");
        std::env::remove_var(var_name);
    }

    #[test]
    fn resolve_api_key_keychain_fallback_env() {
        // Keychain is unavailable in CI, so the headless fallback env var wins.
        let fallback_var = "BATTLEBORN_MY_PROVIDER";
        std::env::set_var(fallback_var, "fallback-secret");
        let auth = AuthConfig {
            service: Some("battleborn".into()),
            account: Some("my-provider".into()),
            ..no_sources()
        };
        assert_eq!(resolve_api_key(&auth).unwrap(), "fallback-secret");
        std::env::remove_var(fallback_var);
    }

    #[test]
    fn resolve_api_key_plaintext_takes_precedence() {
        let auth = AuthConfig {
            key: Some("plaintext-wins".into()),
            service: Some("battleborn".into()),
            account: Some("some-provider".into()),
            env: Some("BB_TEST_SHOULD_NOT_BE_READ".into()),
            ..Default::default()
        };
        assert_eq!(resolve_api_key(&auth).unwrap(), "plaintext-wins");
    }

    #[test]
    fn mask_secret_keeps_edges() {
        assert_eq!(mask_secret("AIzaSyABCDEFGH1234"), "AIza…1234");
        assert_eq!(mask_secret("short"), "*****");
    }
}
