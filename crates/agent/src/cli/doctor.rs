use bb_domain::config::{Config, ConfigSeverity, DispatchMode, PLACEHOLDER_WEBHOOK_URL};
use bb_providers::util::{mask_secret, resolve_api_key};
use bb_providers::{GoogleProvider, LlmProvider};

use crate::runtime::fault::classify;

/// Run all diagnostic checks and print a summary.
///
/// Returns `Ok(true)` when every check passes, `Ok(false)` when at least
/// one check failed.
pub async fn run(config: &Config, config_path: &str) -> anyhow::Result<bool> {
    println!("battleborn doctor");
    println!("=================\n");

    let mut all_passed = true;

    // 1. Config file
    check_config_file(config_path, &mut all_passed);

    // 2. Config validation
    check_config_validation(config, &mut all_passed);

    // 3. API key + provider probe
    check_api_key(config, &mut all_passed).await;

    // 4. Intake webhook
    check_webhook(config, &mut all_passed);

    // Summary
    println!();
    if all_passed {
        println!("All checks passed.");
    } else {
        println!("Some checks failed. Review the output above.");
    }

    Ok(all_passed)
}

// ── Individual checks ─────────────────────────────────────────────────

fn check_config_file(config_path: &str, all_passed: &mut bool) {
    let exists = std::path::Path::new(config_path).exists();
    print_check(
        "Config file exists",
        exists,
        if exists {
            config_path.to_owned()
        } else {
            format!("{config_path} not found (using defaults)")
        },
    );
    if !exists {
        *all_passed = false;
    }
}

fn check_config_validation(config: &Config, all_passed: &mut bool) {
    let issues = config.validate();
    let error_count = issues
        .iter()
        .filter(|e| e.severity == ConfigSeverity::Error)
        .count();

    if issues.is_empty() {
        print_check("Config validation", true, "no issues".into());
    } else {
        print_check(
            "Config validation",
            error_count == 0,
            format!("{} issue(s) ({} error(s))", issues.len(), error_count),
        );
        for issue in &issues {
            println!("      {issue}");
        }
        if error_count > 0 {
            *all_passed = false;
        }
    }
}

async fn check_api_key(config: &Config, all_passed: &mut bool) {
    let key = match resolve_api_key(&config.llm.auth) {
        Ok(key) => {
            print_check("API key resolved", true, mask_secret(&key));
            key
        }
        Err(e) => {
            print_check("API key resolved", false, e.to_string());
            *all_passed = false;
            return;
        }
    };

    // Keep the probe short no matter what the chat timeout is.
    let mut probe_cfg = config.llm.clone();
    if probe_cfg.timeout_ms == 0 || probe_cfg.timeout_ms > 10_000 {
        probe_cfg.timeout_ms = 10_000;
    }

    let result = match GoogleProvider::new(&probe_cfg, key) {
        Ok(provider) => provider.verify_credentials().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => print_check(
            "Provider accepts key",
            true,
            format!("{} ({})", config.llm.base_url, config.llm.model),
        ),
        Err(e) => {
            let detail = match classify(&e) {
                Some(hint) => format!("{e}\n      {}", hint.text()),
                None => e.to_string(),
            };
            print_check("Provider accepts key", false, detail);
            *all_passed = false;
        }
    }
}

fn check_webhook(config: &Config, all_passed: &mut bool) {
    if config.agent.mode == DispatchMode::Completion {
        print_check("Intake webhook", true, "not used in completion mode".into());
        return;
    }

    let url = &config.intake.webhook_url;
    let ok = url != PLACEHOLDER_WEBHOOK_URL
        && reqwest::Url::parse(url).is_ok_and(|u| matches!(u.scheme(), "http" | "https"));

    print_check(
        "Intake webhook",
        ok,
        if url == PLACEHOLDER_WEBHOOK_URL {
            format!("{url} (placeholder, set [intake] webhook_url)")
        } else if ok {
            url.clone()
        } else {
            format!("{url} (not a valid http(s) URL)")
        },
    );

    if !ok {
        *all_passed = false;
    }
}

// ── Formatting helper ─────────────────────────────────────────────────

fn print_check(name: &str, passed: bool, detail: String) {
    let status = if passed { "PASS" } else { "FAIL" };
    println!("  [{status}] {name}: {detail}");
}
