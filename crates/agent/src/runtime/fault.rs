//! Turns provider faults into the one line of text the user sees.

use bb_domain::error::Error;

const CREDENTIAL_MARKERS: &[&str] = &[
    "API_KEY_INVALID",
    "API key not valid",
    "PERMISSION_DENIED",
    "UNAUTHENTICATED",
    "HTTP 401",
    "HTTP 403",
];

const RATE_LIMIT_MARKERS: &[&str] = &["RESOURCE_EXHAUSTED", "HTTP 429", "rate limit", "quota"];

/// Actionable follow-up attached to a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultHint {
    Credential,
    RateLimit,
}

impl FaultHint {
    pub fn text(&self) -> &'static str {
        match self {
            Self::Credential => {
                "Hint: the model provider rejected the API key. Check GOOGLE_API_KEY \
                 (or the key source in [llm.auth]) and try again."
            }
            Self::RateLimit => {
                "Hint: the model provider is rate limiting this key. Wait a moment \
                 and retry, or check the quota for the project."
            }
        }
    }
}

/// Classify a fault by its kind and by known substrings in its text.
///
/// Credential problems win over rate limiting when both match.
pub fn classify(err: &Error) -> Option<FaultHint> {
    if matches!(err, Error::Auth(_)) {
        return Some(FaultHint::Credential);
    }
    let text = err.to_string().to_ascii_lowercase();
    let hit = |markers: &[&str]| {
        markers
            .iter()
            .any(|m| text.contains(&m.to_ascii_lowercase()))
    };
    if hit(CREDENTIAL_MARKERS) {
        Some(FaultHint::Credential)
    } else if hit(RATE_LIMIT_MARKERS) {
        Some(FaultHint::RateLimit)
    } else {
        None
    }
}

/// Render a fault as a user-visible diagnostic: the raw fault text,
/// followed by a hint line when one applies.
pub fn render_fault(err: &Error) -> String {
    render_with_hint("Something went wrong talking to the assistant", err)
}

/// `"{lead}: {err}"`, plus the hint line for the fault when there is one.
pub fn render_with_hint(lead: &str, err: &Error) -> String {
    let mut out = format!("{lead}: {err}");
    if let Some(hint) = classify(err) {
        out.push('\n');
        out.push_str(hint.text());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(message: &str) -> Error {
        Error::Provider {
            provider: "google".into(),
            message: message.into(),
        }
    }

    #[test]
    fn api_key_invalid_gets_credential_hint() {
        let err = provider(r#"HTTP 400 - {"error":{"details":[{"reason":"API_KEY_INVALID"}]}}"#);
        let rendered = render_fault(&err);
        assert!(rendered.contains("API_KEY_INVALID"));
        assert!(rendered.contains(FaultHint::Credential.text()));
    }

    #[test]
    fn auth_kind_is_credential_even_without_markers() {
        let err = Error::Auth("no API key configured".into());
        assert_eq!(classify(&err), Some(FaultHint::Credential));
    }

    #[test]
    fn rate_limit_markers_are_case_insensitive() {
        assert_eq!(
            classify(&provider("HTTP 429 - RESOURCE_EXHAUSTED")),
            Some(FaultHint::RateLimit)
        );
        assert_eq!(
            classify(&provider("Quota exceeded for metric")),
            Some(FaultHint::RateLimit)
        );
        assert_eq!(
            classify(&provider("Rate Limit hit")),
            Some(FaultHint::RateLimit)
        );
    }

    #[test]
    fn plain_network_fault_has_no_hint() {
        let err = Error::Http("connection refused".into());
        assert_eq!(classify(&err), None);
        let rendered = render_fault(&err);
        assert!(rendered.contains("connection refused"));
        assert!(!rendered.contains("Hint:"));
    }

    #[test]
    fn forbidden_status_is_credential() {
        assert_eq!(
            classify(&provider("HTTP 403 - PERMISSION_DENIED")),
            Some(FaultHint::Credential)
        );
    }
}
