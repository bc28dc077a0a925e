/// Shared error type used across all BattleBorn crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("provider {provider}: {message}")]
    Provider { provider: String, message: String },

    #[error("tool {tool}: {message}")]
    Tool { tool: String, message: String },

    #[error("config: {0}")]
    Config(String),

    #[error("auth: {0}")]
    Auth(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Render an error followed by its `source()` chain, joined with `": "`.
///
/// Segments equal to the previous one are skipped, since some wrappers
/// repeat their inner error verbatim.
pub fn describe_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut last = out.clone();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if text != last && !text.is_empty() {
            out.push_str(": ");
            out.push_str(&text);
        }
        last = text;
        source = inner.source();
    }
    out
}
