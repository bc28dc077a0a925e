//! Google Gemini adapter.
//!
//! Implements the Gemini `generateContent` API with function declarations.
//! Auth is via an API key passed as a query parameter (`key={api_key}`).

use std::time::{Duration, Instant};

use crate::traits::{ChatRequest, ChatResponse, LlmProvider, Usage};
use crate::util::from_reqwest;
use bb_domain::config::LlmConfig;
use bb_domain::error::{Error, Result};
use bb_domain::tool::{ContentPart, Message, MessageContent, Role, ToolCall, ToolDefinition};
use bb_domain::trace::TraceEvent;
use serde_json::Value;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Adapter struct
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// An LLM provider adapter for the Google Gemini API.
pub struct GoogleProvider {
    id: String,
    base_url: String,
    api_key: String,
    default_model: String,
    client: reqwest::Client,
}

impl GoogleProvider {
    /// Create a new provider from the LLM config and an already-resolved key.
    pub fn new(cfg: &LlmConfig, api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::Auth("resolved API key is empty".into()));
        }

        let mut builder = reqwest::Client::builder();
        if cfg.timeout_ms > 0 {
            builder = builder.timeout(Duration::from_millis(cfg.timeout_ms));
        }
        let client = builder.build().map_err(from_reqwest)?;

        Ok(Self {
            id: cfg.provider_id.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
            default_model: cfg.model.clone(),
            client,
        })
    }

    // ── Internal helpers ───────────────────────────────────────────

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        )
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}?key={}", self.base_url, model, self.api_key)
    }

    fn provider_error(&self, status: reqwest::StatusCode, body: &str) -> Error {
        Error::Provider {
            provider: self.id.clone(),
            message: format!("HTTP {} - {}", status.as_u16(), body),
        }
    }
}

/// Build the `generateContent` request body.
pub(crate) fn build_body(req: &ChatRequest) -> Value {
    let mut contents: Vec<Value> = Vec::new();
    let mut system_instruction: Option<Value> = None;

    for msg in &req.messages {
        match msg.role {
            Role::System => {
                let text = msg.content.extract_all_text();
                system_instruction = Some(serde_json::json!({
                    "parts": [{"text": text}]
                }));
            }
            Role::User => contents.push(user_to_gemini(msg)),
            Role::Assistant => contents.push(assistant_to_gemini(msg)),
            Role::Tool => contents.push(tool_result_to_gemini(msg)),
        }
    }

    let mut body = serde_json::json!({
        "contents": contents,
    });

    if let Some(si) = system_instruction {
        body["systemInstruction"] = si;
    }

    if !req.tools.is_empty() {
        let function_declarations: Vec<Value> = req.tools.iter().map(tool_to_gemini).collect();
        body["tools"] = serde_json::json!([{
            "functionDeclarations": function_declarations,
        }]);
    }

    // Generation config.
    let mut gen_config = serde_json::json!({});
    if let Some(temp) = req.temperature {
        gen_config["temperature"] = serde_json::json!(temp);
    }
    if let Some(max) = req.max_tokens {
        gen_config["maxOutputTokens"] = serde_json::json!(max);
    }
    if gen_config.as_object().is_some_and(|o| !o.is_empty()) {
        body["generationConfig"] = gen_config;
    }

    body
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Message serialization helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn user_to_gemini(msg: &Message) -> Value {
    serde_json::json!({
        "role": "user",
        "parts": [{"text": msg.content.extract_all_text()}],
    })
}

fn assistant_to_gemini(msg: &Message) -> Value {
    let mut parts: Vec<Value> = Vec::new();
    match &msg.content {
        MessageContent::Text(t) => {
            parts.push(serde_json::json!({"text": t}));
        }
        MessageContent::Parts(ps) => {
            for p in ps {
                match p {
                    ContentPart::Text { text } => {
                        parts.push(serde_json::json!({"text": text}));
                    }
                    ContentPart::ToolUse { id: _, name, input } => {
                        parts.push(serde_json::json!({
                            "functionCall": {
                                "name": name,
                                "args": input,
                            }
                        }));
                    }
                    ContentPart::ToolResult { .. } => {}
                }
            }
        }
    }
    serde_json::json!({
        "role": "model",
        "parts": parts,
    })
}

fn tool_result_to_gemini(msg: &Message) -> Value {
    let mut parts: Vec<Value> = Vec::new();
    match &msg.content {
        MessageContent::Parts(ps) => {
            for p in ps {
                if let ContentPart::ToolResult {
                    name,
                    content,
                    is_error,
                    ..
                } = p
                {
                    let response = if *is_error {
                        serde_json::json!({ "error": content })
                    } else {
                        serde_json::json!({ "result": content })
                    };
                    parts.push(serde_json::json!({
                        "functionResponse": {
                            "name": name,
                            "response": response,
                        }
                    }));
                }
            }
        }
        MessageContent::Text(t) => {
            parts.push(serde_json::json!({
                "functionResponse": {
                    "name": "unknown",
                    "response": { "result": t },
                }
            }));
        }
    }
    // Gemini expects function responses under the `function` role.
    serde_json::json!({
        "role": "function",
        "parts": parts,
    })
}

fn tool_to_gemini(tool: &ToolDefinition) -> Value {
    serde_json::json!({
        "name": tool.name,
        "description": tool.description,
        "parameters": tool.parameters,
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Response deserialization
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub(crate) fn parse_gemini_response(body: &Value, model: &str) -> Result<ChatResponse> {
    let usage = body.get("usageMetadata").and_then(parse_gemini_usage);

    let Some(candidate) = body
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|a| a.first())
    else {
        // A blocked prompt comes back with feedback and no candidates; that
        // is an empty answer, not a malformed response.
        if let Some(reason) = body
            .get("promptFeedback")
            .and_then(|f| f.get("blockReason"))
            .and_then(|r| r.as_str())
        {
            return Ok(ChatResponse {
                content: String::new(),
                tool_calls: Vec::new(),
                usage,
                model: model.to_string(),
                finish_reason: Some(format!("blocked:{}", reason.to_lowercase())),
            });
        }
        return Err(Error::Provider {
            provider: "google".into(),
            message: "no candidates in response".into(),
        });
    };

    let parts = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array());

    let mut text_content = String::new();
    let mut tool_calls: Vec<ToolCall> = Vec::new();

    if let Some(parts) = parts {
        for part in parts {
            if let Some(text) = part.get("text").and_then(|v| v.as_str()) {
                text_content.push_str(text);
            }
            if let Some(fc) = part.get("functionCall") {
                let tool_name = fc
                    .get("name")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string();
                let arguments = fc
                    .get("args")
                    .cloned()
                    .unwrap_or(Value::Object(Default::default()));
                let call_id = format!("call_{}", uuid::Uuid::new_v4());
                tool_calls.push(ToolCall {
                    call_id,
                    tool_name,
                    arguments,
                });
            }
        }
    }

    let finish_reason = candidate
        .get("finishReason")
        .and_then(|v| v.as_str())
        .map(|s| match s {
            "STOP" => "stop".to_string(),
            "MAX_TOKENS" => "length".to_string(),
            other => other.to_lowercase(),
        });

    Ok(ChatResponse {
        content: text_content,
        tool_calls,
        usage,
        model: model.to_string(),
        finish_reason,
    })
}

fn parse_gemini_usage(v: &Value) -> Option<Usage> {
    let prompt = v.get("promptTokenCount")?.as_u64()? as u32;
    let completion = v
        .get("candidatesTokenCount")
        .and_then(|c| c.as_u64())
        .unwrap_or(0) as u32;
    let total = v
        .get("totalTokenCount")
        .and_then(|v| v.as_u64())
        .unwrap_or((prompt + completion) as u64) as u32;
    Some(Usage {
        prompt_tokens: prompt,
        completion_tokens: completion,
        total_tokens: total,
    })
}

/// Redact API key from URL for safe logging.
pub(crate) fn redact_url_key(url: &str) -> String {
    if let Some(idx) = url.find("key=") {
        let prefix = &url[..idx + 4];
        let rest = &url[idx + 4..];
        let end = rest.find('&').unwrap_or(rest.len());
        format!("{prefix}[REDACTED]{}", &rest[end..])
    } else {
        url.to_string()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait::async_trait]
impl LlmProvider for GoogleProvider {
    async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse> {
        let model = req
            .model
            .clone()
            .unwrap_or_else(|| self.default_model.clone());
        let url = self.generate_url(&model);
        let body = build_body(req);
        let started = Instant::now();

        tracing::debug!(provider = %self.id, url = %redact_url_key(&url), "google chat request");

        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = resp.status();
        let resp_text = resp.text().await.map_err(from_reqwest)?;

        if !status.is_success() {
            tracing::warn!(provider = %self.id, status = status.as_u16(), "google chat rejected");
            return Err(self.provider_error(status, &resp_text));
        }

        let resp_json: Value = serde_json::from_str(&resp_text)?;
        let parsed = parse_gemini_response(&resp_json, &model)?;

        TraceEvent::LlmRequest {
            provider: self.id.clone(),
            model,
            tools: req.tools.len(),
            duration_ms: started.elapsed().as_millis() as u64,
            prompt_tokens: parsed.usage.map(|u| u.prompt_tokens),
            completion_tokens: parsed.usage.map(|u| u.completion_tokens),
        }
        .emit();

        Ok(parsed)
    }

    async fn verify_credentials(&self) -> Result<()> {
        let url = self.model_url(&self.default_model);
        tracing::debug!(provider = %self.id, url = %redact_url_key(&url), "google credential probe");

        let resp = self.client.get(&url).send().await.map_err(from_reqwest)?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().await.map_err(from_reqwest)?;
        Err(self.provider_error(status, &body))
    }

    fn provider_id(&self) -> &str {
        &self.id
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
