//! Service-request intake: the one webhook the model can trigger.
//!
//! The submission is total. Every outcome, including transport failure,
//! becomes a single human-readable line that is handed back to the model
//! as the tool result.

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use bb_domain::config::IntakeConfig;
use bb_domain::error::{describe_chain, Error, Result};
use bb_domain::tool::ToolDefinition;
use bb_domain::trace::TraceEvent;

use crate::registry::LocalTool;

pub const TOOL_NAME: &str = "submit_service_request";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Wire record
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// JSON body POSTed to the intake webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub customer_name: String,
    pub contact_email: String,
    pub phone_number: String,
    pub service_requested: String,
    pub site_type: String,
    pub location_zip: String,
    pub issue_summary: String,
    pub urgency_level: String,
    pub source: String,
}

/// Arguments as the model supplies them in the function call.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceRequestArgs {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service_type: String,
    pub site_type: String,
    pub location: String,
    pub issue_description: String,
    pub urgency: String,
}

impl ServiceRequestArgs {
    pub fn into_request(self, source: impl Into<String>) -> ServiceRequest {
        ServiceRequest {
            customer_name: self.name,
            contact_email: self.email,
            phone_number: self.phone,
            service_requested: self.service_type,
            site_type: self.site_type,
            location_zip: self.location,
            issue_summary: self.issue_description,
            urgency_level: self.urgency,
            source: source.into(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Submission
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// What happened to one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Webhook answered 200 or 201.
    Logged { customer_name: String },
    /// Webhook answered with any other status.
    Rejected { status: u16 },
    /// The request never got a response.
    Unreachable { error: String },
}

impl SubmissionOutcome {
    pub fn is_logged(&self) -> bool {
        matches!(self, Self::Logged { .. })
    }
}

impl fmt::Display for SubmissionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Logged { customer_name } => write!(
                f,
                "Success! The request for {customer_name} has been securely logged."
            ),
            Self::Rejected { status } => {
                write!(f, "Request sent, but server responded with status: {status}.")
            }
            Self::Unreachable { error } => {
                write!(f, "Error communicating with the server: {error}")
            }
        }
    }
}

/// POST `request` to `endpoint` exactly once.
///
/// The response body is never read.
pub async fn submit(
    client: &reqwest::Client,
    endpoint: &str,
    request: &ServiceRequest,
) -> SubmissionOutcome {
    let start = Instant::now();

    // `.json()` sets `Content-Type: application/json`.
    let result = client.post(endpoint).json(request).send().await;

    let status = result.as_ref().ok().map(|resp| resp.status().as_u16());

    TraceEvent::IntakeSubmitted {
        status,
        duration_ms: start.elapsed().as_millis() as u64,
    }
    .emit();

    match result {
        Ok(resp) => {
            let status = resp.status().as_u16();
            if status == 200 || status == 201 {
                tracing::info!(status, "service request logged");
                SubmissionOutcome::Logged {
                    customer_name: request.customer_name.clone(),
                }
            } else {
                tracing::warn!(status, "intake webhook returned non-success status");
                SubmissionOutcome::Rejected { status }
            }
        }
        Err(e) => {
            let error = describe_chain(&e);
            tracing::warn!(error = %error, "intake webhook unreachable");
            SubmissionOutcome::Unreachable { error }
        }
    }
}

/// [`submit`] rendered as the status line handed back to the model.
pub async fn submit_service_request(
    client: &reqwest::Client,
    endpoint: &str,
    request: &ServiceRequest,
) -> String {
    submit(client, endpoint, request).await.to_string()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tool adapter
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Exposes [`submit_service_request`] to the model.
pub struct IntakeTool {
    client: reqwest::Client,
    webhook_url: String,
    source: String,
}

impl IntakeTool {
    pub fn new(config: &IntakeConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &IntakeConfig) -> Self {
        Self {
            client,
            webhook_url: config.webhook_url.clone(),
            source: config.source.clone(),
        }
    }

    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }
}

#[async_trait::async_trait]
impl LocalTool for IntakeTool {
    fn definition(&self) -> ToolDefinition {
        let field = |description: &str| {
            serde_json::json!({ "type": "string", "description": description })
        };
        ToolDefinition {
            name: TOOL_NAME.into(),
            description: "Submits a structured service request directly to the backend.".into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "name": field("Customer full name"),
                    "email": field("Contact email address"),
                    "phone": field("Contact phone number"),
                    "service_type": field("Requested service, e.g. design, install, repair"),
                    "site_type": field("Residential or Commercial"),
                    "location": field("Site zip code"),
                    "issue_description": field("Short summary of the issue or request"),
                    "urgency": field("How urgent the request is"),
                },
                "required": [
                    "name", "email", "phone", "service_type",
                    "site_type", "location", "issue_description", "urgency"
                ]
            }),
        }
    }

    async fn call(&self, args: serde_json::Value) -> Result<String> {
        let args: ServiceRequestArgs =
            serde_json::from_value(args).map_err(|e| Error::Tool {
                tool: TOOL_NAME.into(),
                message: format!("invalid arguments: {e}"),
            })?;
        let request = args.into_request(self.source.clone());
        Ok(submit_service_request(&self.client, &self.webhook_url, &request).await)
    }
}
