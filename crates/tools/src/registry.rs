//! Tool registry: maps tool names to handlers and produces the declaration
//! list handed to the model.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use bb_domain::error::Result;
use bb_domain::tool::ToolDefinition;
use bb_domain::trace::TraceEvent;

/// Implement this trait to expose a function the model may call.
///
/// # Example
///
/// ```rust,no_run
/// use bb_domain::tool::ToolDefinition;
/// use bb_tools::LocalTool;
///
/// struct PingTool;
///
/// #[async_trait::async_trait]
/// impl LocalTool for PingTool {
///     fn definition(&self) -> ToolDefinition {
///         ToolDefinition {
///             name: "ping".into(),
///             description: "Answers pong.".into(),
///             parameters: serde_json::json!({ "type": "object", "properties": {} }),
///         }
///     }
///
///     async fn call(&self, _args: serde_json::Value) -> bb_domain::error::Result<String> {
///         Ok("pong".into())
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait LocalTool: Send + Sync + 'static {
    /// Declaration sent to the model (name, description, JSON schema).
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with the model-supplied JSON arguments.
    async fn call(&self, args: serde_json::Value) -> Result<String>;
}

/// Registry of tool handlers keyed by lowercase name.
///
/// A `BTreeMap` keeps [`definitions`](Self::definitions) in a stable order
/// so repeated requests declare tools identically.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn LocalTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under the name from its own definition.
    ///
    /// Returns `&mut Self` for method chaining.
    pub fn register<T: LocalTool>(&mut self, tool: T) -> &mut Self {
        self.register_boxed(Arc::new(tool))
    }

    /// Register a pre-wrapped tool handler.
    pub fn register_boxed(&mut self, tool: Arc<dyn LocalTool>) -> &mut Self {
        let name = tool.definition().name.to_ascii_lowercase();
        self.tools.insert(name, tool);
        self
    }

    /// Look up a handler (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&Arc<dyn LocalTool>> {
        self.tools.get(&name.to_ascii_lowercase())
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Run one tool call and return `(content, is_error)`.
    ///
    /// Never fails: unknown tools and handler errors come back as error
    /// content so the model can see what went wrong and recover.
    pub async fn dispatch(&self, name: &str, args: &serde_json::Value) -> (String, bool) {
        let start = Instant::now();

        let (content, is_error) = match self.get(name) {
            Some(tool) => match tool.call(args.clone()).await {
                Ok(out) => (out, false),
                Err(e) => (e.to_string(), true),
            },
            None => (format!("unknown tool: {name}"), true),
        };

        if is_error {
            tracing::warn!(tool = %name, error = %content, "tool call failed");
        }

        TraceEvent::ToolDispatched {
            tool_name: name.to_owned(),
            is_error,
            duration_ms: start.elapsed().as_millis() as u64,
        }
        .emit();

        (content, is_error)
    }
}
