//! Tool trait: the abstraction over agent capabilities.
//!
//! Every tool speaks the same text contract as the model it serves:
//! a string goes in, a string observation comes out. Tools validate their
//! own input and prefer returning a descriptive message over failing, so
//! the model can correct itself on the next iteration.

use async_trait::async_trait;
use futures::FutureExt;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::ToolError;

/// The core Tool trait.
///
/// Tools are registered in the [`ToolRegistry`] once at startup and are
/// read-only afterwards, so a single registry can be shared across
/// concurrent runs.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool. This is the token the model must emit
    /// on its `Action:` line.
    fn name(&self) -> &str;

    /// A description of what this tool does and what input it expects
    /// (shown to the model).
    fn description(&self) -> &str;

    /// Run the tool against the raw `Action Input` text.
    async fn invoke(&self, input: &str) -> Result<String, ToolError>;

    /// Convert this tool into a descriptor for prompt rendering.
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
        }
    }
}

/// Name and description of a registered tool, as shown to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
}

/// A registry of available tools.
///
/// The agent loop uses this to:
/// 1. Render the tool table and the list of valid names into the prompt
/// 2. Look up and execute tools when the model requests them
///
/// Tools are listed in registration order.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Replaces any existing tool with the same name,
    /// keeping its original position.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        match self.index.get(&name) {
            Some(&pos) => self.tools[pos] = tool,
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    /// Get a tool by exact name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.index.get(name).map(|&pos| self.tools[pos].as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Descriptors of all tools, in registration order.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor()).collect()
    }

    /// List all registered tool names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool by name.
    ///
    /// Fails with [`ToolError::UnknownTool`] when the name is not registered.
    /// Errors returned by the tool are normalised to
    /// [`ToolError::ExecutionFailed`], and a panic inside the tool is caught
    /// and reported the same way instead of unwinding into the caller.
    pub async fn dispatch(&self, name: &str, input: &str) -> Result<String, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        debug!(tool = name, input, "Dispatching tool");

        match AssertUnwindSafe(tool.invoke(input)).catch_unwind().await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(ToolError::ExecutionFailed { tool_name, reason })) => {
                Err(ToolError::ExecutionFailed { tool_name, reason })
            }
            Ok(Err(e)) => Err(ToolError::ExecutionFailed {
                tool_name: name.to_string(),
                reason: e.to_string(),
            }),
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                warn!(tool = name, %reason, "Tool panicked");
                Err(ToolError::ExecutionFailed {
                    tool_name: name.to_string(),
                    reason,
                })
            }
        }
    }

    /// [`dispatch`](Self::dispatch) bounded by a timeout.
    pub async fn dispatch_with_timeout(
        &self,
        name: &str,
        input: &str,
        timeout: Duration,
    ) -> Result<String, ToolError> {
        match tokio::time::timeout(timeout, self.dispatch(name, input)).await {
            Ok(result) => result,
            Err(_) => Err(ToolError::Timeout {
                tool_name: name.to_string(),
                timeout_secs: timeout.as_secs(),
            }),
        }
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("tool panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("tool panicked: {s}")
    } else {
        "tool panicked".into()
    }
}
