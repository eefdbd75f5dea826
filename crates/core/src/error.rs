//! Error types for the ragent domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum. Only [`AgentError`] ever
//! reaches the caller of a run; tool errors become observations.

use thiserror::Error;

/// Failures that abort an agent run.
///
/// Per-iteration problems (unparsable completions, tool failures) never
/// surface here: the executor folds them into the scratchpad instead.
#[derive(Debug, Clone, Error)]
pub enum AgentError {
    #[error("Language model unavailable: {0}")]
    ModelUnavailable(#[source] ProviderError),

    #[error("Agent stopped after reaching the iteration limit ({max_iterations}) without a final answer")]
    IterationLimitExceeded { max_iterations: u32 },
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Tool execution failed: {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Tool timed out: {tool_name} after {timeout_secs}s")]
    Timeout { tool_name: String, timeout_secs: u64 },
}
