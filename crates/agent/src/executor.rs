//! Agent executor: the ReAct control loop.
//!
//! Each iteration renders the prompt, asks the model for one completion,
//! parses it, and either returns the final answer or runs the requested
//! tool and records the observation:
//!
//! 1. **Check** the iteration budget
//! 2. **Render** context + tools + question + scratchpad
//! 3. **Call** the model (fatal on failure)
//! 4. **Parse** the completion
//! 5. **Final answer** → done; **tool call** → dispatch and observe;
//!    **parse failure** → observe the formatting problem and retry
//!
//! Parse failures and tool failures never abort a run; only a model failure
//! or an exhausted iteration budget does.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use ragent_config::AppConfig;
use ragent_core::error::{AgentError, ProviderError};
use ragent_core::provider::{Provider, ProviderRequest};
use ragent_core::retrieval::Retriever;
use ragent_core::tool::{ToolDescriptor, ToolRegistry};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::parser::{ActionParser, ParsedDecision};
use crate::prompt::{self, PromptInput};
use crate::scratchpad::{Scratchpad, ScratchpadStep};

/// Stop sequence sent with every request so the model does not invent
/// its own observations.
pub const OBSERVATION_STOP: &str = "\nObservation";

/// State owned by a single run.
#[derive(Debug)]
pub struct RunContext {
    pub run_id: Uuid,
    pub question: String,
    pub retrieved_context: Vec<String>,
    pub scratchpad: Scratchpad,
    pub iteration_count: u32,
    pub max_iterations: u32,
}

impl RunContext {
    pub fn new(question: &str, retrieved_context: Vec<String>, max_iterations: u32) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            question: question.to_string(),
            retrieved_context,
            scratchpad: Scratchpad::new(),
            iteration_count: 0,
            max_iterations,
        }
    }
}

/// The result of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct AgentRun {
    pub run_id: Uuid,
    /// The final answer text.
    pub answer: String,
    /// Every step taken before the answer, in order.
    pub steps: Vec<ScratchpadStep>,
    /// Number of model calls made.
    pub iterations: u32,
    /// Passages the run was grounded on.
    pub retrieved_context: Vec<String>,
}

/// Configuration and collaborators for the ReAct loop.
///
/// An executor holds no per-run state and can serve concurrent runs.
pub struct AgentExecutor {
    /// LLM provider.
    provider: Arc<dyn Provider>,
    /// Tool registry.
    tools: Arc<ToolRegistry>,
    /// Parser bound to the registry's tool names.
    parser: ActionParser,
    /// Cached tool descriptors for prompt rendering.
    descriptors: Vec<ToolDescriptor>,
    /// Optional context source for [`ask`](Self::ask).
    retriever: Option<Arc<dyn Retriever>>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    /// Default budget used by [`ask`](Self::ask).
    max_iterations: u32,
    model_timeout: Duration,
    tool_timeout: Duration,
    reject_repeated_actions: bool,
}

impl AgentExecutor {
    /// Create a new executor with default limits.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        let parser = ActionParser::for_registry(&tools);
        let descriptors = tools.descriptors();
        Self {
            provider,
            tools,
            parser,
            descriptors,
            retriever: None,
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
            max_iterations: 15,
            model_timeout: Duration::from_secs(120),
            tool_timeout: Duration::from_secs(10),
            reject_repeated_actions: false,
        }
    }

    /// Create an executor using the model and loop settings in `config`.
    pub fn from_config(
        config: &AppConfig,
        provider: Arc<dyn Provider>,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        let mut executor = Self::new(provider, &config.model, tools)
            .with_temperature(config.temperature)
            .with_max_iterations(config.agent.max_iterations)
            .with_model_timeout(Duration::from_secs(config.agent.model_timeout_secs))
            .with_tool_timeout(Duration::from_secs(config.agent.tool_timeout_secs))
            .with_reject_repeated_actions(config.agent.reject_repeated_actions);
        executor.max_tokens = config.max_tokens;
        executor
    }

    /// Attach a retriever used by [`ask`](Self::ask).
    pub fn with_retriever(mut self, retriever: Arc<dyn Retriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the default max tokens per model response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Set the iteration budget used by [`ask`](Self::ask).
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_model_timeout(mut self, timeout: Duration) -> Self {
        self.model_timeout = timeout;
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    /// Skip re-running a (tool, input) pair that already produced a
    /// successful observation in the same run.
    pub fn with_reject_repeated_actions(mut self, enabled: bool) -> Self {
        self.reject_repeated_actions = enabled;
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Retrieve context for `question` and run the loop with the default budget.
    pub async fn ask(&self, question: &str) -> Result<AgentRun, AgentError> {
        let context = match &self.retriever {
            Some(retriever) => retriever.retrieve(question),
            None => Vec::new(),
        };
        debug!(passages = context.len(), "Retrieved context for question");
        self.execute(question, &context, self.max_iterations).await
    }

    /// Run the loop and return only the answer text.
    pub async fn run(
        &self,
        question: &str,
        retrieved_context: &[String],
        max_iterations: u32,
    ) -> Result<String, AgentError> {
        self.execute(question, retrieved_context, max_iterations)
            .await
            .map(|run| run.answer)
    }

    /// Run the loop and return the answer with its full transcript.
    pub async fn execute(
        &self,
        question: &str,
        retrieved_context: &[String],
        max_iterations: u32,
    ) -> Result<AgentRun, AgentError> {
        let mut ctx = RunContext::new(question, retrieved_context.to_vec(), max_iterations);
        // Successful observations keyed by (tool, input), for dedup.
        let mut seen: HashMap<(String, String), String> = HashMap::new();

        info!(
            run_id = %ctx.run_id,
            model = %self.model,
            max_iter = max_iterations,
            passages = ctx.retrieved_context.len(),
            "Agent run starting"
        );

        loop {
            if ctx.iteration_count >= ctx.max_iterations {
                warn!(run_id = %ctx.run_id, "Max iterations reached ({})", ctx.max_iterations);
                return Err(AgentError::IterationLimitExceeded {
                    max_iterations: ctx.max_iterations,
                });
            }
            ctx.iteration_count += 1;
            debug!(run_id = %ctx.run_id, iteration = ctx.iteration_count, "Agent iteration");

            let completion = self.call_model(&ctx).await?;

            match self.parser.parse(&completion) {
                ParsedDecision::FinalAnswer { text, .. } => {
                    info!(
                        run_id = %ctx.run_id,
                        iterations = ctx.iteration_count,
                        steps = ctx.scratchpad.len(),
                        "Agent run completed"
                    );
                    return Ok(AgentRun {
                        run_id: ctx.run_id,
                        answer: text,
                        iterations: ctx.iteration_count,
                        steps: ctx.scratchpad.into_steps(),
                        retrieved_context: ctx.retrieved_context,
                    });
                }
                ParsedDecision::ToolInvocation {
                    thought,
                    tool_name,
                    raw_input,
                } => {
                    let previous = if self.reject_repeated_actions {
                        seen.get(&(tool_name.clone(), raw_input.clone())).cloned()
                    } else {
                        None
                    };
                    let observation = match previous {
                        Some(previous) => {
                            warn!(run_id = %ctx.run_id, tool = %tool_name, "Repeated action skipped");
                            format!(
                                "This exact action was already performed and returned: {previous}. \
                                 Use that result instead of repeating the action."
                            )
                        }
                        None => self.observe_tool(&ctx, &tool_name, &raw_input, &mut seen).await,
                    };
                    ctx.scratchpad.push(ScratchpadStep::tool(
                        thought,
                        tool_name,
                        raw_input,
                        observation,
                    ));
                }
                ParsedDecision::ParseFailure { reason, raw_text } => {
                    warn!(run_id = %ctx.run_id, %reason, "Could not parse model output");
                    ctx.scratchpad
                        .push(ScratchpadStep::unparsed(raw_text.trim(), format_error_observation(&reason)));
                }
            }
        }
    }

    /// Render the prompt for the current state of `ctx`.
    pub fn render_prompt(&self, ctx: &RunContext) -> String {
        prompt::render(&PromptInput {
            question: &ctx.question,
            retrieved_context: &ctx.retrieved_context,
            tools: &self.descriptors,
            scratchpad: &ctx.scratchpad,
        })
    }

    async fn call_model(&self, ctx: &RunContext) -> Result<String, AgentError> {
        let request = ProviderRequest {
            model: self.model.clone(),
            prompt: self.render_prompt(ctx),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stop: vec![OBSERVATION_STOP.to_string()],
        };

        let start = std::time::Instant::now();
        let result = tokio::time::timeout(self.model_timeout, self.provider.complete(request)).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let response = match result {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!(run_id = %ctx.run_id, provider = self.provider.name(), "Model call failed: {e}");
                return Err(AgentError::ModelUnavailable(e));
            }
            Err(_) => {
                warn!(run_id = %ctx.run_id, provider = self.provider.name(), "Model call timed out");
                return Err(AgentError::ModelUnavailable(ProviderError::Timeout(
                    self.model_timeout.as_secs(),
                )));
            }
        };

        debug!(
            run_id = %ctx.run_id,
            model = %response.model,
            duration_ms,
            tokens = response.usage.map(|u| u.total_tokens),
            "Model responded"
        );
        Ok(response.text)
    }

    async fn observe_tool(
        &self,
        ctx: &RunContext,
        tool_name: &str,
        raw_input: &str,
        seen: &mut HashMap<(String, String), String>,
    ) -> String {
        let start = std::time::Instant::now();
        let result = self
            .tools
            .dispatch_with_timeout(tool_name, raw_input, self.tool_timeout)
            .await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(output) => {
                debug!(run_id = %ctx.run_id, tool = tool_name, duration_ms, "Tool succeeded");
                seen.insert((tool_name.to_string(), raw_input.to_string()), output.clone());
                output
            }
            Err(e) => {
                warn!(run_id = %ctx.run_id, tool = tool_name, duration_ms, "Tool failed: {e}");
                format!("Error: {e}")
            }
        }
    }
}

fn format_error_observation(reason: &str) -> String {
    format!(
        "Invalid Format: {reason}. The previous response did not follow the required format. \
         Reply with 'Action:' and 'Action Input:' lines, or 'Action: Final Answer' followed by \
         a 'Final Answer:' line."
    )
}
