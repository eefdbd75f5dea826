//! The ReAct agent loop for ragent.
//!
//! The agent answers a question by alternating **Thought → Action →
//! Observation** steps against a fixed set of tools until the model emits a
//! final answer:
//!
//! 1. **Retrieve** context passages for the question (optional)
//! 2. **Render** a prompt from context, tools, question and scratchpad
//! 3. **Ask the model** for one completion, stopped before `Observation`
//! 4. **Parse** the completion into a tool call, final answer or failure
//! 5. **Observe**: run the tool (or report the formatting problem) and loop
//!
//! The loop ends with a final answer or when the iteration budget runs out.

pub mod executor;
pub mod parser;
pub mod prompt;
pub mod scratchpad;

#[cfg(test)]
mod test_helpers;

pub use executor::{AgentExecutor, AgentRun, OBSERVATION_STOP, RunContext};
pub use parser::{ActionParser, FINAL_ANSWER_ACTION, ParsedDecision};
pub use prompt::PromptInput;
pub use scratchpad::{Scratchpad, ScratchpadStep};
