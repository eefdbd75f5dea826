//! Prompt rendering for the ReAct loop.
//!
//! One fixed template carries the retrieved context, the tool table, the
//! valid action names, the question and the scratchpad. The template ends
//! with `Thought:` so the completion starts with the model's reasoning.

use ragent_core::retrieval::NO_CONTEXT_PLACEHOLDER;
use ragent_core::tool::ToolDescriptor;

use crate::parser::FINAL_ANSWER_ACTION;
use crate::scratchpad::Scratchpad;

/// Everything one prompt is built from.
pub struct PromptInput<'a> {
    pub question: &'a str,
    pub retrieved_context: &'a [String],
    pub tools: &'a [ToolDescriptor],
    pub scratchpad: &'a Scratchpad,
}

/// Join retrieved passages, or the explicit placeholder when there are none.
pub fn render_context(passages: &[String]) -> String {
    let joined = passages
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    if joined.is_empty() {
        NO_CONTEXT_PLACEHOLDER.to_string()
    } else {
        joined
    }
}

/// `name: description` lines for every tool.
pub fn render_tool_table(tools: &[ToolDescriptor]) -> String {
    tools
        .iter()
        .map(|t| format!("{}: {}", t.name, t.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Comma-separated tool names, as they must appear on the `Action:` line.
pub fn render_tool_names(tools: &[ToolDescriptor]) -> String {
    tools
        .iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the full prompt.
pub fn render(input: &PromptInput<'_>) -> String {
    let context = render_context(input.retrieved_context);
    let tools = if input.tools.is_empty() {
        "(no tools are available)".to_string()
    } else {
        render_tool_table(input.tools)
    };
    let tool_names = render_tool_names(input.tools);

    format!(
        r#"The following context was retrieved from the user's documents:
<CONTEXT>
{context}
</CONTEXT>

Answer the question below. Check the CONTEXT first; if it answers the question, answer from it.
If it does not, or the question needs something the context cannot give (such as today's date
or a calculation), you may use these tools:

{tools}

Use exactly this format:

Question: the question you must answer
Thought: reason about whether the CONTEXT is enough or a tool is needed
Action: one tool name from [{tool_names}], or "{final_marker}" when no tool is needed
Action Input: only the input value for the tool, correctly formatted (for dates: YYYY-MM-DD), with no commentary
Observation: the result of the action
... (Thought/Action/Action Input/Observation may repeat)
Thought: I now have all the information needed to answer the user's question.
Action: {final_marker}
Final Answer: the complete answer to the question, based on the CONTEXT and any Observations

Rules:
- Use a tool only when the question needs what that tool provides.
- Do not repeat an action whose Observation already succeeded; use that Observation instead.
- Never write an Observation yourself; it is supplied after each Action.

Begin!

Question: {question}
Thought:{scratchpad}"#,
        final_marker = FINAL_ANSWER_ACTION,
        question = input.question.trim(),
        scratchpad = input.scratchpad.render(),
    )
}
