//! Scratchpad: the append-only transcript of one agent run.
//!
//! Every loop iteration adds exactly one [`ScratchpadStep`]. The whole
//! transcript is re-rendered into the next prompt so the model sees what it
//! already tried and what came back.

use serde::{Deserialize, Serialize};

/// One Thought → Action → Observation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScratchpadStep {
    pub thought: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
}

impl ScratchpadStep {
    /// A step that ran (or tried to run) a tool.
    pub fn tool(
        thought: impl Into<String>,
        action: impl Into<String>,
        action_input: impl Into<String>,
        observation: impl Into<String>,
    ) -> Self {
        Self {
            thought: thought.into(),
            action: Some(action.into()),
            action_input: Some(action_input.into()),
            observation: Some(observation.into()),
        }
    }

    /// A step whose completion could not be parsed. The raw completion is
    /// kept as the thought so the model can see what it wrote.
    pub fn unparsed(raw_text: impl Into<String>, observation: impl Into<String>) -> Self {
        Self {
            thought: raw_text.into(),
            action: None,
            action_input: None,
            observation: Some(observation.into()),
        }
    }

    fn render_into(&self, out: &mut String) {
        let thought = self.thought.trim();
        if !thought.is_empty() {
            out.push(' ');
            out.push_str(thought);
        }
        if let Some(action) = &self.action {
            out.push_str("\nAction: ");
            out.push_str(action);
            out.push_str("\nAction Input: ");
            out.push_str(self.action_input.as_deref().unwrap_or_default());
        }
        if let Some(observation) = &self.observation {
            out.push_str("\nObservation: ");
            out.push_str(observation);
        }
        out.push_str("\nThought:");
    }
}

/// Ordered, append-only sequence of steps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scratchpad {
    steps: Vec<ScratchpadStep>,
}

impl Scratchpad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: ScratchpadStep) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[ScratchpadStep] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<ScratchpadStep> {
        self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Render for the prompt, which itself ends with `Thought:`.
    ///
    /// Each step continues that line and ends with a fresh `Thought:` so the
    /// model picks up right where the transcript stops.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            step.render_into(&mut out);
        }
        out
    }
}
