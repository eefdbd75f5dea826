//! Action parser: turns a raw model completion into a [`ParsedDecision`].
//!
//! The model is prompted to answer in labelled lines:
//!
//! ```text
//! Thought: <free text>
//! Action: <tool name> | Final Answer
//! Action Input: <free text>
//! ```
//!
//! The parser is a single forward line scan. The first complete group wins:
//! once an `Action` has its `Action Input` (or `Final Answer`), the rest of
//! the completion is ignored, because models often keep going and invent
//! their own `Observation:` lines. Inside that group a repeated label
//! replaces the earlier one. Malformed output is a [`ParsedDecision::ParseFailure`],
//! never a panic.

use std::collections::HashSet;

use ragent_core::tool::ToolRegistry;

/// The reserved action value that ends a run.
pub const FINAL_ANSWER_ACTION: &str = "Final Answer";

/// What the model asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedDecision {
    /// Run `tool_name` with `raw_input`.
    ToolInvocation {
        thought: String,
        tool_name: String,
        raw_input: String,
    },
    /// Stop and answer the user with `text`.
    FinalAnswer { thought: String, text: String },
    /// The completion did not follow the format.
    ParseFailure { reason: String, raw_text: String },
}

impl ParsedDecision {
    fn failure(reason: impl Into<String>, raw_text: &str) -> Self {
        Self::ParseFailure {
            reason: reason.into(),
            raw_text: raw_text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Thought,
    Action,
    ActionInput,
    Observation,
    FinalAnswer,
    Question,
}

// Longest first so "Action Input" is not read as "Action".
const LABELS: [(Label, &str); 6] = [
    (Label::ActionInput, "Action Input"),
    (Label::Action, "Action"),
    (Label::FinalAnswer, "Final Answer"),
    (Label::Thought, "Thought"),
    (Label::Observation, "Observation"),
    (Label::Question, "Question"),
];

/// Parses completions against a fixed set of tool names.
#[derive(Debug, Clone)]
pub struct ActionParser {
    tool_names: HashSet<String>,
    // Registration order, for error messages.
    ordered: Vec<String>,
}

impl ActionParser {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered = Vec::new();
        let mut tool_names = HashSet::new();
        for name in names.into_iter().map(Into::<String>::into) {
            if tool_names.insert(name.clone()) {
                ordered.push(name);
            }
        }
        Self {
            tool_names,
            ordered,
        }
    }

    /// A parser that accepts exactly the tools in `registry`.
    pub fn for_registry(registry: &ToolRegistry) -> Self {
        Self::new(registry.names())
    }

    /// Parse one completion.
    pub fn parse(&self, text: &str) -> ParsedDecision {
        let lines: Vec<&str> = text.lines().collect();
        let mut thought: Vec<&str> = Vec::new();
        let mut action: Option<String> = None;
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];
            match split_label(line) {
                None => {
                    if action.is_none() {
                        thought.push(line);
                    }
                }
                Some((Label::Thought, rest)) => {
                    if action.is_some() {
                        break;
                    }
                    thought.clear();
                    thought.push(rest);
                }
                Some((Label::Action, rest)) => {
                    action = Some(clean_action(rest).to_string());
                }
                Some((Label::ActionInput, rest)) => {
                    let (block, next) = take_block(rest, &lines, i + 1);
                    let Some(name) = action.as_deref() else {
                        return ParsedDecision::failure(
                            "found 'Action Input:' without a preceding 'Action:'",
                            text,
                        );
                    };
                    if is_final_marker(name) {
                        // Input is meaningless for the terminal marker; keep
                        // looking for the "Final Answer:" line.
                        i = next;
                        continue;
                    }
                    return self.tool_invocation(join_thought(&thought), name, block, text);
                }
                Some((Label::FinalAnswer, rest)) => {
                    let (block, _) = take_block(rest, &lines, i + 1);
                    if let Some(name) = action.as_deref()
                        && !is_final_marker(name)
                    {
                        return ParsedDecision::failure(
                            format!(
                                "found both 'Action: {name}' and a 'Final Answer:' line; \
                                 give either a tool action or a final answer"
                            ),
                            text,
                        );
                    }
                    let answer = block.trim();
                    if answer.is_empty() {
                        return ParsedDecision::failure("'Final Answer:' has no text", text);
                    }
                    return ParsedDecision::FinalAnswer {
                        thought: join_thought(&thought),
                        text: answer.to_string(),
                    };
                }
                Some((Label::Observation, _)) => break,
                Some((Label::Question, _)) => {}
            }
            i += 1;
        }

        let reason = match action.as_deref() {
            None => "missing 'Action:' after 'Thought:'".to_string(),
            Some("") => "'Action:' has no value".to_string(),
            Some(name) if is_final_marker(name) => {
                "'Action: Final Answer' must be followed by a 'Final Answer:' line".to_string()
            }
            Some(name) if self.tool_names.contains(name) => {
                format!("missing 'Action Input:' after 'Action: {name}'")
            }
            Some(name) => self.unknown_tool_reason(name),
        };
        ParsedDecision::failure(reason, text)
    }

    fn tool_invocation(
        &self,
        thought: String,
        name: &str,
        block: String,
        raw_text: &str,
    ) -> ParsedDecision {
        if name.is_empty() {
            return ParsedDecision::failure("'Action:' has no value", raw_text);
        }
        if !self.tool_names.contains(name) {
            return ParsedDecision::failure(self.unknown_tool_reason(name), raw_text);
        }
        ParsedDecision::ToolInvocation {
            thought,
            tool_name: name.to_string(),
            raw_input: clean_input(&block).to_string(),
        }
    }

    fn unknown_tool_reason(&self, name: &str) -> String {
        format!(
            "'{name}' is not a valid tool, try one of [{}] or '{FINAL_ANSWER_ACTION}'",
            self.ordered.join(", ")
        )
    }
}

fn is_final_marker(action: &str) -> bool {
    action.eq_ignore_ascii_case(FINAL_ANSWER_ACTION)
}

/// Recognise a `Label:` prefix, tolerating leading whitespace and markdown
/// emphasis (`**Action:** foo`). Labels match case-insensitively.
fn split_label(line: &str) -> Option<(Label, &str)> {
    let s = line.trim_start().trim_start_matches(['*', '#']).trim_start();
    for (label, name) in LABELS {
        let Some(head) = s.get(..name.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(name) {
            continue;
        }
        let after = s[name.len()..].trim_start_matches([' ', '\t', '*']);
        if let Some(rest) = after.strip_prefix(':') {
            return Some((label, rest.trim_start_matches('*').trim()));
        }
    }
    None
}

/// The value after a label plus any unlabelled continuation lines.
/// Returns the block and the index of the first line after it.
fn take_block(first: &str, lines: &[&str], start: usize) -> (String, usize) {
    let mut block = first.to_string();
    let mut i = start;
    while i < lines.len() && split_label(lines[i]).is_none() {
        block.push('\n');
        block.push_str(lines[i]);
        i += 1;
    }
    (block.trim().to_string(), i)
}

fn join_thought(lines: &[&str]) -> String {
    lines.join("\n").trim().to_string()
}

/// Strip incidental decoration around a tool name: whitespace, quotes,
/// backticks, emphasis, brackets and trailing punctuation.
fn clean_action(raw: &str) -> &str {
    raw.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, '`' | '"' | '\'' | '*' | '[' | ']' | '(' | ')' | '.' | ':' | ',' | ';')
    })
}

/// Trim whitespace and wrapping quote characters from an action input.
fn clean_input(raw: &str) -> &str {
    raw.trim()
        .trim_matches(|c| matches!(c, '"' | '\'' | '`'))
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> ActionParser {
        ActionParser::new(["get_current_date", "get_current_time", "calculate_days_until", "echo"])
    }

    fn assert_tool(decision: ParsedDecision, tool: &str, input: &str) {
        match decision {
            ParsedDecision::ToolInvocation {
                tool_name,
                raw_input,
                ..
            } => {
                assert_eq!(tool_name, tool);
                assert_eq!(raw_input, input);
            }
            other => panic!("expected tool invocation, got {other:?}"),
        }
    }

    fn assert_failure(decision: ParsedDecision) -> String {
        match decision {
            ParsedDecision::ParseFailure { reason, .. } => reason,
            other => panic!("expected parse failure, got {other:?}"),
        }
    }

    #[test]
    fn parses_well_formed_tool_call() {
        let out = parser().parse(
            "Thought: I need the number of days.\nAction: calculate_days_until\nAction Input: 2999-01-01",
        );
        match out {
            ParsedDecision::ToolInvocation {
                thought,
                tool_name,
                raw_input,
            } => {
                assert_eq!(thought, "I need the number of days.");
                assert_eq!(tool_name, "calculate_days_until");
                assert_eq!(raw_input, "2999-01-01");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn thought_label_is_optional() {
        // The prompt ends with "Thought:", so completions start with bare text.
        let out = parser().parse(" The user wants today's date.\nAction: get_current_date\nAction Input: none");
        match out {
            ParsedDecision::ToolInvocation { thought, .. } => {
                assert_eq!(thought, "The user wants today's date.");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn input_is_trimmed_of_whitespace_and_quotes() {
        let p = parser();
        assert_tool(
            p.parse("Action: calculate_days_until\nAction Input:   '2999-01-01'  "),
            "calculate_days_until",
            "2999-01-01",
        );
        assert_tool(
            p.parse("Action: calculate_days_until\nAction Input: \"2999-01-01\""),
            "calculate_days_until",
            "2999-01-01",
        );
    }

    #[test]
    fn empty_action_input_is_allowed() {
        assert_tool(
            parser().parse("Action: get_current_time\nAction Input:"),
            "get_current_time",
            "",
        );
    }

    #[test]
    fn multiline_action_input_is_kept() {
        assert_tool(
            parser().parse("Action: echo\nAction Input: first line\nsecond line\nObservation: fake"),
            "echo",
            "first line\nsecond line",
        );
    }

    #[test]
    fn tool_name_tolerates_decoration() {
        let p = parser();
        for action in [
            "`get_current_date`",
            " get_current_date. ",
            "[get_current_date]",
            "\"get_current_date\"",
            "**get_current_date**",
            "get_current_date()",
        ] {
            assert_tool(
                p.parse(&format!("Action: {action}\nAction Input: x")),
                "get_current_date",
                "x",
            );
        }
    }

    #[test]
    fn tool_name_is_not_fuzzy_matched() {
        let p = parser();
        let reason = assert_failure(p.parse("Action: get_current\nAction Input: x"));
        assert!(reason.contains("'get_current' is not a valid tool"));
        assert!(reason.contains("get_current_date, get_current_time"));

        assert_failure(p.parse("Action: Get_Current_Date\nAction Input: x"));
        assert_failure(p.parse("Action: get current date\nAction Input: x"));
    }

    #[test]
    fn bold_labels_are_recognised() {
        assert_tool(
            parser().parse("**Thought:** check\n**Action:** echo\n**Action Input:** hi"),
            "echo",
            "hi",
        );
    }

    #[test]
    fn labels_are_case_insensitive() {
        assert_tool(
            parser().parse("thought: x\nACTION: echo\naction input: hi"),
            "echo",
            "hi",
        );
    }

    #[test]
    fn final_answer_action() {
        let out = parser().parse(
            "Thought: I now have all the information needed to answer the user's question.\n\
             Action: Final Answer\n\
             Final Answer: Project Alpha launches in 42 days.",
        );
        assert_eq!(
            out,
            ParsedDecision::FinalAnswer {
                thought: "I now have all the information needed to answer the user's question."
                    .into(),
                text: "Project Alpha launches in 42 days.".into(),
            }
        );
    }

    #[test]
    fn final_answer_marker_is_case_insensitive() {
        let out = parser().parse("Action: final answer\nFinal Answer: yes");
        assert!(matches!(out, ParsedDecision::FinalAnswer { ref text, .. } if text == "yes"));
    }

    #[test]
    fn final_answer_action_with_input_line_still_needs_answer_line() {
        let out = parser().parse("Action: Final Answer\nAction Input: none\nFinal Answer: 7 days");
        assert!(matches!(out, ParsedDecision::FinalAnswer { ref text, .. } if text == "7 days"));
    }

    #[test]
    fn final_answer_can_span_lines() {
        let out = parser().parse("Action: Final Answer\nFinal Answer: Line one.\nLine two.\n");
        assert!(
            matches!(out, ParsedDecision::FinalAnswer { ref text, .. } if text == "Line one.\nLine two.")
        );
    }

    #[test]
    fn bare_final_answer_is_accepted() {
        let out = parser().parse("Thought: The context answers this.\nFinal Answer: Dana leads Alpha.");
        assert_eq!(
            out,
            ParsedDecision::FinalAnswer {
                thought: "The context answers this.".into(),
                text: "Dana leads Alpha.".into(),
            }
        );
    }

    #[test]
    fn final_answer_action_without_text_fails() {
        let reason = assert_failure(parser().parse("Thought: done\nAction: Final Answer"));
        assert!(reason.contains("Final Answer:"));
        assert_failure(parser().parse("Action: Final Answer\nFinal Answer:   "));
    }

    #[test]
    fn tool_action_with_final_answer_fails() {
        let reason = assert_failure(parser().parse("Action: echo\nFinal Answer: 3"));
        assert!(reason.contains("both"));
    }

    #[test]
    fn missing_action_fails() {
        let reason = assert_failure(parser().parse("Thought: I am thinking hard."));
        assert_eq!(reason, "missing 'Action:' after 'Thought:'");
        assert_failure(parser().parse(""));
    }

    #[test]
    fn missing_action_input_fails() {
        let reason = assert_failure(parser().parse("Thought: x\nAction: get_current_date"));
        assert!(reason.contains("missing 'Action Input:'"));
    }

    #[test]
    fn action_input_without_action_fails() {
        assert_failure(parser().parse("Thought: x\nAction Input: 2025-01-01"));
    }

    #[test]
    fn empty_action_fails() {
        let reason = assert_failure(parser().parse("Action:\nAction Input: x"));
        assert!(reason.contains("no value"));
    }

    #[test]
    fn stops_at_first_complete_group() {
        let text = "Thought: need date\n\
                    Action: get_current_date\n\
                    Action Input: none\n\
                    Observation: 2030-01-01\n\
                    Thought: now count\n\
                    Action: calculate_days_until\n\
                    Action Input: 2030-02-01\n\
                    Final Answer: 31 days";
        assert_tool(parser().parse(text), "get_current_date", "none");
    }

    #[test]
    fn hallucinated_observation_before_input_stops_scan() {
        let text = "Action: echo\nObservation: invented\nAction Input: late";
        let reason = assert_failure(parser().parse(text));
        assert!(reason.contains("missing 'Action Input:'"));
    }

    #[test]
    fn repeated_labels_within_group_take_the_last() {
        let text = "Thought: first idea\n\
                    Thought: second idea\n\
                    Action: get_current_time\n\
                    Action: get_current_date\n\
                    Action Input: none";
        match parser().parse(text) {
            ParsedDecision::ToolInvocation {
                thought, tool_name, ..
            } => {
                assert_eq!(thought, "second idea");
                assert_eq!(tool_name, "get_current_date");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn question_echo_is_ignored() {
        assert_tool(
            parser().parse("Question: what time is it?\nThought: check clock\nAction: get_current_time\nAction Input: now"),
            "get_current_time",
            "now",
        );
    }

    #[test]
    fn failure_keeps_raw_text() {
        let raw = "I think the answer is 4.";
        match parser().parse(raw) {
            ParsedDecision::ParseFailure { raw_text, .. } => assert_eq!(raw_text, raw),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn similar_prefixes_are_not_labels() {
        // "Actionable:" must not be read as "Action:".
        let reason = assert_failure(parser().parse("Actionable: echo\nAction Input: x"));
        assert!(reason.contains("without a preceding 'Action:'"));
    }

    #[test]
    fn non_ascii_text_does_not_panic() {
        let out = parser().parse("Thought: é\u{301}日本語\nAction: echo\nAction Input: ünïcødé");
        assert_tool(out, "echo", "ünïcødé");
        assert_failure(parser().parse("日本"));
    }

    #[test]
    fn for_registry_uses_registered_names() {
        let registry = ToolRegistry::new();
        let p = ActionParser::for_registry(&registry);
        assert_failure(p.parse("Action: echo\nAction Input: hi"));
    }
}
