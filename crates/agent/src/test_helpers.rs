//! Shared test doubles for executor tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use ragent_core::error::{ProviderError, ToolError};
use ragent_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use ragent_core::tool::Tool;

/// A mock provider that returns a sequence of scripted completions.
///
/// Each call to `complete` returns the next completion in the queue and
/// records the request. Once the script runs out it either repeats the last
/// completion, fails with a network error, or panics.
pub struct ScriptedProvider {
    responses: Vec<String>,
    exhausted: Exhausted,
    requests: Mutex<Vec<ProviderRequest>>,
}

#[derive(Clone, Copy)]
enum Exhausted {
    Panic,
    RepeatLast,
    Fail,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: responses.into_iter().map(String::from).collect(),
            exhausted: Exhausted::Panic,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A provider that returns `text` for every call.
    pub fn repeating(text: &str) -> Self {
        Self {
            exhausted: Exhausted::RepeatLast,
            ..Self::new(vec![text])
        }
    }

    pub fn failing_when_exhausted(mut self) -> Self {
        self.exhausted = Exhausted::Fail;
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.prompt.clone())
            .collect()
    }

    pub fn last_request(&self) -> Option<ProviderRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let model = request.model.clone();
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len() - 1
        };

        let text = match (self.responses.get(call), self.exhausted) {
            (Some(text), _) => text.clone(),
            (None, Exhausted::RepeatLast) => self.responses.last().cloned().unwrap_or_default(),
            (None, Exhausted::Fail) => {
                return Err(ProviderError::Network("connection refused".into()));
            }
            (None, Exhausted::Panic) => panic!(
                "ScriptedProvider: no more responses (call #{call}, have {})",
                self.responses.len()
            ),
        };

        Ok(ProviderResponse {
            text,
            model,
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
        })
    }
}

/// A provider whose every call fails.
pub struct FailingProvider;

#[async_trait::async_trait]
impl Provider for FailingProvider {
    fn name(&self) -> &str {
        "failing_mock"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        Err(ProviderError::Network("connection refused".into()))
    }
}

/// A provider that never answers within any reasonable timeout.
pub struct SlowProvider;

#[async_trait::async_trait]
impl Provider for SlowProvider {
    fn name(&self) -> &str {
        "slow_mock"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(ProviderError::Network("too slow".into()))
    }
}

/// Echoes its input and counts invocations. The input `fail` makes it error.
#[derive(Default)]
pub struct CountingEchoTool {
    calls: AtomicUsize,
}

impl CountingEchoTool {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Tool for CountingEchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Echoes the input back. Input: any text."
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if input == "fail" {
            return Err(ToolError::ExecutionFailed {
                tool_name: "echo".into(),
                reason: "asked to fail".into(),
            });
        }
        Ok(input.to_string())
    }
}
