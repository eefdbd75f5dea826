//! Language-model provider implementations for ragent.
//!
//! All providers implement the `ragent_core::Provider` trait.
//! [`build_from_config`] selects the provider described by the configuration.

pub mod openai_compat;

use std::sync::Arc;
use std::time::Duration;

use ragent_config::AppConfig;
use ragent_core::provider::Provider;

pub use openai_compat::OpenAiCompatProvider;

/// Build the configured provider.
///
/// Every supported backend (Ollama, OpenAI, vLLM, llama.cpp server, …)
/// speaks the OpenAI-compatible chat API, so the configuration only picks
/// the label, base URL and key.
pub fn build_from_config(config: &AppConfig) -> Arc<dyn Provider> {
    let api_key = config.api_key.clone().unwrap_or_else(|| match config.provider.as_str() {
        // Ollama doesn't need a real key
        "ollama" => "ollama".into(),
        _ => String::new(),
    });

    Arc::new(
        OpenAiCompatProvider::new(&config.provider, &config.base_url, api_key)
            .with_timeout(Duration::from_secs(config.agent.model_timeout_secs)),
    )
}
