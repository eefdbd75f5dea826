pub mod ask;
pub mod chat;
pub mod config_cmd;
pub mod tools;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ragent_agent::AgentExecutor;
use ragent_config::AppConfig;
use ragent_core::retrieval::{Retriever, StaticRetriever};
use ragent_retrieval::KeywordRetriever;

/// Resolve the config file: an explicit path, or the default location.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"))
}

pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let path = config_path(explicit);
    AppConfig::load_with_env(&path).map_err(|e| format!("Failed to load config: {e}").into())
}

/// Wire provider, tools and document retriever into an executor.
pub fn build_executor(config: &AppConfig, no_docs: bool) -> AgentExecutor {
    let provider = ragent_providers::build_from_config(config);
    let tools = Arc::new(ragent_tools::default_registry());
    let retriever: Arc<dyn Retriever> = if no_docs {
        Arc::new(StaticRetriever::empty())
    } else {
        let keyword =
            KeywordRetriever::from_dir(&config.retrieval.docs_dir, config.retrieval.top_k);
        tracing::debug!(documents = keyword.len(), "Document retriever ready");
        Arc::new(keyword)
    };
    tracing::debug!(model = %config.model, tools = tools.len(), "Agent ready");
    AgentExecutor::from_config(config, provider, tools).with_retriever(retriever)
}
