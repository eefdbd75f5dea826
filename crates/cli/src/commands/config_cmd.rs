//! `ragent config`: configuration management commands.

use std::path::Path;

use ragent_config::AppConfig;

pub fn validate(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("Validating configuration...");

    let config = match super::load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("   Config error: {e}");
            return Err(e);
        }
    };
    println!("   Config parsed successfully");

    let mut warnings = Vec::new();
    if config.provider != "ollama" && config.api_key.is_none() {
        warnings.push("No API key set (set RAGENT_API_KEY or OPENAI_API_KEY)".to_string());
    }
    if !config.retrieval.docs_dir.is_dir() {
        warnings.push(format!(
            "Documents folder {} does not exist; answers will not use local context",
            config.retrieval.docs_dir.display()
        ));
    }

    if warnings.is_empty() {
        println!("   All checks passed");
    } else {
        println!();
        for w in &warnings {
            println!("   Warning: {w}");
        }
    }

    println!();
    println!("   Provider:    {}", config.provider);
    println!("   Endpoint:    {}", config.base_url);
    println!("   Model:       {}", config.model);
    println!("   Iterations:  {}", config.agent.max_iterations);
    println!("   Documents:   {} (top {})", config.retrieval.docs_dir.display(), config.retrieval.top_k);
    Ok(())
}

pub fn show(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(config_path)?;
    if config.api_key.is_some() {
        config.api_key = Some("[REDACTED]".into());
    }
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

pub fn path(config_path: Option<&Path>) {
    println!("{}", super::config_path(config_path).display());
}

pub fn init(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let path = super::config_path(config_path);
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, AppConfig::default_toml())?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
