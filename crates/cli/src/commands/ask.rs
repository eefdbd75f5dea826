//! `ragent ask`: answer one question and exit.

use std::path::Path;

pub async fn run(
    config_path: Option<&Path>,
    no_docs: bool,
    question: &str,
    max_iterations: Option<u32>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let mut executor = super::build_executor(&config, no_docs);
    if let Some(max) = max_iterations {
        executor = executor.with_max_iterations(max);
    }

    if !json {
        eprint!("  Thinking...");
    }
    let result = executor.ask(question).await;
    if !json {
        eprint!("\r              \r");
    }

    let run = result?;
    if json {
        println!("{}", serde_json::to_string_pretty(&run)?);
    } else {
        println!("{}", run.answer);
    }
    Ok(())
}
