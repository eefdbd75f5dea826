//! `ragent chat`: interactive question loop.
//!
//! Reads one question per line until `quit` or `exit` (or end of input).
//! A failed question, or a line that is not valid UTF-8, prints a single
//! error line and the session goes on.

use std::io::Write;
use std::path::Path;

use ragent_agent::AgentExecutor;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader};

pub async fn run(config_path: Option<&Path>, no_docs: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let executor = super::build_executor(&config, no_docs);

    println!();
    println!("  ragent: interactive mode");
    println!();
    println!("  Model:     {}", config.model);
    println!("  Endpoint:  {}", config.base_url);
    println!("  Tools:     {}", executor.tools().names().join(", "));
    if no_docs {
        println!("  Documents: (disabled)");
    } else {
        println!("  Documents: {}", config.retrieval.docs_dir.display());
    }
    println!();
    println!("  Ask a question and press Enter. Type 'quit' or 'exit' to leave.");
    println!();

    session(
        &executor,
        BufReader::new(io::stdin()),
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    )
    .await?;

    println!();
    println!("  Goodbye!");
    println!();
    Ok(())
}

/// Answer questions read from `input` until an exit command or end of input.
///
/// Answers go to `out`, one `[Error]` line per failed question to `err`.
/// A read failure other than bad UTF-8 ends the session after reporting it.
pub async fn session<R, O, E>(
    executor: &AgentExecutor,
    mut input: R,
    out: &mut O,
    err: &mut E,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    O: Write,
    E: Write,
{
    let mut buf = Vec::new();

    loop {
        write!(out, "  You > ")?;
        out.flush()?;

        buf.clear();
        match input.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                writeln!(err, "  [Error] Could not read input: {e}")?;
                break;
            }
        }

        let Ok(line) = std::str::from_utf8(&buf) else {
            writeln!(err, "  [Error] Input is not valid UTF-8; please retype the question")?;
            continue;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if is_exit_command(question) {
            break;
        }

        match executor.ask(question).await {
            Ok(run) => {
                writeln!(out)?;
                for line in run.answer.lines() {
                    writeln!(out, "  Agent > {line}")?;
                }
                writeln!(out)?;
            }
            Err(e) => {
                writeln!(err, "  [Error] {e}")?;
                writeln!(out)?;
            }
        }
    }

    Ok(())
}

fn is_exit_command(line: &str) -> bool {
    line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit")
}
