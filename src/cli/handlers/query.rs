//! Query handlers: one-shot and interactive

use std::io::Write;

use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;

use crate::cli::output::format_sources;
use crate::rag::RagService;
use crate::AppConfig;
use crate::Result;

pub async fn handle_query(
    config: &AppConfig,
    question: Option<String>,
    top_k: Option<usize>,
    show_sources: bool,
) -> Result<()> {
    let service = RagService::new(config)?;
    let top_k = top_k.unwrap_or(config.llm.top_k).max(1);
    let mut stdout = std::io::stdout();

    match question {
        Some(question) => ask(&service, &question, top_k, show_sources, &mut stdout).await,
        None => {
            let stdin = BufReader::new(tokio::io::stdin());
            run_interactive(&service, stdin, &mut stdout, top_k, show_sources).await?;
            Ok(())
        }
    }
}

/// Answer one question and write it out
pub async fn ask<W: Write>(
    service: &RagService,
    question: &str,
    top_k: usize,
    show_sources: bool,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "\nSearching knowledge graph and generating answer...")?;

    if show_sources {
        match service.query(question, top_k).await {
            Ok(response) => {
                writeln!(out, "\nAnswer:\n{}", response.answer)?;
                write!(out, "\n{}", format_sources(&response.sources))?;
            }
            Err(e) => writeln!(out, "\nAnswer:\nError processing query: {e}")?,
        }
    } else {
        let answer = service.answer(question, top_k).await;
        writeln!(out, "\nAnswer:\n{answer}")?;
    }

    writeln!(out, "\n{}", "-".repeat(50))?;
    Ok(())
}

/// Read questions line by line until `exit` or end of input
///
/// Blank lines are ignored. Returns the number of questions answered.
pub async fn run_interactive<R, W>(
    service: &RagService,
    input: R,
    out: &mut W,
    top_k: usize,
    show_sources: bool,
) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "AllyCat GraphRAG Query")?;
    writeln!(out, "Type 'exit' to quit\n")?;

    let mut answered = 0;
    let mut lines = input.lines();

    loop {
        write!(out, "\nEnter your question: ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let question = line.trim();
        if question.eq_ignore_ascii_case("exit") {
            break;
        }
        if question.is_empty() {
            continue;
        }

        ask(service, question, top_k, show_sources, out).await?;
        answered += 1;
    }

    Ok(answered)
}
