use std::fs;

use anyhow::{Context, Result};
use inlcheck_core::diagnostics::{classify, DiagnosticLine};
use serde::Serialize;

use crate::absolutize;

/// A recognized line of a captured compiler log.
#[derive(Debug, Serialize)]
pub struct ClassifiedLine<'a> {
    /// 1-based line number.
    pub line: usize,
    #[serde(flatten)]
    pub diagnostic: DiagnosticLine<'a>,
}

/// Classify every line of `body`, keeping only the recognized ones.
pub fn classify_log(body: &str) -> Vec<ClassifiedLine<'_>> {
    body.lines()
        .enumerate()
        .map(|(idx, text)| ClassifiedLine { line: idx + 1, diagnostic: classify(text) })
        .filter(|c| c.diagnostic != DiagnosticLine::Other)
        .collect()
}

/// `inlcheck parse-log`: show how each line of a captured log is interpreted.
pub fn parse_log_command(path: &str, json: bool) -> Result<()> {
    let path = absolutize(path)?;
    let bytes =
        fs::read(&path).with_context(|| format!("Failed to read log at {}", path.display()))?;
    let body = String::from_utf8_lossy(&bytes);
    let classified = classify_log(&body);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&classified)
                .context("Failed to serialize classified lines to JSON")?
        );
        return Ok(());
    }

    println!("Recognized lines ({}):", classified.len());
    for entry in classified {
        match entry.diagnostic {
            DiagnosticLine::Header { package } => {
                println!("{:>6}: package {}", entry.line, package)
            }
            DiagnosticLine::InliningCall { symbol } => {
                println!("{:>6}: inlined call {}", entry.line, symbol)
            }
            DiagnosticLine::CanInline { symbol } => {
                println!("{:>6}: can inline {}", entry.line, symbol)
            }
            DiagnosticLine::CannotInline { symbol, reason } => {
                println!("{:>6}: cannot inline {} ({})", entry.line, symbol, reason)
            }
            DiagnosticLine::Other => {}
        }
    }
    Ok(())
}
