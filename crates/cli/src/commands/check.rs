use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use inlcheck_core::config::{load_candidates_file, CandidatesFile};
use inlcheck_core::services::check::{pending_reasons, InlineChecker};
use inlcheck_core::services::sources::{GoToolchain, LogReplay};
use inlcheck_core::{Candidates, InliningReport};
use tracing::debug;

use crate::{absolutize, parse_symbol_arg};

/// Inputs of `inlcheck check`, as collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Candidates file (YAML or JSON).
    pub file: Option<String>,
    /// Extra `package.Symbol` / `package=Symbol` candidates.
    pub symbols: Vec<String>,
    /// `go` executable, overriding the file and environment.
    pub go: Option<String>,
    /// Build directory, overriding the file.
    pub dir: Option<String>,
    /// Extra build flags, appended to the file's.
    pub args: Vec<String>,
    /// Parse a captured log instead of running `go build`.
    pub from_log: Option<String>,
    pub strict: bool,
    pub json: bool,
}

/// Merge the candidates file (if any) with command-line overrides and
/// validate the resulting candidates.
///
/// Returns the merged file contents and the directory relative build
/// directories are resolved against.
pub fn resolve_check_inputs(opts: &CheckOptions) -> Result<(CandidatesFile, PathBuf)> {
    let (mut file, base) = match &opts.file {
        Some(path) => {
            let path = absolutize(path)?;
            let file = load_candidates_file(&path)?;
            let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
            (file, base)
        }
        None => (
            CandidatesFile::default(),
            env::current_dir().context("Failed to get current directory")?,
        ),
    };

    let mut extra = Candidates::new();
    for sym in &opts.symbols {
        let (package, symbol) = parse_symbol_arg(sym)?;
        extra.add(package, symbol);
    }
    file.candidates.extend(extra);

    if let Some(go) = &opts.go {
        file.build.go = Some(go.clone());
    }
    if let Some(dir) = &opts.dir {
        file.build.dir = Some(absolutize(dir)?.display().to_string());
    }
    file.build.args.extend(opts.args.iter().cloned());
    file.build.strict |= opts.strict;

    pending_reasons(&file.candidates)?;
    if file.candidates.is_empty() {
        return Err(anyhow!(
            "No candidates to check; pass --file <candidates.yaml> or --sym pkg.Symbol"
        ));
    }
    Ok((file, base))
}

/// Run the check described by `opts` and return the report without printing it.
pub fn run_check(opts: &CheckOptions) -> Result<InliningReport> {
    let (file, base) = resolve_check_inputs(opts)?;
    let checker = match &opts.from_log {
        Some(log) => InlineChecker::new(LogReplay::from_file(absolutize(log)?)),
        None => InlineChecker::new(GoToolchain::from_config(&file.build, &base)),
    }
    .strict(file.build.strict);
    debug!(source = checker.source_name(), symbols = file.candidates.len(), "running check");

    let report = checker.check(&file.candidates).context("Inlining check failed")?;
    Ok(report)
}

/// `inlcheck check`: print the symbols that were not proven inlineable.
///
/// Fails (non-zero exit) when at least one issue is reported.
pub fn check_command(opts: &CheckOptions) -> Result<()> {
    let report = run_check(opts)?;

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.is_clean() {
        println!("All candidates are inlineable ({} package(s)).", report.packages.len());
    } else {
        for line in report.issue_lines() {
            println!("{line}");
        }
    }

    if !report.build.is_success() {
        eprintln!("warning: {}; results may be incomplete", report.build);
    }

    if report.is_clean() {
        Ok(())
    } else {
        Err(anyhow!("{} symbol(s) not proven inlineable", report.issues.len()))
    }
}
