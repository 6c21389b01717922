use std::fmt;
use std::io::{self, BufReader, Read};
use std::thread::JoinHandle;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::diagnostics::PendingReasons;
use crate::model::{full_name, Candidates, Issue};
use crate::services::sources::GoToolchain;

/// How the process behind a diagnostic stream ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BuildStatus {
    Succeeded,
    /// Exited unsuccessfully; `code` is `None` when killed by a signal.
    Failed { code: Option<i32> },
    /// The build executable could not be started or waited on.
    LaunchFailed { message: String },
    /// The stream came from a captured log; nothing was built.
    Replayed,
}

impl BuildStatus {
    /// `true` unless a build ran and did not succeed.
    pub fn is_success(&self) -> bool {
        matches!(self, BuildStatus::Succeeded | BuildStatus::Replayed)
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStatus::Succeeded => f.write_str("build succeeded"),
            BuildStatus::Failed { code: Some(code) } => write!(f, "build exited with status {code}"),
            BuildStatus::Failed { code: None } => f.write_str("build terminated by signal"),
            BuildStatus::LaunchFailed { message } => write!(f, "build could not run: {message}"),
            BuildStatus::Replayed => f.write_str("replayed from log"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Duplicate candidate: {0}")]
    DuplicateCandidate(String),
    #[error("Failed to read compiler output: {0}")]
    Io(#[from] io::Error),
    #[error("Build did not succeed ({0})")]
    BuildFailed(BuildStatus),
}

enum Completion {
    Done(BuildStatus),
    Producer(JoinHandle<BuildStatus>),
}

/// Merged compiler output, plus a handle on whatever is producing it.
///
/// Read it to end of stream, then call [`finish`](Self::finish) to collect the
/// build status.
pub struct DiagnosticStream {
    reader: Box<dyn Read + Send>,
    completion: Completion,
}

impl DiagnosticStream {
    /// A stream fed by a producer thread that reports the build status when it exits.
    pub fn from_producer(
        reader: impl Read + Send + 'static,
        producer: JoinHandle<BuildStatus>,
    ) -> Self {
        Self { reader: Box::new(reader), completion: Completion::Producer(producer) }
    }

    /// A stream whose outcome is already known (e.g. a log file).
    pub fn completed(reader: impl Read + Send + 'static, status: BuildStatus) -> Self {
        Self { reader: Box::new(reader), completion: Completion::Done(status) }
    }

    /// Wait for the producer and return the build status. A panic in the
    /// producer thread is propagated to the caller.
    pub fn finish(self) -> BuildStatus {
        drop(self.reader);
        match self.completion {
            Completion::Done(status) => status,
            Completion::Producer(handle) => match handle.join() {
                Ok(status) => status,
                Err(panic) => std::panic::resume_unwind(panic),
            },
        }
    }
}

impl Read for DiagnosticStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

/// Something that can produce the inlining diagnostics for a set of packages.
pub trait DiagnosticSource: Send + Sync {
    /// Start producing diagnostics for `packages` (sorted, distinct).
    fn open(&self, packages: &[String]) -> Result<DiagnosticStream, CheckError>;
    fn name(&self) -> &'static str;
}

/// Outcome of a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InliningReport {
    pub source: String,
    pub packages: Vec<String>,
    pub candidates_digest: String,
    pub build: BuildStatus,
    /// Symbols not proven inlineable, sorted by their rendered form.
    pub issues: Vec<Issue>,
    pub started_at: String,
    pub finished_at: String,
}

impl InliningReport {
    /// `true` when every candidate was proven inlineable.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues rendered as `package.symbol: reason`.
    pub fn issue_lines(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

/// Validate `candidates` and seed the pending-reasons set from it.
///
/// Fails on an empty package identifier or on a fully-qualified name that is
/// registered more than once.
pub fn pending_reasons(candidates: &Candidates) -> Result<PendingReasons, CheckError> {
    let mut pending = PendingReasons::new();
    for (package, symbols) in candidates.iter() {
        if package.is_empty() {
            return Err(CheckError::InvalidInput("empty import path is not allowed".to_string()));
        }
        for symbol in symbols {
            let name = full_name(package, symbol);
            if !pending.register(name.clone()) {
                return Err(CheckError::DuplicateCandidate(name));
            }
        }
    }
    Ok(pending)
}

/// Report builder: runs a diagnostic source and turns its output into issues.
pub struct InlineChecker {
    source: Box<dyn DiagnosticSource>,
    strict: bool,
}

impl InlineChecker {
    pub fn new<S: DiagnosticSource + 'static>(source: S) -> Self {
        Self { source: Box::new(source), strict: false }
    }

    /// In strict mode a build that did not succeed is an error instead of a
    /// status on the report.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    pub fn check(&self, candidates: &Candidates) -> Result<InliningReport, CheckError> {
        let mut pending = pending_reasons(candidates)?;
        let packages = candidates.packages();
        let started_at = Utc::now().to_rfc3339();
        info!(
            source = self.source.name(),
            packages = packages.len(),
            symbols = pending.len(),
            "checking inlining decisions"
        );

        let mut stream = self.source.open(&packages)?;
        let scanned = pending.scan(BufReader::new(&mut stream));
        let build = stream.finish();
        let lines = scanned?;
        debug!(lines, pending = pending.len(), "compiler output consumed");

        if !build.is_success() {
            warn!(%build, "issues may be incomplete");
            if self.strict {
                return Err(CheckError::BuildFailed(build));
            }
        }

        Ok(InliningReport {
            source: self.source.name().to_string(),
            packages,
            candidates_digest: candidates.digest(),
            build,
            issues: pending.into_issues(),
            started_at,
            finished_at: Utc::now().to_rfc3339(),
        })
    }
}

/// Build every package in `candidates` with the Go toolchain from the
/// environment and return the symbols that were not proven inlineable.
///
/// The result is sorted; an empty list means every candidate is inlineable.
/// Candidates map import paths to symbols, e.g. `"bytes" => ["(*Buffer).Len"]`.
pub fn check_inlineable(candidates: &Candidates) -> Result<Vec<String>, CheckError> {
    let report = InlineChecker::new(GoToolchain::from_env()).check(candidates)?;
    Ok(report.issue_lines())
}
