//! Go compiler inlining diagnostics (`-gcflags=-m -m`).
//!
//! The log is line oriented:
//! - `# <package>` announces the package the following lines belong to.
//! - `<pos>: can inline <sym> ...` and `<pos>: inlining call to <sym> ...` prove
//!   that a symbol is inlineable.
//! - `<pos>: cannot inline <sym>: <reason>` explains why it is not.
//!
//! Everything else is noise and ignored.

use std::collections::HashMap;
use std::io::{self, BufRead};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, trace};

use crate::model::{full_name, Issue, UNKNOWN_REASON};

const HEADER_PREFIX: &str = "# ";

static INLINING_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r": inlining call to ([^ ]*)").expect("Invalid regex"));
static CAN_INLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r": can inline ([^ ]*)").expect("Invalid regex"));
static CANNOT_INLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r": cannot inline ([^ ]*): (.*)").expect("Invalid regex"));

/// One classified line of compiler output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticLine<'a> {
    /// `# <package>`; switches the package context for subsequent lines.
    Header { package: &'a str },
    /// The symbol was inlined at some call site.
    InliningCall { symbol: &'a str },
    /// The symbol is inlineable.
    CanInline { symbol: &'a str },
    /// The symbol is not inlineable, with the compiler's explanation.
    CannotInline { symbol: &'a str, reason: &'a str },
    Other,
}

/// Classify a single line (without its trailing newline).
///
/// Headers win over everything else, then call-site inlining, then
/// `can inline`, then `cannot inline`.
pub fn classify(line: &str) -> DiagnosticLine<'_> {
    if let Some(package) = line.strip_prefix(HEADER_PREFIX) {
        return DiagnosticLine::Header { package };
    }
    if let Some(symbol) = first_group(&INLINING_CALL, line) {
        return DiagnosticLine::InliningCall { symbol };
    }
    if let Some(symbol) = first_group(&CAN_INLINE, line) {
        return DiagnosticLine::CanInline { symbol };
    }
    if let Some(caps) = CANNOT_INLINE.captures(line) {
        if let (Some(symbol), Some(reason)) = (caps.get(1), caps.get(2)) {
            return DiagnosticLine::CannotInline {
                symbol: symbol.as_str(),
                reason: reason.as_str(),
            };
        }
    }
    DiagnosticLine::Other
}

fn first_group<'a>(re: &Regex, line: &'a str) -> Option<&'a str> {
    re.captures(line).and_then(|caps| caps.get(1)).map(|m| m.as_str())
}

/// Working set of candidates not yet proven inlineable.
///
/// Every registered name starts out with [`UNKNOWN_REASON`]; positive lines
/// remove it, negative lines replace the reason while it is still pending.
#[derive(Debug, Default)]
pub struct PendingReasons {
    reasons: HashMap<String, String>,
    current_package: String,
}

impl PendingReasons {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fully-qualified name. Returns `false` if it was already present.
    pub fn register(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.reasons.contains_key(&name) {
            return false;
        }
        self.reasons.insert(name, UNKNOWN_REASON.to_string());
        true
    }

    /// Package announced by the most recent header line (empty before any).
    pub fn current_package(&self) -> &str {
        &self.current_package
    }

    pub fn len(&self) -> usize {
        self.reasons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reasons.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.reasons.contains_key(name)
    }

    /// Apply one line of compiler output.
    pub fn observe(&mut self, line: &str) {
        let classified = classify(line);
        trace!(?classified, "diagnostic line");
        match classified {
            DiagnosticLine::Header { package } => {
                debug!(package, "entering package");
                self.current_package = package.to_string();
            }
            DiagnosticLine::InliningCall { symbol } | DiagnosticLine::CanInline { symbol } => {
                self.reasons.remove(&full_name(&self.current_package, symbol));
            }
            DiagnosticLine::CannotInline { symbol, reason } => {
                if let Some(slot) = self.reasons.get_mut(&full_name(&self.current_package, symbol)) {
                    *slot = reason.to_string();
                }
            }
            DiagnosticLine::Other => {}
        }
    }

    /// Feed every line of `reader` through [`observe`](Self::observe).
    ///
    /// Lines are split on `\n`, a trailing `\r` is dropped, and invalid UTF-8
    /// is decoded lossily. Returns the number of lines read.
    pub fn scan<R: BufRead>(&mut self, mut reader: R) -> io::Result<usize> {
        let mut buf = Vec::new();
        let mut lines = 0;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            lines += 1;
            let decoded = String::from_utf8_lossy(&buf);
            let decoded: &str = &decoded;
            let line = decoded.strip_suffix('\n').unwrap_or(decoded);
            self.observe(line.strip_suffix('\r').unwrap_or(line));
        }
        Ok(lines)
    }

    /// Remaining entries as issues, sorted by their rendered `name: reason` form.
    pub fn into_issues(self) -> Vec<Issue> {
        let mut issues: Vec<(String, Issue)> = self
            .reasons
            .into_iter()
            .map(|(name, reason)| {
                let issue = Issue::new(name, reason);
                (issue.to_string(), issue)
            })
            .collect();
        issues.sort_by(|a, b| a.0.cmp(&b.0));
        issues.into_iter().map(|(_, issue)| issue).collect()
    }
}
