//! Core data model: candidate sets, fully-qualified names, and issues.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Reason reported for a candidate that never showed up in the compiler log.
pub const UNKNOWN_REASON: &str = "unknown reason";

/// Join a package identifier and a symbol into a fully-qualified name.
///
/// ```
/// assert_eq!(inlcheck_core::model::full_name("bytes", "(*Buffer).Len"), "bytes.(*Buffer).Len");
/// ```
pub fn full_name(package: &str, symbol: &str) -> String {
    format!("{package}.{symbol}")
}

/// Symbols to check, grouped by Go package import path.
///
/// Examples:
/// - `"io"`: `["ReadAll"]` checks the `io.ReadAll` function.
/// - `"bytes"`: `["(*Buffer).Len"]` checks the `bytes.Buffer.Len` method.
///
/// Validation (non-empty packages, unique fully-qualified names) happens when
/// the set is checked, not when it is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Candidates(BTreeMap<String, Vec<String>>);

impl Candidates {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Append a single symbol to `package`.
    pub fn add(&mut self, package: impl Into<String>, symbol: impl Into<String>) -> &mut Self {
        self.0.entry(package.into()).or_default().push(symbol.into());
        self
    }

    /// Builder-style helper appending several symbols to `package`.
    pub fn with<I, S>(mut self, package: impl Into<String>, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.entry(package.into()).or_default().extend(symbols.into_iter().map(Into::into));
        self
    }

    /// Distinct package identifiers, sorted.
    pub fn packages(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(pkg, syms)| (pkg.as_str(), syms.as_slice()))
    }

    /// Total number of registered symbols across all packages.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Merge another candidate set into this one.
    pub fn extend(&mut self, other: Candidates) {
        for (pkg, syms) in other.0 {
            self.0.entry(pkg).or_default().extend(syms);
        }
    }

    /// SHA-256 over the sorted fully-qualified names, as lowercase hex.
    ///
    /// Two sets registering the same names produce the same digest no matter
    /// how they were assembled, so reports from repeated runs can be compared.
    pub fn digest(&self) -> String {
        let mut names: Vec<String> = self
            .iter()
            .flat_map(|(pkg, syms)| syms.iter().map(move |sym| full_name(pkg, sym)))
            .collect();
        names.sort();

        let mut hasher = Sha256::new();
        for name in &names {
            hasher.update(name.as_bytes());
            hasher.update(b"\n");
        }
        format!("{:x}", hasher.finalize())
    }
}

impl From<HashMap<String, Vec<String>>> for Candidates {
    fn from(map: HashMap<String, Vec<String>>) -> Self {
        Self(map.into_iter().collect())
    }
}

impl From<BTreeMap<String, Vec<String>>> for Candidates {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        Self(map)
    }
}

impl<P, I, S> FromIterator<(P, I)> for Candidates
where
    P: Into<String>,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (P, I)>>(iter: T) -> Self {
        iter.into_iter().fold(Candidates::new(), |set, (pkg, syms)| set.with(pkg, syms))
    }
}

/// A symbol that was not proven inlineable, with the best reason available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Fully-qualified name (`package.symbol`).
    pub name: String,
    /// Verbatim compiler reason, or [`UNKNOWN_REASON`].
    pub reason: String,
}

impl Issue {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { name: name.into(), reason: reason.into() }
    }

    pub fn is_unknown(&self) -> bool {
        self.reason == UNKNOWN_REASON
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.reason)
    }
}
