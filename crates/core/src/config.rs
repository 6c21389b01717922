//! Candidates file: the symbols to check plus optional build settings.
//!
//! The file is YAML (`.yaml`/`.yml`) or JSON (`.json`):
//!
//! ```yaml
//! build:
//!   dir: .
//!   args: ["-tags=purego"]
//! candidates:
//!   bytes: ["(*Buffer).Len", "(*Buffer).Cap"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::Candidates;

/// How to run `go build`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Explicit `go` executable; falls back to `INLCHECK_GO_BIN`, then `go`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go: Option<String>,
    /// Working directory for the build (relative to the candidates file).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    /// Extra build flags placed before the package list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Treat a failed build as an error instead of reporting partial results.
    #[serde(default)]
    pub strict: bool,
}

impl BuildConfig {
    /// Resolve `dir` against `base` unless it is absolute.
    pub fn resolve_dir(&self, base: &Path) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| {
            let dir = Path::new(dir);
            if dir.is_absolute() {
                dir.to_path_buf()
            } else {
                base.join(dir)
            }
        })
    }
}

/// Serializable contents of a candidates file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatesFile {
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub candidates: Candidates,
}

impl CandidatesFile {
    /// Starter contents written by `inlcheck init`.
    pub fn starter() -> Self {
        Self {
            build: BuildConfig::default(),
            candidates: Candidates::new()
                .with("bytes", ["(*Buffer).Len", "(*Buffer).Cap"])
                .with("errors", ["New"]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()).unwrap_or_default() {
            "yaml" | "yml" => Ok(FileFormat::Yaml),
            "json" => Ok(FileFormat::Json),
            other => Err(anyhow!(
                "Unsupported candidates file extension '{}' for {} (expected yaml, yml or json)",
                other,
                path.display()
            )),
        }
    }
}

/// Read and parse a candidates file.
pub fn load_candidates_file(path: &Path) -> Result<CandidatesFile> {
    let format = FileFormat::from_path(path)?;
    let body = fs::read_to_string(path)
        .with_context(|| format!("Failed to read candidates file at {}", path.display()))?;
    let file: CandidatesFile = match format {
        FileFormat::Yaml => serde_yaml::from_str(&body)
            .with_context(|| format!("Failed to parse candidates YAML at {}", path.display()))?,
        FileFormat::Json => serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse candidates JSON at {}", path.display()))?,
    };
    Ok(file)
}

/// Serialize `file` in the format implied by `path` and write it.
pub fn write_candidates_file(path: &Path, file: &CandidatesFile) -> Result<()> {
    let body = match FileFormat::from_path(path)? {
        FileFormat::Yaml => {
            serde_yaml::to_string(file).context("Failed to serialize candidates to YAML")?
        }
        FileFormat::Json => {
            serde_json::to_string_pretty(file).context("Failed to serialize candidates to JSON")?
        }
    };
    fs::write(path, body)
        .with_context(|| format!("Failed to write candidates file at {}", path.display()))?;
    Ok(())
}
