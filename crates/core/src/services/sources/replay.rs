use std::fs::File;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::services::check::{BuildStatus, CheckError, DiagnosticSource, DiagnosticStream};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Origin {
    File(PathBuf),
    Text(String),
}

/// Serves compiler output captured earlier, e.g. with
/// `go build -a -gcflags='all=-m -m' ./... 2>&1 | tee inl.log`.
///
/// The requested package list is ignored: the log already says which packages
/// it covers through its `# <package>` headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogReplay {
    origin: Origin,
}

impl LogReplay {
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self { origin: Origin::File(path.into()) }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self { origin: Origin::Text(text.into()) }
    }

    /// Path of the replayed log, if it comes from disk.
    pub fn path(&self) -> Option<&Path> {
        match &self.origin {
            Origin::File(path) => Some(path),
            Origin::Text(_) => None,
        }
    }
}

impl DiagnosticSource for LogReplay {
    fn open(&self, packages: &[String]) -> Result<DiagnosticStream, CheckError> {
        debug!(?packages, "replaying captured compiler output");
        let stream = match &self.origin {
            Origin::File(path) => {
                DiagnosticStream::completed(File::open(path)?, BuildStatus::Replayed)
            }
            Origin::Text(text) => DiagnosticStream::completed(
                Cursor::new(text.clone().into_bytes()),
                BuildStatus::Replayed,
            ),
        };
        Ok(stream)
    }

    fn name(&self) -> &'static str {
        "replay"
    }
}
