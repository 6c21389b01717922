use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use tracing::{debug, info};

use crate::config::BuildConfig;
use crate::services::check::{BuildStatus, CheckError, DiagnosticSource, DiagnosticStream};

/// Environment variable overriding the `go` executable.
pub const GO_BIN_ENV: &str = "INLCHECK_GO_BIN";
/// Rebuild every package, so cached packages still print their diagnostics.
pub const REBUILD_FLAG: &str = "-a";
/// Maximum inlining verbosity for every package in the build graph.
pub const DIAGNOSTICS_FLAG: &str = "-gcflags=all=-m -m";

/// Runs `go build` and streams its merged stdout/stderr.
///
/// Both channels of the child share the write end of one OS pipe, so lines
/// arrive in the order the toolchain printed them and the kernel buffer
/// applies backpressure if the reader falls behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoToolchain {
    go_bin: PathBuf,
    dir: Option<PathBuf>,
    extra_args: Vec<String>,
}

impl GoToolchain {
    pub fn new(go_bin: impl Into<PathBuf>) -> Self {
        Self { go_bin: go_bin.into(), dir: None, extra_args: Vec::new() }
    }

    /// Use `$INLCHECK_GO_BIN` if set, otherwise `go` from `PATH`.
    pub fn from_env() -> Self {
        Self::new(resolve_go_path())
    }

    /// Build from a config section; a relative `dir` is resolved against `base`.
    pub fn from_config(config: &BuildConfig, base: &Path) -> Self {
        let go_bin = config.go.as_ref().map(PathBuf::from).unwrap_or_else(resolve_go_path);
        Self {
            go_bin,
            dir: config.resolve_dir(base),
            extra_args: config.args.clone(),
        }
    }

    /// Run the build from `dir` instead of the current directory.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Extra `go build` flags, placed before the package list.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn go_bin(&self) -> &Path {
        &self.go_bin
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Full argument list passed to the `go` executable.
    pub fn build_args(&self, packages: &[String]) -> Vec<String> {
        let mut args =
            vec!["build".to_string(), REBUILD_FLAG.to_string(), DIAGNOSTICS_FLAG.to_string()];
        args.extend(self.extra_args.iter().cloned());
        args.extend(packages.iter().cloned());
        args
    }
}

impl DiagnosticSource for GoToolchain {
    fn open(&self, packages: &[String]) -> Result<DiagnosticStream, CheckError> {
        let (reader, writer) = io::pipe()?;
        let stderr_writer = writer.try_clone()?;

        let args = self.build_args(packages);
        info!(go = %self.go_bin.display(), ?args, "starting go build");
        let mut cmd = Command::new(&self.go_bin);
        cmd.args(&args).stdin(Stdio::null()).stdout(writer).stderr(stderr_writer);
        if let Some(dir) = &self.dir {
            cmd.current_dir(dir);
        }

        let go_bin = self.go_bin.clone();
        let producer = thread::Builder::new()
            .name("inlcheck-go-build".to_string())
            .spawn(move || run_to_completion(cmd, &go_bin))?;

        Ok(DiagnosticStream::from_producer(reader, producer))
    }

    fn name(&self) -> &'static str {
        "go"
    }
}

fn resolve_go_path() -> PathBuf {
    std::env::var_os(GO_BIN_ENV).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("go"))
}

/// Spawn and wait for the build. The pipe's write ends held by `cmd` are
/// released right after spawning, so the reader sees end of stream once the
/// child exits (or immediately, if it never started).
fn run_to_completion(mut cmd: Command, go_bin: &Path) -> BuildStatus {
    let spawned = cmd.spawn();
    drop(cmd);

    let mut child = match spawned {
        Ok(child) => child,
        Err(e) => {
            return BuildStatus::LaunchFailed {
                message: format!("failed to spawn {}: {e}", go_bin.display()),
            }
        }
    };

    match child.wait() {
        Ok(status) if status.success() => {
            debug!("go build exited successfully");
            BuildStatus::Succeeded
        }
        Ok(status) => {
            debug!(%status, "go build exited unsuccessfully");
            BuildStatus::Failed { code: status.code() }
        }
        Err(e) => BuildStatus::LaunchFailed {
            message: format!("failed to wait for {}: {e}", go_bin.display()),
        },
    }
}
