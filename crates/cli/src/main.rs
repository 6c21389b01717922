use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use inlcheck::commands::{check_command, init_command, parse_log_command, CheckOptions};
use inlcheck::init_logging;

/// Checks that performance-sensitive Go functions are inlined by the compiler.
///
/// This CLI is a thin wrapper around `inlcheck-core` (exposed in code as `inlcheck_core`).
/// All substantive logic lives in the library so it can be tested thoroughly
/// and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "inlcheck",
    version,
    about = "Report Go functions the compiler does not inline",
    long_about = None
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the candidate packages with inlining diagnostics and report
    /// every symbol that was not proven inlineable.
    ///
    /// Exits non-zero when at least one symbol is reported.
    Check {
        /// Candidates file (YAML or JSON).
        #[arg(long)]
        file: Option<String>,

        /// Extra candidate as `package.Symbol` or `package=Symbol` (repeatable).
        #[arg(long = "sym")]
        symbols: Vec<String>,

        /// `go` executable. Defaults to the file's `build.go`, then `$INLCHECK_GO_BIN`, then `go`.
        #[arg(long)]
        go: Option<String>,

        /// Directory to run the build in.
        #[arg(long)]
        dir: Option<String>,

        /// Extra `go build` flag, e.g. `--arg=-tags=purego` (repeatable).
        #[arg(long = "arg", allow_hyphen_values = true)]
        args: Vec<String>,

        /// Parse a captured compiler log instead of running `go build`.
        #[arg(long, conflicts_with_all = ["go", "dir", "args"])]
        from_log: Option<String>,

        /// Fail when the build itself fails instead of reporting partial results.
        #[arg(long, default_value_t = false)]
        strict: bool,

        /// Emit the full report as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Write a starter candidates file.
    Init {
        /// Where to write the file (`.yaml`, `.yml` or `.json`).
        #[arg(long, default_value = "inlcheck.yaml")]
        path: String,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    /// Show how each line of a captured compiler log is interpreted.
    ParseLog {
        /// Path to the captured log.
        #[arg(long)]
        path: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Check { file, symbols, go, dir, args, from_log, strict, json } => {
            check_command(&CheckOptions { file, symbols, go, dir, args, from_log, strict, json })?
        }
        Command::Init { path, force } => init_command(&path, force)?,
        Command::ParseLog { path, json } => parse_log_command(&path, json)?,
    }

    Ok(())
}
