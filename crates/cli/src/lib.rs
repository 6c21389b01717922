use std::env;
use std::path::{Path, PathBuf};
use std::sync::Once;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

pub mod commands;

static LOGGING: Once = Once::new();

/// Install the stderr tracing subscriber once per process.
///
/// `RUST_LOG` wins when set; otherwise each `-v` raises the level from `warn`.
pub fn init_logging(verbosity: u8) {
    LOGGING.call_once(|| {
        let level = match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("inlcheck={level},inlcheck_core={level}"))
        });
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .try_init();
    });
}

/// Make `path` absolute: canonicalize it if it exists, otherwise join it onto
/// the current working directory.
pub fn absolutize(path: &str) -> Result<PathBuf> {
    let candidate = Path::new(path);
    if let Ok(p) = candidate.canonicalize() {
        return Ok(p);
    }
    if candidate.is_absolute() {
        return Ok(candidate.to_path_buf());
    }
    let cwd = env::current_dir().context("Failed to get current directory")?;
    Ok(cwd.join(candidate))
}

/// Split a `--sym` argument into `(package, symbol)`.
///
/// Accepted forms:
/// - `package=Symbol`, split at the first `=`.
/// - `package.Symbol`, split at the first `.` after the last `/`, so
///   `github.com/x/y.(*T).M` becomes `("github.com/x/y", "(*T).M")`.
///
/// Use the `=` form for packages whose last path element contains a dot
/// (e.g. `gopkg.in/yaml.v3=Marshal`).
pub fn parse_symbol_arg(arg: &str) -> Result<(String, String)> {
    let (package, symbol) = match arg.split_once('=') {
        Some(split) => split,
        None => {
            let tail_start = arg.rfind('/').map(|i| i + 1).unwrap_or(0);
            let dot = arg[tail_start..].find('.').map(|i| tail_start + i).ok_or_else(|| {
                anyhow!("Invalid symbol '{}': expected package.Symbol or package=Symbol", arg)
            })?;
            (&arg[..dot], &arg[dot + 1..])
        }
    };
    if package.is_empty() || symbol.is_empty() {
        return Err(anyhow!(
            "Invalid symbol '{}': expected package.Symbol or package=Symbol",
            arg
        ));
    }
    Ok((package.to_string(), symbol.to_string()))
}
