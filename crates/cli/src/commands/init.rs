use anyhow::{anyhow, Result};
use inlcheck_core::config::{write_candidates_file, CandidatesFile};

use crate::absolutize;

/// Write a starter candidates file at `path` (YAML or JSON by extension).
pub fn init_command(path: &str, force: bool) -> Result<()> {
    let target = absolutize(path)?;
    if target.exists() && !force {
        return Err(anyhow!(
            "Refusing to overwrite existing file {} (pass --force to replace it)",
            target.display()
        ));
    }

    write_candidates_file(&target, &CandidatesFile::starter())?;

    println!("Wrote candidates file: {}", target.display());
    println!("Edit the `candidates` section, then run:");
    println!("  inlcheck check --file {}", target.display());
    Ok(())
}
