//! Test-runner invocation.
//!
//! Writes the generated runner configuration into a temporary directory,
//! spawns the underlying runner from there with inherited standard
//! streams, and translates its exit status. Also hosts `--reset-cache`.

use std::path::Path;
use std::process::Command;

use tava_config::RunnerConfig;

use crate::precompile;

/// Name of the underlying test-runner executable.
const RUNNER_PROGRAM: &str = "ava";

/// Name of the generated configuration file the runner picks up from
/// its working directory.
const RUNNER_CONFIG_FILE: &str = "ava.config.js";

/// Invokes the test runner with the given forwarded arguments.
///
/// Returns the runner's exit code. A non-zero exit is an ordinary test
/// failure, not a shim error; only a failure to spawn is an error.
pub fn invoke(
    config: &RunnerConfig,
    args: &[String],
    verbose: bool,
) -> Result<i32, Box<dyn std::error::Error>> {
    invoke_program(RUNNER_PROGRAM, config, args, verbose)
}

/// Spawns `program` from a temp dir holding the generated config.
fn invoke_program(
    program: &str,
    config: &RunnerConfig,
    args: &[String],
    verbose: bool,
) -> Result<i32, Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    std::fs::write(temp_dir.path().join(RUNNER_CONFIG_FILE), config.render())?;

    if verbose {
        eprintln!("   Invoking {program} from {}", temp_dir.path().display());
    }

    // Stdio is inherited, so the runner owns the terminal until it exits.
    let status = Command::new(program)
        .args(args)
        .current_dir(temp_dir.path())
        .status()
        .map_err(|e| -> Box<dyn std::error::Error> {
            if e.kind() == std::io::ErrorKind::NotFound {
                format!("{program} could not be found; is it installed?").into()
            } else {
                Box::new(e)
            }
        })?;

    // Killed-by-signal has no code; report it as a plain failure.
    Ok(status.code().unwrap_or(1))
}

/// Deletes the project's compilation cache and returns exit code 0.
pub fn reset_cache(project_dir: &Path, verbose: bool) -> Result<i32, Box<dyn std::error::Error>> {
    let dir = precompile::cache_dir(project_dir);
    if dir.exists() {
        std::fs::remove_dir_all(&dir)?;
        if verbose {
            eprintln!("   Removed {}", dir.display());
        }
    } else if verbose {
        eprintln!("   No cache at {}", dir.display());
    }
    Ok(0)
}
