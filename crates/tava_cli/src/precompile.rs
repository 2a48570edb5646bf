//! The precompile pass run before the test runner is spawned.
//!
//! Pushes every matched test file through one [`Precompiler`] instance
//! bound to the project's cache directory, so repeated runs skip the
//! transform for unchanged files.

use std::path::{Path, PathBuf};

use tava_cache::{PackageDescriptor, PassthroughTransform, Precompiler, PrecompilerConfig, Transform};

/// Returns the project's compilation cache directory.
///
/// Lives under `node_modules/.cache` like other tooling caches in the
/// runner's ecosystem, so standard cleanups sweep it too.
pub fn cache_dir(project_dir: &Path) -> PathBuf {
    project_dir
        .join("node_modules")
        .join(".cache")
        .join("tava")
}

/// Builds the precompiler for a project.
///
/// The salt entries carry the runner-relevant knobs the generated config
/// hardcodes; changing them in a future release invalidates old entries.
/// The transform is selected lazily, so a fully cached run never
/// constructs it.
pub fn build_precompiler(project_dir: &Path) -> Result<Precompiler, Box<dyn std::error::Error>> {
    let precompiler = Precompiler::new(PrecompilerConfig {
        cache_dir: cache_dir(project_dir),
        package: PackageDescriptor::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        cache_keys: vec![
            ("extensions".to_string(), "ts,tsx".to_string()),
            ("require".to_string(), "ts-node/register".to_string()),
        ],
        transform_selector: Box::new(|| Box::new(PassthroughTransform) as Box<dyn Transform>),
    })?;
    Ok(precompiler)
}

/// Precompiles every file, reporting per-file keys when verbose.
///
/// Returns the number of files processed. Any unreadable file or
/// transform failure aborts the run.
pub fn run(
    project_dir: &Path,
    files: &[PathBuf],
    verbose: bool,
) -> Result<usize, Box<dyn std::error::Error>> {
    let precompiler = build_precompiler(project_dir)?;

    for file in files {
        let key = precompiler.precompile(file)?;
        if verbose {
            eprintln!("   Precompiled {} -> {key}", file.display());
        }
    }

    Ok(files.len())
}
