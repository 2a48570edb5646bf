//! tava — run AVA tests written in TypeScript.
//!
//! A thin shim around the AVA test runner: precompiles matched test
//! files through the content-addressed compilation cache, generates a
//! temporary runner configuration wiring up the TypeScript register
//! hook, and invokes `ava` as a subprocess with forwarded flags and
//! standard streams.

#![warn(missing_docs)]

mod patterns;
mod precompile;
mod runner;

use std::process;

use clap::Parser;

use tava_config::{
    find_project_root, load_manifest, project_config_path, tsconfig_path, RunnerConfig,
};

/// tava — run AVA tests written in TypeScript.
#[derive(Parser, Debug)]
#[command(name = "tava", version, about = "Run AVA tests written in TypeScript")]
pub struct Cli {
    /// Files, directories, or globs selecting test files.
    ///
    /// Defaults to `test.ts test-*.ts test/**/*.ts **/__tests__/**/*.ts
    /// **/*.test.ts` when omitted.
    pub patterns: Vec<String>,

    /// Re-run tests when tests and source files change.
    #[arg(short, long)]
    pub watch: bool,

    /// Only run tests with matching title (can be repeated).
    #[arg(short = 'm', long = "match", value_name = "PATTERN")]
    pub match_title: Vec<String>,

    /// Update snapshots.
    #[arg(short, long)]
    pub update_snapshots: bool,

    /// Stop after first test failure.
    #[arg(long)]
    pub fail_fast: bool,

    /// Set global timeout (e.g. "10s", "2m").
    #[arg(short = 'T', long)]
    pub timeout: Option<String>,

    /// Run tests serially.
    #[arg(short, long)]
    pub serial: bool,

    /// Max number of test files running at the same time.
    #[arg(short, long)]
    pub concurrency: Option<u32>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Generate TAP output.
    #[arg(short, long)]
    pub tap: bool,

    /// Force color output.
    #[arg(long, overrides_with = "no_color")]
    pub color: bool,

    /// Disable color output.
    #[arg(long, overrides_with = "color")]
    pub no_color: bool,

    /// Reset the compilation cache and exit.
    #[arg(long)]
    pub reset_cache: bool,
}

impl Cli {
    /// Reconstructs the flag list forwarded verbatim to the runner.
    ///
    /// The file list is appended separately by the caller;
    /// `--reset-cache` is handled locally and never forwarded.
    pub fn forwarded_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.watch {
            args.push("--watch".to_string());
        }
        for pattern in &self.match_title {
            args.push("--match".to_string());
            args.push(pattern.clone());
        }
        if self.update_snapshots {
            args.push("--update-snapshots".to_string());
        }
        if self.fail_fast {
            args.push("--fail-fast".to_string());
        }
        if let Some(timeout) = &self.timeout {
            args.push("--timeout".to_string());
            args.push(timeout.clone());
        }
        if self.serial {
            args.push("--serial".to_string());
        }
        if let Some(concurrency) = self.concurrency {
            args.push("--concurrency".to_string());
            args.push(concurrency.to_string());
        }
        if self.verbose {
            args.push("--verbose".to_string());
        }
        if self.tap {
            args.push("--tap".to_string());
        }
        if self.color {
            args.push("--color".to_string());
        }
        if self.no_color {
            args.push("--no-color".to_string());
        }
        args
    }
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Runs the shim end to end, returning the exit code to report.
fn run(cli: &Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let project_dir = find_project_root(&cwd)?;

    if cli.reset_cache {
        return runner::reset_cache(&project_dir, cli.verbose);
    }

    let manifest = load_manifest(&project_dir)?;

    let requested: Vec<String> = if cli.patterns.is_empty() {
        patterns::DEFAULT_PATTERNS
            .iter()
            .map(|p| p.to_string())
            .collect()
    } else {
        cli.patterns.clone()
    };
    let files = patterns::expand_patterns(&cwd, &requested)?;

    if cli.verbose {
        eprintln!("   Found {} test file(s)", files.len());
    }

    precompile::run(&project_dir, &files, cli.verbose)?;

    let config = RunnerConfig {
        project_config_path: project_config_path(&project_dir),
        package_config: manifest.runner_section(),
        tsconfig_path: tsconfig_path(&project_dir),
        project_dir,
    };

    let mut args = cli.forwarded_args();
    args.extend(files.iter().map(|f| f.to_string_lossy().into_owned()));

    runner::invoke(&config, &args, cli.verbose)
}
