//! Command-line interface module for dirsort.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Target directory validation
//! - Configuration loading with fallback
//! - Organization orchestration and output

use crate::category_index::build_index;
use crate::config::DirsortConfig;
use crate::file_organizer::Organizer;
use crate::output::OutputFormatter;
use crate::report::{RunReport, RunStatistics};
use clap::{ArgAction, Parser};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};

/// dirsort - sort the files of a directory into category folders
///
/// Every file directly inside DIRECTORY is moved into a subfolder named after
/// its category ("Documents", "Images", ...), chosen by its extension.
/// Directories, hidden files and files without an extension stay where they
/// are, and existing files are never overwritten.
#[derive(Parser, Debug, Clone)]
#[command(name = "dirsort")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory to organize
    ///
    /// If not specified, defaults to the current directory.
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Show what would be moved without changing anything
    #[arg(short = 'n', long = "dry-run", action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Configuration file (TOML) with categories and exclusion rules
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Only print the summary
    #[arg(short = 'q', long = "quiet", action = ArgAction::SetTrue, conflicts_with = "json")]
    pub quiet: bool,

    /// Print the run report as JSON
    #[arg(long = "json", action = ArgAction::SetTrue)]
    pub json: bool,

    /// Print the effective configuration and exit
    #[arg(long = "print-config", action = ArgAction::SetTrue)]
    pub print_config: bool,
}

/// How much a run prints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Per-item lines, progress bar and summary.
    #[default]
    Human,
    /// Summary only.
    Quiet,
    /// A single JSON report on stdout.
    Json,
}

/// Options for one organization run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub dry_run: bool,
    pub config_path: Option<PathBuf>,
    pub output: OutputMode,
}

impl From<&Args> for RunOptions {
    fn from(args: &Args) -> Self {
        let output = if args.json {
            OutputMode::Json
        } else if args.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Human
        };

        Self {
            dry_run: args.dry_run,
            config_path: args.config.clone(),
            output,
        }
    }
}

/// Runs the CLI with parsed arguments.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use dirsort::cli::{Args, run};
///
/// let args = Args::parse_from(["dirsort", "/home/user/Downloads", "--dry-run"]);
/// if let Err(e) = run(&args) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run(args: &Args) -> Result<(), String> {
    if args.print_config {
        return print_config(args.config.as_deref());
    }
    run_cli(&args.directory, &RunOptions::from(args)).map(|_| ())
}

/// Organizes `dir_path` and returns the run statistics.
///
/// This function:
/// 1. Validates the target directory
/// 2. Loads the configuration, falling back to the built-in one
/// 3. Builds the extension index
/// 4. Scans the directory and processes every entry
/// 5. Prints per-item lines and the summary (or the JSON report)
///
/// Per-item failures are reported and counted; only an unreadable or
/// invalid target directory is returned as an error.
pub fn run_cli(dir_path: &Path, options: &RunOptions) -> Result<RunStatistics, String> {
    validate_target(dir_path)?;

    let loaded = DirsortConfig::load_or_default(options.config_path.as_deref());
    if let Some(reason) = &loaded.fallback_reason {
        OutputFormatter::warning(&format!("{}; using the default configuration", reason));
    }

    let index = build_index(&loaded.config.categories);
    let organizer = Organizer::new(dir_path, &index)
        .dry_run(options.dry_run)
        .filters(loaded.filters);

    if options.output != OutputMode::Json {
        if options.dry_run {
            OutputFormatter::dry_run_notice(&format!(
                "Analyzing contents of: {}",
                dir_path.display()
            ));
        } else {
            OutputFormatter::info(&format!("Organizing contents of: {}", dir_path.display()));
        }
    }

    let entries = organizer
        .scan()
        .map_err(|e| format!("Error reading directory {}: {}", dir_path.display(), e))?;

    let progress = match options.output {
        OutputMode::Human => OutputFormatter::create_progress_bar(entries.len() as u64),
        OutputMode::Quiet | OutputMode::Json => ProgressBar::hidden(),
    };

    let mut report = RunReport::new(dir_path.to_path_buf(), options.dry_run);
    let statistics = organizer.organize_entries(&entries, |record| {
        if options.output == OutputMode::Human {
            progress.suspend(|| OutputFormatter::item(record));
        }
        progress.inc(1);
        report.push(record.clone());
    });
    progress.finish_and_clear();
    report.statistics = statistics;

    match options.output {
        OutputMode::Json => OutputFormatter::json(&report)?,
        OutputMode::Human | OutputMode::Quiet => OutputFormatter::report(&report),
    }

    Ok(report.statistics)
}

/// Prints the effective configuration as TOML.
pub fn print_config(config_path: Option<&Path>) -> Result<(), String> {
    let loaded = DirsortConfig::load_or_default(config_path);
    if let Some(reason) = &loaded.fallback_reason {
        OutputFormatter::warning(&format!("{}; using the default configuration", reason));
    }

    let rendered = loaded
        .config
        .to_toml()
        .map_err(|e| format!("Error rendering configuration: {}", e))?;
    match &loaded.source {
        Some(path) => println!("# Loaded from {}", path.display()),
        None => println!("# Built-in default configuration"),
    }
    print!("{}", rendered);
    Ok(())
}

/// Checks that the target exists and is a directory.
fn validate_target(dir_path: &Path) -> Result<(), String> {
    if !dir_path.exists() {
        return Err(format!("Directory does not exist: {}", dir_path.display()));
    }
    if !dir_path.is_dir() {
        return Err(format!("Not a directory: {}", dir_path.display()));
    }
    Ok(())
}
