//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output: per-item log lines,
//! the end-of-run summary, progress tracking and the JSON report.

use crate::report::{ItemRecord, Outcome, RunReport, RunStatistics};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Per-item disposition lines
/// - Progress bars for operations
/// - Summary tables with statistics
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dirsort::output::OutputFormatter;
    /// OutputFormatter::success("Organization complete!");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark, on stderr.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol, on stderr.
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Prints the log line for one scanned entry.
    ///
    /// Skips are shown in yellow, failures in red with their cause.
    pub fn item(record: &ItemRecord) {
        let name = &record.name;
        match &record.outcome {
            Outcome::Moved { .. } => {
                let category = record.category.as_deref().unwrap_or_default();
                Self::success(&format!("Moved {} → {}/", name, category));
            }
            Outcome::Simulated { .. } => {
                let category = record.category.as_deref().unwrap_or_default();
                Self::dry_run_notice(&format!("Would move {} → {}/", name, category));
            }
            Outcome::SkippedConflict { destination } => {
                println!(
                    "{} Skipped {} ({}: {})",
                    "⚠".yellow(),
                    name,
                    record.outcome.reason(),
                    destination.display()
                );
            }
            Outcome::FailedCreate { directory, reason } => Self::error(&format!(
                "Failed {} ({} {}: {})",
                name,
                record.outcome.reason(),
                directory.display(),
                reason
            )),
            Outcome::FailedPermission { reason, .. } | Outcome::FailedOther { reason, .. } => {
                Self::error(&format!(
                    "Failed {} ({}: {})",
                    name,
                    record.outcome.reason(),
                    reason
                ))
            }
            Outcome::SkippedDirectory
            | Outcome::SkippedHidden
            | Outcome::SkippedExcluded
            | Outcome::SkippedNoExtension => {
                println!(
                    "{} Skipped {} ({})",
                    "-".dimmed(),
                    name,
                    record.outcome.reason()
                );
            }
        }
    }

    /// Creates and returns a progress bar for file operations.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dirsort::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(100);
    /// pb.inc(1);
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints the four run counters.
    pub fn statistics(stats: &RunStatistics, dry_run: bool) {
        Self::header(if dry_run { "DRY RUN SUMMARY" } else { "SUMMARY" });
        let moved_label = if dry_run { "Would move" } else { "Moved" };
        println!("{:<12} {}", "Total items", stats.total_items);
        println!("{:<12} {}", moved_label, stats.moved.to_string().green());
        println!("{:<12} {}", "Skipped", stats.skipped.to_string().yellow());
        println!("{:<12} {}", "Failed", stats.failed.to_string().red());
    }

    /// Prints a table of moved file counts by category.
    pub fn summary_table(category_counts: &[(String, usize)], total_files: usize) {
        if category_counts.is_empty() {
            return;
        }

        let max_category_len = category_counts
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max(8); // At least "Category" width

        println!();
        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 10));

        for (category, count) in category_counts {
            let file_word = if *count == 1 { "file" } else { "files" };
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                file_word,
                width = max_category_len
            );
        }

        println!("{}", "-".repeat(max_category_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            if total_files == 1 { "file" } else { "files" },
            width = max_category_len
        );
    }

    /// Prints the end-of-run summary and the closing banner.
    pub fn report(report: &RunReport) {
        Self::statistics(&report.statistics, report.dry_run);
        Self::summary_table(&report.moved_by_category(), report.statistics.moved);

        println!();
        if report.dry_run {
            Self::success("Dry run complete. No files were modified.");
        } else {
            Self::success("Organization complete!");
        }
    }

    /// Prints the report as a single JSON document.
    pub fn json(report: &RunReport) -> Result<(), String> {
        let json = serde_json::to_string_pretty(report)
            .map_err(|e| format!("Failed to serialize report: {}", e))?;
        println!("{}", json);
        Ok(())
    }
}
