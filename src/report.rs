//! Outcomes, statistics and the serializable run report.
use serde::Serialize;
use std::path::PathBuf;

/// What happened to a single scanned entry.
///
/// Each outcome keeps its precise cause for logging, while [`Outcome::tally`]
/// collapses it into the bucket used by the run totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    SkippedDirectory,
    SkippedHidden,
    /// Matched a configured exclusion rule.
    SkippedExcluded,
    SkippedNoExtension,
    /// A file with the same name is already at the destination.
    SkippedConflict { destination: PathBuf },
    Moved { destination: PathBuf },
    /// Would have been moved; nothing was touched.
    Simulated { destination: PathBuf },
    /// The category folder could not be created.
    FailedCreate { directory: PathBuf, reason: String },
    FailedPermission { destination: PathBuf, reason: String },
    FailedOther { destination: PathBuf, reason: String },
}

/// Bucket an outcome is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tally {
    Moved,
    Skipped,
    Failed,
}

impl Outcome {
    /// Maps the outcome onto the run totals.
    ///
    /// Failed moves are counted as skipped; only a failure to create the
    /// category folder is counted as failed.
    pub fn tally(&self) -> Tally {
        match self {
            Outcome::Moved { .. } | Outcome::Simulated { .. } => Tally::Moved,
            Outcome::FailedCreate { .. } => Tally::Failed,
            Outcome::SkippedDirectory
            | Outcome::SkippedHidden
            | Outcome::SkippedExcluded
            | Outcome::SkippedNoExtension
            | Outcome::SkippedConflict { .. }
            | Outcome::FailedPermission { .. }
            | Outcome::FailedOther { .. } => Tally::Skipped,
        }
    }

    /// Short tag used in log lines.
    pub fn reason(&self) -> &'static str {
        match self {
            Outcome::SkippedDirectory => "directory",
            Outcome::SkippedHidden => "hidden",
            Outcome::SkippedExcluded => "excluded",
            Outcome::SkippedNoExtension => "no extension",
            Outcome::SkippedConflict { .. } => "already exists",
            Outcome::Moved { .. } => "moved",
            Outcome::Simulated { .. } => "dry run",
            Outcome::FailedCreate { .. } => "cannot create folder",
            Outcome::FailedPermission { .. } => "permission denied",
            Outcome::FailedOther { .. } => "move failed",
        }
    }
}

/// Log record for one scanned entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRecord {
    pub name: String,
    /// Destination category, for entries that were classified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Counters accumulated over one run.
///
/// At the end of a run `total_items == moved + skipped + failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    pub total_items: usize,
    /// Moved, or would have been moved in a dry run.
    pub moved: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunStatistics {
    /// Counts one entry.
    pub fn record(&mut self, outcome: &Outcome) {
        self.total_items += 1;
        match outcome.tally() {
            Tally::Moved => self.moved += 1,
            Tally::Skipped => self.skipped += 1,
            Tally::Failed => self.failed += 1,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.total_items == self.moved + self.skipped + self.failed
    }
}

/// Everything a run produced, ready for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// RFC 3339 time the run started.
    pub timestamp: String,
    pub target: PathBuf,
    pub dry_run: bool,
    pub statistics: RunStatistics,
    pub items: Vec<ItemRecord>,
}

impl RunReport {
    pub fn new(target: PathBuf, dry_run: bool) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            target,
            dry_run,
            statistics: RunStatistics::default(),
            items: Vec::new(),
        }
    }

    /// Adds an item record to the report.
    pub fn push(&mut self, record: ItemRecord) {
        self.items.push(record);
    }

    /// Number of moved (or simulated) items per category, sorted by name.
    pub fn moved_by_category(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for record in &self.items {
            if record.outcome.tally() != Tally::Moved {
                continue;
            }
            let Some(category) = &record.category else {
                continue;
            };
            match counts.iter_mut().find(|(name, _)| name == category) {
                Some((_, count)) => *count += 1,
                None => counts.push((category.clone(), 1)),
            }
        }
        counts.sort();
        counts
    }
}
