/// Directory organization driver.
///
/// The organizer lists the immediate children of a target directory, asks the
/// classifier what to do with each one and carries out the result: creating
/// the category folder, checking for a name conflict and moving the file.
/// Every per-item problem becomes an [`Outcome`]; only failing to list the
/// directory aborts a run.
use crate::category_index::ExtensionIndex;
use crate::classifier::{Decision, FileEntry, decide};
use crate::config::CompiledFilters;
use crate::report::{ItemRecord, Outcome, RunStatistics};
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Errors that abort an organization run.
#[derive(Debug)]
pub enum OrganizeError {
    /// The target directory, or one of its entries, could not be read.
    ScanFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ScanFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ScanFailed { source, .. } => Some(source),
        }
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Sorts the files of one directory into category subdirectories.
///
/// # Examples
///
/// ```no_run
/// use dirsort::category_index::{CategoryMapping, build_index};
/// use dirsort::file_organizer::Organizer;
/// use std::path::Path;
///
/// let index = build_index(&CategoryMapping::default());
/// let stats = Organizer::new(Path::new("/home/user/Downloads"), &index)
///     .dry_run(true)
///     .run()
///     .expect("directory is readable");
/// println!("{} files would be moved", stats.moved);
/// ```
pub struct Organizer<'a> {
    target: &'a Path,
    index: &'a ExtensionIndex,
    filters: CompiledFilters,
    dry_run: bool,
}

impl<'a> Organizer<'a> {
    /// Creates an organizer for `target` that moves files for real and
    /// excludes nothing.
    pub fn new(target: &'a Path, index: &'a ExtensionIndex) -> Self {
        Self {
            target,
            index,
            filters: CompiledFilters::default(),
            dry_run: false,
        }
    }

    /// In a dry run no folder is created and no file is moved.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn filters(mut self, filters: CompiledFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Lists the immediate children of the target directory.
    ///
    /// The order is whatever the platform's directory listing yields.
    pub fn scan(&self) -> OrganizeResult<Vec<FileEntry>> {
        let scan_failed = |source| OrganizeError::ScanFailed {
            path: self.target.to_path_buf(),
            source,
        };

        fs::read_dir(self.target)
            .map_err(scan_failed)?
            .map(|entry| {
                entry
                    .and_then(|entry| FileEntry::from_dir_entry(&entry))
                    .map_err(scan_failed)
            })
            .collect()
    }

    /// Scans and organizes the target directory.
    pub fn run(&self) -> OrganizeResult<RunStatistics> {
        let entries = self.scan()?;
        Ok(self.organize_entries(&entries, |_| {}))
    }

    /// Processes scanned entries one at a time, reporting each to `on_item`.
    pub fn organize_entries<F>(&self, entries: &[FileEntry], mut on_item: F) -> RunStatistics
    where
        F: FnMut(&ItemRecord),
    {
        let mut stats = RunStatistics::default();
        for entry in entries {
            let record = self.process(entry);
            stats.record(&record.outcome);
            on_item(&record);
        }
        stats
    }

    /// Decides and, unless skipped, relocates a single entry.
    pub fn process(&self, entry: &FileEntry) -> ItemRecord {
        match decide(entry, self.index, &self.filters) {
            Decision::Skip(outcome) => ItemRecord {
                name: entry.name.clone(),
                category: None,
                outcome,
            },
            Decision::Relocate { category } => {
                let outcome = self.relocate(entry, &category);
                ItemRecord {
                    name: entry.name.clone(),
                    category: Some(category),
                    outcome,
                }
            }
        }
    }

    fn relocate(&self, entry: &FileEntry, category: &str) -> Outcome {
        let category_path = self.target.join(category);

        if !is_single_folder_name(category) {
            return Outcome::FailedCreate {
                directory: category_path,
                reason: format!("invalid category name '{}'", category),
            };
        }

        if !self.dry_run
            && let Err(e) = ensure_directory(&category_path)
        {
            return Outcome::FailedCreate {
                directory: category_path,
                reason: e.to_string(),
            };
        }

        let destination = category_path.join(&entry.name);

        // A dangling symlink still occupies the name.
        if fs::symlink_metadata(&destination).is_ok() {
            return Outcome::SkippedConflict { destination };
        }

        if self.dry_run {
            return Outcome::Simulated { destination };
        }

        let source = self.target.join(&entry.name);
        match move_file(&source, &destination) {
            Ok(()) => Outcome::Moved { destination },
            Err(e) if e.kind() == ErrorKind::PermissionDenied => Outcome::FailedPermission {
                destination,
                reason: e.to_string(),
            },
            Err(e) => Outcome::FailedOther {
                destination,
                reason: e.to_string(),
            },
        }
    }
}

/// Organizes `target` using `index`, with no exclusion rules.
pub fn organize(
    target: &Path,
    index: &ExtensionIndex,
    dry_run: bool,
) -> OrganizeResult<RunStatistics> {
    Organizer::new(target, index).dry_run(dry_run).run()
}

/// True if `name` is one plain path component, so that joining it onto the
/// target stays inside the target.
fn is_single_folder_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Creates a directory unless one is already there.
///
/// Only the last path component is created. An existing non-directory at
/// `path` is an error.
fn ensure_directory(path: &Path) -> std::io::Result<()> {
    match fs::create_dir(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(e) => Err(e),
    }
}

/// Renames `source` to `destination`, copying across filesystems if needed.
fn move_file(source: &Path, destination: &Path) -> std::io::Result<()> {
    match fs::rename(source, destination) {
        Err(e) if e.kind() == ErrorKind::CrossesDevices => copy_then_remove(source, destination),
        result => result,
    }
}

/// Copies `source` to `destination` and removes `source`.
///
/// On any failure the copy at `destination` is removed again, so a later run
/// does not mistake a partial file for a conflict.
fn copy_then_remove(source: &Path, destination: &Path) -> std::io::Result<()> {
    if let Err(e) = fs::copy(source, destination) {
        let _ = fs::remove_file(destination);
        return Err(e);
    }
    if let Err(e) = fs::remove_file(source) {
        let _ = fs::remove_file(destination);
        return Err(e);
    }
    Ok(())
}
