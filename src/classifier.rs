//! Per-entry classification.
//!
//! Everything here is pure: given a [`FileEntry`], the [`ExtensionIndex`] and
//! the exclusion filters, [`decide`] says whether the entry is left alone (and
//! why) or which category folder it belongs in. No filesystem access happens
//! until the organizer acts on the decision.

use crate::category_index::{ExtensionIndex, normalize_extension};
use crate::config::CompiledFilters;
use crate::report::Outcome;
use std::fs::DirEntry;
use std::io;
use std::path::{Path, PathBuf};

/// Category used for extensions that no configured category claims.
pub const FALLBACK_CATEGORY: &str = "Other";

/// Returns the category folder for an extension.
///
/// The extension is normalized before lookup, so `".PDF"` and `".pdf"`
/// classify the same way. Unknown extensions fall back to
/// [`FALLBACK_CATEGORY`].
///
/// # Examples
///
/// ```
/// use dirsort::category_index::{CategoryMapping, build_index};
/// use dirsort::classifier::classify;
///
/// let index = build_index(&CategoryMapping::default());
/// assert_eq!(classify(".PDF", &index), "Documents");
/// assert_eq!(classify(".unknown", &index), "Other");
/// ```
pub fn classify<'a>(extension: &str, index: &'a ExtensionIndex) -> &'a str {
    index
        .get(&normalize_extension(extension))
        .unwrap_or(FALLBACK_CATEGORY)
}

/// One immediate child of the target directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// The entry's file name.
    pub name: String,
    /// Full path to the entry.
    pub path: PathBuf,
    /// Lowercase extension including the leading dot, or empty.
    pub extension: String,
    pub is_dir: bool,
    pub is_hidden: bool,
}

impl FileEntry {
    /// Builds an entry from its name alone, without touching the filesystem.
    pub fn new(name: impl Into<String>, is_dir: bool) -> Self {
        let name = name.into();
        Self {
            path: PathBuf::from(&name),
            extension: extension_of(&name),
            is_hidden: name.starts_with('.'),
            is_dir,
            name,
        }
    }

    /// Builds an entry from a directory listing result.
    ///
    /// Symlinks are followed when deciding whether the entry is a directory.
    pub fn from_dir_entry(entry: &DirEntry) -> io::Result<Self> {
        let path = entry.path();
        let file_type = entry.file_type()?;
        let is_dir = file_type.is_dir() || (file_type.is_symlink() && path.is_dir());
        let name = entry.file_name().to_string_lossy().to_string();

        Ok(Self {
            path,
            ..Self::new(name, is_dir)
        })
    }
}

/// Lowercase final suffix of a file name, with its leading dot.
///
/// Names without a dot, ending in a dot, or consisting of a leading dot and
/// no other have no extension.
///
/// ```
/// use dirsort::classifier::extension_of;
///
/// assert_eq!(extension_of("Report.PDF"), ".pdf");
/// assert_eq!(extension_of("backup.tar.gz"), ".gz");
/// assert_eq!(extension_of("notes"), "");
/// assert_eq!(extension_of(".bashrc"), "");
/// ```
pub fn extension_of(name: &str) -> String {
    match Path::new(name).extension() {
        Some(ext) if !ext.is_empty() => format!(".{}", ext.to_string_lossy().to_lowercase()),
        _ => String::new(),
    }
}

/// What should happen to a single entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Leave the entry in place; the outcome names the reason.
    Skip(Outcome),
    /// Move the entry into the named category folder.
    Relocate { category: String },
}

/// Decides the fate of an entry without touching the filesystem.
///
/// Rules are applied in order: directories, hidden entries, configured
/// exclusions, entries without an extension. Anything left is classified.
pub fn decide(entry: &FileEntry, index: &ExtensionIndex, filters: &CompiledFilters) -> Decision {
    if entry.is_dir {
        return Decision::Skip(Outcome::SkippedDirectory);
    }
    if entry.is_hidden {
        return Decision::Skip(Outcome::SkippedHidden);
    }
    if filters.is_excluded(&entry.name) {
        return Decision::Skip(Outcome::SkippedExcluded);
    }
    if entry.extension.is_empty() {
        return Decision::Skip(Outcome::SkippedNoExtension);
    }

    Decision::Relocate {
        category: classify(&entry.extension, index).to_string(),
    }
}
