//! dirsort - sort a directory's files into category folders
//!
//! This library classifies the files directly inside a directory by
//! extension and moves each one into a category subfolder ("Documents",
//! "Images", ...). The extension → category mapping comes from a TOML
//! configuration file or a built-in default, and a dry-run mode reports what
//! would happen without touching the filesystem.

pub mod category_index;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod file_organizer;
pub mod output;
pub mod report;

pub use category_index::{CategoryMapping, ExtensionIndex, build_index};
pub use classifier::{FALLBACK_CATEGORY, FileEntry, classify};
pub use config::{CompiledFilters, ConfigError, DirsortConfig};
pub use file_organizer::{OrganizeError, Organizer, organize};
pub use report::{ItemRecord, Outcome, RunReport, RunStatistics};

pub use cli::{Args, RunOptions, run, run_cli};
