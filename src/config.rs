//! Configuration file loading.
//!
//! The configuration supplies the category mapping and optional exclusion
//! rules. It is stored as TOML:
//!
//! ```toml
//! [categories]
//! Documents = [".pdf", ".txt"]
//! Images = [".jpg", ".png"]
//!
//! [exclude]
//! filenames = ["Thumbs.db"]
//! patterns = ["*.part", "~*"]
//! extensions = ["tmp"]
//! regex = []
//! ```
//!
//! Both tables are optional; a file without `[categories]` uses the built-in
//! mapping. When no usable file can be found or parsed, the built-in
//! configuration is substituted and the reason is handed back to the caller.

use crate::category_index::CategoryMapping;
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".dirsortrc.toml";

/// Errors that can occur during configuration loading.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided with the actual error reason.
    InvalidRegexPattern {
        /// The regex pattern that failed to compile.
        pattern: String,
        /// The reason why the pattern is invalid.
        reason: String,
    },
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirsortConfig {
    /// Category name → extensions. Defaults to the built-in mapping.
    #[serde(default)]
    pub categories: CategoryMapping,

    /// Entries that are never moved.
    #[serde(default)]
    pub exclude: ExcludeRules,
}

/// Rules for leaving entries where they are.
///
/// Every rule is matched against the entry's file name only, since the
/// organizer never descends into subdirectories.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExcludeRules {
    /// Exact file names (e.g. "Thumbs.db", "desktop.ini").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns (e.g. "*.part", "~*").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Extensions, with or without the leading dot, compared case-insensitively.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns (for advanced users).
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Result of [`DirsortConfig::load_or_default`].
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: DirsortConfig,
    pub filters: CompiledFilters,
    /// File the configuration was read from; `None` for the built-in one.
    pub source: Option<PathBuf>,
    /// Why the built-in configuration had to be substituted, if it was.
    pub fallback_reason: Option<ConfigError>,
}

impl LoadedConfig {
    fn builtin(fallback_reason: Option<ConfigError>) -> Self {
        Self {
            config: DirsortConfig::default(),
            filters: CompiledFilters::default(),
            source: None,
            fallback_reason,
        }
    }
}

impl DirsortConfig {
    /// Finds the configuration file to use, if any.
    ///
    /// Looks in the following order:
    /// 1. `config_path`, when provided (returned even if it does not exist)
    /// 2. `.dirsortrc.toml` in the current directory
    /// 3. `~/.config/dirsort/config.toml`
    pub fn locate(config_path: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = config_path {
            return Some(path.to_path_buf());
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("dirsort")
                .join("config.toml");
            if home_config.exists() {
                return Some(home_config);
            }
        }

        None
    }

    /// Loads and compiles the configuration, falling back to the built-in one.
    ///
    /// This never fails: a missing, unreadable or malformed file (including
    /// invalid exclusion patterns) results in the built-in configuration with
    /// `fallback_reason` set.
    pub fn load_or_default(config_path: Option<&Path>) -> LoadedConfig {
        let Some(path) = Self::locate(config_path) else {
            return LoadedConfig::builtin(None);
        };

        let loaded = Self::load_from_file(&path).and_then(|config| {
            let filters = config.exclude.compile()?;
            Ok((config, filters))
        });

        match loaded {
            Ok((config, filters)) => LoadedConfig {
                config,
                filters,
                source: Some(path),
                fallback_reason: None,
            },
            Err(e) => LoadedConfig::builtin(Some(e)),
        }
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if file does not exist.
    /// Returns `ConfigError::ConfigInvalid` if TOML parsing fails.
    /// Returns `ConfigError::IoError` if file cannot be read.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Renders the configuration back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }
}

impl ExcludeRules {
    /// Compile the rules into matchers.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob or regex pattern is invalid.
    pub fn compile(&self) -> Result<CompiledFilters, ConfigError> {
        let patterns = self
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let regexes = self
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CompiledFilters {
            filenames: self.filenames.iter().cloned().collect(),
            extensions: self
                .extensions
                .iter()
                .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
                .collect(),
            patterns,
            regexes,
        })
    }
}

/// Pre-compiled exclusion rules.
///
/// The default value excludes nothing.
#[derive(Debug, Clone, Default)]
pub struct CompiledFilters {
    filenames: HashSet<String>,
    extensions: HashSet<String>,
    patterns: Vec<Pattern>,
    regexes: Vec<Regex>,
}

impl CompiledFilters {
    /// Returns true if an entry with this name must be left in place.
    pub fn is_excluded(&self, file_name: &str) -> bool {
        if self.filenames.contains(file_name) {
            return true;
        }

        if let Some((_, ext)) = file_name.rsplit_once('.')
            && self.extensions.contains(&ext.to_lowercase())
        {
            return true;
        }

        self.patterns.iter().any(|pattern| pattern.matches(file_name))
            || self.regexes.iter().any(|regex| regex.is_match(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category_index::build_index;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("dirsort.toml");
        fs::write(&path, content).expect("Failed to write config");
        path
    }

    #[test]
    fn test_default_config_uses_builtin_mapping() {
        let config = DirsortConfig::default();
        assert_eq!(config.categories, CategoryMapping::default());
        assert!(config.exclude.filenames.is_empty());
    }

    #[test]
    fn test_load_categories_from_file() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = write_config(
            &dir,
            r#"
            [categories]
            " tools " = [".XYZ "]
            Books = [".epub"]
            "#,
        );

        let loaded = DirsortConfig::load_or_default(Some(&path));
        assert!(loaded.fallback_reason.is_none());
        assert_eq!(loaded.source.as_deref(), Some(path.as_path()));

        let index = build_index(&loaded.config.categories);
        assert_eq!(index.get(".xyz"), Some("Tools"));
        assert_eq!(index.get(".epub"), Some("Books"));
        assert_eq!(index.get(".pdf"), None);
    }

    #[test]
    fn test_missing_categories_table_means_builtin_mapping() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = write_config(&dir, "[exclude]\nfilenames = [\"Thumbs.db\"]\n");

        let loaded = DirsortConfig::load_or_default(Some(&path));
        assert!(loaded.fallback_reason.is_none());
        assert_eq!(loaded.config.categories, CategoryMapping::default());
        assert!(loaded.filters.is_excluded("Thumbs.db"));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = dir.path().join("absent.toml");

        let loaded = DirsortConfig::load_or_default(Some(&path));
        assert!(matches!(
            loaded.fallback_reason,
            Some(ConfigError::ConfigNotFound(_))
        ));
        assert!(loaded.source.is_none());
        assert_eq!(loaded.config.categories, CategoryMapping::default());
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = write_config(&dir, "[categories]\nDocuments = 42\n");

        let loaded = DirsortConfig::load_or_default(Some(&path));
        assert!(matches!(
            loaded.fallback_reason,
            Some(ConfigError::ConfigInvalid(_))
        ));
        assert_eq!(loaded.config.categories, CategoryMapping::default());
    }

    #[test]
    fn test_invalid_regex_falls_back() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = write_config(&dir, "[exclude]\nregex = [\"[invalid(\"]\n");

        let loaded = DirsortConfig::load_or_default(Some(&path));
        assert!(matches!(
            loaded.fallback_reason,
            Some(ConfigError::InvalidRegexPattern { .. })
        ));
        assert!(!loaded.filters.is_excluded("anything.txt"));
    }

    #[test]
    fn test_invalid_glob_returns_error() {
        let rules = ExcludeRules {
            patterns: vec!["[invalid".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            rules.compile(),
            Err(ConfigError::InvalidGlobPattern(_))
        ));
    }

    #[test]
    fn test_exclude_rules() {
        let rules = ExcludeRules {
            filenames: vec!["desktop.ini".to_string()],
            patterns: vec!["*.part".to_string()],
            extensions: vec![".TMP".to_string(), "bak".to_string()],
            regex: vec![r"^~\$".to_string()],
        };
        let filters = rules.compile().expect("valid rules");

        assert!(filters.is_excluded("desktop.ini"));
        assert!(filters.is_excluded("movie.mkv.part"));
        assert!(filters.is_excluded("draft.tmp"));
        assert!(filters.is_excluded("old.BAK"));
        assert!(filters.is_excluded("~$report.docx"));
        assert!(!filters.is_excluded("report.docx"));
        assert!(!filters.is_excluded("Desktop.ini"));
    }

    #[test]
    fn test_default_filters_exclude_nothing() {
        let filters = CompiledFilters::default();
        assert!(!filters.is_excluded("Thumbs.db"));
        assert!(!filters.is_excluded("a.pdf"));
    }

    #[test]
    fn test_to_toml_round_trips_category_order() {
        let config = DirsortConfig {
            categories: CategoryMapping::empty()
                .with_category("Zeta", [".z"])
                .with_category("Alpha", [".a"]),
            exclude: ExcludeRules::default(),
        };

        let rendered = config.to_toml().expect("serializable config");
        let zeta = rendered.find("Zeta").expect("Zeta rendered");
        let alpha = rendered.find("Alpha").expect("Alpha rendered");
        assert!(zeta < alpha);

        let parsed: DirsortConfig = toml::from_str(&rendered).expect("parsable output");
        assert_eq!(parsed.categories, config.categories);
    }
}
