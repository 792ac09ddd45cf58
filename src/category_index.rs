//! Extension lookup built from a category mapping.
//!
//! A [`CategoryMapping`] is the raw configuration: category names paired with
//! the extensions that belong to them, exactly as the user wrote them. It is
//! flattened into an [`ExtensionIndex`] whose keys are normalized extensions
//! (trimmed, lowercase, leading dot) and whose values are normalized category
//! names (trimmed, first character uppercased).
//!
//! # Examples
//!
//! ```
//! use dirsort::category_index::{CategoryMapping, build_index};
//!
//! let mapping = CategoryMapping::empty().with_category(" tools ", [".XYZ "]);
//! let index = build_index(&mapping);
//! assert_eq!(index.get(".xyz"), Some("Tools"));
//! ```
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Built-in mapping used when no configuration source is available.
const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Documents",
        &[
            ".pdf", ".doc", ".docx", ".txt", ".odt", ".rtf", ".epub", ".csv", ".xls", ".xlsx",
        ],
    ),
    (
        "Images",
        &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".ico", ".svg"],
    ),
    ("Videos", &[".mp4", ".mov", ".avi", ".mkv", ".wmv"]),
    ("Audio", &[".mp3", ".wav", ".flac", ".aac"]),
    ("Archives", &[".zip", ".rar", ".7z", ".tar", ".gz"]),
    ("Applications", &[".exe", ".dmg", ".pkg", ".msi", ".iso"]),
];

/// Raw category → extensions configuration, in declaration order.
///
/// Neither category names nor extensions are normalized here; that happens
/// when the mapping is flattened by [`build_index`]. Declaration order is kept
/// because it decides which category wins when an extension is listed twice.
///
/// `Default` yields the built-in mapping (Documents, Images, Videos, Audio,
/// Archives, Applications). Use [`CategoryMapping::empty`] for a blank one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMapping {
    entries: Vec<(String, Vec<String>)>,
}

impl CategoryMapping {
    /// Creates a mapping with no categories.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a category and returns the mapping, for building in place.
    pub fn with_category<I, S>(mut self, category: impl Into<String>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(category, extensions);
        self
    }

    /// Appends a category with its extensions.
    pub fn push<I, S>(&mut self, category: impl Into<String>, extensions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.push((
            category.into(),
            extensions.into_iter().map(Into::into).collect(),
        ));
    }

    /// Iterates over `(category, extensions)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(category, extensions)| (category.as_str(), extensions.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CategoryMapping {
    fn default() -> Self {
        DEFAULT_CATEGORIES
            .iter()
            .fold(Self::empty(), |mapping, (category, extensions)| {
                mapping.with_category(*category, extensions.iter().copied())
            })
    }
}

impl FromIterator<(String, Vec<String>)> for CategoryMapping {
    fn from_iter<T: IntoIterator<Item = (String, Vec<String>)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Serialize for CategoryMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, extensions) in &self.entries {
            map.serialize_entry(category, extensions)?;
        }
        map.end()
    }
}

struct CategoryMappingVisitor;

impl<'de> Visitor<'de> for CategoryMappingVisitor {
    type Value = CategoryMapping;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a table of category names to lists of extensions")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(entry) = access.next_entry::<String, Vec<String>>()? {
            entries.push(entry);
        }
        Ok(CategoryMapping { entries })
    }
}

impl<'de> Deserialize<'de> for CategoryMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CategoryMappingVisitor)
    }
}

/// Flattened lookup from normalized extension to normalized category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionIndex {
    by_extension: HashMap<String, String>,
    categories: Vec<String>,
}

impl ExtensionIndex {
    /// Looks up an already-normalized extension such as `".pdf"`.
    pub fn get(&self, extension: &str) -> Option<&str> {
        self.by_extension.get(extension).map(String::as_str)
    }

    /// Distinct normalized category names, in the order first declared.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Number of distinct extensions in the index.
    pub fn len(&self) -> usize {
        self.by_extension.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_extension.is_empty()
    }

    fn insert(&mut self, extension: String, category: &str) {
        if !self.categories.iter().any(|known| known == category) {
            self.categories.push(category.to_string());
        }
        self.by_extension.insert(extension, category.to_string());
    }
}

impl From<&CategoryMapping> for ExtensionIndex {
    fn from(mapping: &CategoryMapping) -> Self {
        build_index(mapping)
    }
}

/// Flattens a mapping into an [`ExtensionIndex`].
///
/// Categories are trimmed and get their first character uppercased; the rest
/// of the name is left as written. Extensions are trimmed and lowercased but
/// otherwise not validated, so an entry without a leading dot simply never
/// matches a file. When an extension is listed under several categories, the
/// one declared last wins.
pub fn build_index(mapping: &CategoryMapping) -> ExtensionIndex {
    let mut index = ExtensionIndex::default();
    for (category, extensions) in mapping.iter() {
        let category = normalize_category(category);
        for extension in extensions {
            index.insert(normalize_extension(extension), &category);
        }
    }
    index
}

/// Trims a category name and uppercases its first character.
///
/// ```
/// use dirsort::category_index::normalize_category;
///
/// assert_eq!(normalize_category(" tools "), "Tools");
/// assert_eq!(normalize_category("eBooks"), "EBooks");
/// ```
pub fn normalize_category(raw: &str) -> String {
    let mut chars = raw.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Trims and lowercases an extension.
pub fn normalize_extension(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_untidy_category_and_extension() {
        let mapping = CategoryMapping::empty().with_category(" tools ", [".XYZ "]);
        let index = build_index(&mapping);

        assert_eq!(index.get(".xyz"), Some("Tools"));
        assert_eq!(index.get(".XYZ "), None);
        assert_eq!(index.categories(), &["Tools".to_string()]);
    }

    #[test]
    fn test_category_rest_is_left_unchanged() {
        assert_eq!(normalize_category("my DOCS"), "My DOCS");
        assert_eq!(normalize_category("   "), "");
        assert_eq!(normalize_category("élan"), "Élan");
    }

    #[test]
    fn test_duplicate_extension_last_declaration_wins() {
        let mapping = CategoryMapping::empty()
            .with_category("Documents", [".csv", ".pdf"])
            .with_category("Spreadsheets", [".CSV"]);
        let index = build_index(&mapping);

        assert_eq!(index.get(".csv"), Some("Spreadsheets"));
        assert_eq!(index.get(".pdf"), Some("Documents"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_build_is_deterministic() {
        let mapping = CategoryMapping::default();
        assert_eq!(build_index(&mapping), build_index(&mapping.clone()));
    }

    #[test]
    fn test_extension_without_dot_is_kept_verbatim() {
        let mapping = CategoryMapping::empty().with_category("Notes", ["md"]);
        let index = build_index(&mapping);

        assert_eq!(index.get("md"), Some("Notes"));
        assert_eq!(index.get(".md"), None);
    }

    #[test]
    fn test_default_mapping_covers_standard_categories() {
        let index = ExtensionIndex::from(&CategoryMapping::default());

        assert_eq!(
            index.categories(),
            &["Documents", "Images", "Videos", "Audio", "Archives", "Applications"]
        );
        assert_eq!(index.get(".pdf"), Some("Documents"));
        assert_eq!(index.get(".jpg"), Some("Images"));
        assert_eq!(index.get(".mkv"), Some("Videos"));
        assert_eq!(index.get(".mp3"), Some("Audio"));
        assert_eq!(index.get(".7z"), Some("Archives"));
        assert_eq!(index.get(".iso"), Some("Applications"));
    }

    #[test]
    fn test_empty_mapping_builds_empty_index() {
        let index = build_index(&CategoryMapping::empty());
        assert!(index.is_empty());
        assert!(index.categories().is_empty());
    }

    #[test]
    fn test_deserialize_keeps_declaration_order() {
        let mapping: CategoryMapping = toml::from_str(
            r#"
            Zeta = [".z"]
            Alpha = [".a", ".z"]
            "#,
        )
        .expect("valid mapping");

        let names: Vec<&str> = mapping.iter().map(|(category, _)| category).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
        assert_eq!(build_index(&mapping).get(".z"), Some("Alpha"));
    }

    #[test]
    fn test_deserialize_rejects_non_list_extensions() {
        let result: Result<CategoryMapping, _> = toml::from_str(r#"Documents = ".pdf""#);
        assert!(result.is_err());
    }
}
