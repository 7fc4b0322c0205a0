//! File categories and the extension → category lookup table.
//!
//! The table is built once at startup and is read-only afterwards. Every
//! extension maps to exactly one category; anything not in the table
//! (including files with no extension at all) lands in [`Category::Others`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Classification bucket a file is sorted into.
///
/// The variant name doubles as the name of the subdirectory the file is
/// moved into.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Category {
    Images,
    Documents,
    Videos,
    Audio,
    Archives,
    Executables,
    Scripts,
    Presentations,
    Spreadsheets,
    TextDocs,
    Others,
}

impl Category {
    /// All categories, in lookup-table order.
    pub const ALL: [Category; 11] = [
        Category::Images,
        Category::Documents,
        Category::Videos,
        Category::Audio,
        Category::Archives,
        Category::Executables,
        Category::Scripts,
        Category::Presentations,
        Category::Spreadsheets,
        Category::TextDocs,
        Category::Others,
    ];

    /// Name of the subdirectory files of this category are moved into.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Images => "Images",
            Self::Documents => "Documents",
            Self::Videos => "Videos",
            Self::Audio => "Audio",
            Self::Archives => "Archives",
            Self::Executables => "Executables",
            Self::Scripts => "Scripts",
            Self::Presentations => "Presentations",
            Self::Spreadsheets => "Spreadsheets",
            Self::TextDocs => "TextDocs",
            Self::Others => "Others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.dir_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown category '{}'", s))
    }
}

/// Built-in extension lists. Earlier rows win when an extension is listed
/// twice (`.txt` is a Document, not a TextDoc).
const BUILTIN_TABLE: &[(Category, &[&str])] = &[
    (
        Category::Images,
        &[
            ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".webp", ".svg", ".heic",
        ],
    ),
    (
        Category::Documents,
        &[
            ".pdf", ".doc", ".docx", ".txt", ".rtf", ".odt", ".xls", ".xlsx", ".ppt", ".pptx",
            ".csv",
        ],
    ),
    (
        Category::Videos,
        &[".mp4", ".mov", ".avi", ".mkv", ".wmv", ".flv", ".webm"],
    ),
    (
        Category::Audio,
        &[".mp3", ".wav", ".aac", ".ogg", ".flac", ".m4a"],
    ),
    (Category::Archives, &[".zip", ".rar", ".tar", ".gz", ".7z"]),
    (Category::Executables, &[".exe", ".msi", ".bat", ".sh"]),
    (
        Category::Scripts,
        &[".py", ".js", ".html", ".css", ".php", ".java", ".c", ".cpp"],
    ),
    (Category::Presentations, &[".ppt", ".pptx", ".key", ".odp"]),
    (Category::Spreadsheets, &[".xls", ".xlsx", ".ods", ".csv"]),
    (Category::TextDocs, &[".txt", ".md", ".log"]),
];

/// Immutable extension → category lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionMap {
    entries: HashMap<String, Category>,
}

impl ExtensionMap {
    /// The built-in table.
    pub fn builtin() -> Self {
        let mut entries = HashMap::new();
        for (category, extensions) in BUILTIN_TABLE {
            for ext in *extensions {
                entries.entry((*ext).to_string()).or_insert(*category);
            }
        }
        Self { entries }
    }

    /// The built-in table with extra entries layered on top.
    ///
    /// Overrides replace the built-in category for the extensions they name.
    pub fn with_overrides<I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, Category)>,
    {
        let mut map = Self::builtin();
        for (ext, category) in overrides {
            let ext = normalize_extension(&ext);
            if ext.len() > 1 {
                map.entries.insert(ext, category);
            }
        }
        map
    }

    /// Classify a normalised extension (`".jpg"`). `None` means the file
    /// has no extension.
    pub fn classify(&self, extension: Option<&str>) -> Category {
        extension
            .and_then(|ext| self.entries.get(ext))
            .copied()
            .unwrap_or(Category::Others)
    }

    /// Classify a path by its file name.
    pub fn classify_path(&self, path: &Path) -> Category {
        self.classify(extension_of(path).as_deref())
    }

    /// Category registered for an extension, if any.
    pub fn get(&self, extension: &str) -> Option<Category> {
        self.entries.get(&normalize_extension(extension)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ExtensionMap {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Lower-cased extension of a path including the leading dot.
///
/// Returns `None` for names without an extension, including dotfiles like
/// `.bashrc` and names ending in a bare dot.
pub fn extension_of(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_string_lossy();
    if ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext.to_lowercase()))
}

/// Normalise a user-supplied extension: trimmed, lower-cased, dot-prefixed.
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}
