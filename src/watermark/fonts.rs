//! Font lookup on the host.
//!
//! Fonts are found by file name under the usual system and per-user font
//! directories. A requested font that cannot be found is an error; no
//! other font is substituted for it.

use super::WatermarkError;
use ab_glyph::FontArc;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Fonts tried in order when no font is requested.
pub const DEFAULT_FONT_CANDIDATES: &[&str] = &[
    "DejaVuSans-Bold",
    "DejaVuSans",
    "Arial",
    "LiberationSans-Regular",
    "Helvetica",
];

const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc"];

/// Font directories are shallow; this keeps a stray symlink from walking
/// the whole disk.
const MAX_SEARCH_DEPTH: usize = 6;

/// Case-insensitive key used to match font names against file stems.
///
/// `"DejaVu Sans-Bold.ttf"` and `"dejavusansbold"` give the same key.
pub fn normalize_font_name(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let stem = FONT_EXTENSIONS
        .iter()
        .find_map(|ext| lower.strip_suffix(&format!(".{}", ext)))
        .unwrap_or(&lower);

    stem.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .collect()
}

/// Directories searched by [`FontResolver::system`], most specific first.
pub fn system_font_dirs() -> Vec<PathBuf> {
    let mut dirs_found = Vec::new();

    if let Some(dir) = dirs::font_dir() {
        dirs_found.push(dir);
    }
    if let Some(home) = dirs::home_dir() {
        dirs_found.push(home.join(".fonts"));
    }

    #[cfg(target_os = "linux")]
    {
        dirs_found.push(PathBuf::from("/usr/local/share/fonts"));
        dirs_found.push(PathBuf::from("/usr/share/fonts"));
    }

    #[cfg(target_os = "macos")]
    {
        dirs_found.push(PathBuf::from("/Library/Fonts"));
        dirs_found.push(PathBuf::from("/System/Library/Fonts"));
        dirs_found.push(PathBuf::from("/System/Library/Fonts/Supplemental"));
    }

    #[cfg(target_os = "windows")]
    {
        let windir = std::env::var_os("WINDIR").unwrap_or_else(|| "C:\\Windows".into());
        dirs_found.push(PathBuf::from(windir).join("Fonts"));
    }

    dirs_found
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| FONT_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Finds and loads fonts by name.
#[derive(Debug, Clone)]
pub struct FontResolver {
    search_dirs: Vec<PathBuf>,
}

impl FontResolver {
    pub fn new(search_dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs }
    }

    pub fn system() -> Self {
        Self::new(system_font_dirs())
    }

    /// Path of the first font file whose stem matches `name`.
    ///
    /// Directories are searched in order; within one directory files are
    /// visited in name order.
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        let wanted = normalize_font_name(name);
        if wanted.is_empty() {
            return None;
        }

        self.search_dirs
            .iter()
            .filter(|dir| dir.is_dir())
            .find_map(|dir| {
                WalkDir::new(dir)
                    .max_depth(MAX_SEARCH_DEPTH)
                    .follow_links(true)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file() && is_font_file(e.path()))
                    .find(|e| {
                        e.path()
                            .file_stem()
                            .and_then(|s| s.to_str())
                            .map(|s| normalize_font_name(s) == wanted)
                            .unwrap_or(false)
                    })
                    .map(|e| e.into_path())
            })
    }

    /// Load a font by file path or name, or the first default candidate
    /// when `name` is `None`.
    pub fn resolve(&self, name: Option<&str>) -> Result<FontArc, WatermarkError> {
        match name {
            Some(name) => {
                let direct = Path::new(name);
                if direct.is_file() {
                    return Self::load(direct);
                }

                let path = self.locate(name).ok_or_else(|| WatermarkError::FontNotFound {
                    name: name.to_string(),
                })?;
                Self::load(&path)
            }
            None => {
                for candidate in DEFAULT_FONT_CANDIDATES {
                    if let Some(path) = self.locate(candidate) {
                        match Self::load(&path) {
                            Ok(font) => return Ok(font),
                            Err(e) => debug!(font = %path.display(), error = %e, "Skipping unusable default font"),
                        }
                    }
                }
                Err(WatermarkError::FontNotFound {
                    name: format!("default ({})", DEFAULT_FONT_CANDIDATES.join(", ")),
                })
            }
        }
    }

    /// Load a font file. Unreadable or malformed files count as not found.
    pub fn load(path: &Path) -> Result<FontArc, WatermarkError> {
        let not_found = |reason: String| WatermarkError::FontNotFound {
            name: format!("{} ({})", path.display(), reason),
        };

        let data = std::fs::read(path).map_err(|e| not_found(e.to_string()))?;
        let font = FontArc::try_from_vec(data).map_err(|e| not_found(e.to_string()))?;

        debug!(font = %path.display(), "Loaded font");
        Ok(font)
    }
}

impl Default for FontResolver {
    fn default() -> Self {
        Self::system()
    }
}
