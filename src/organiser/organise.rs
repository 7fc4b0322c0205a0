//! The organiser pass: enumerate → classify → move, once per entry.
//!
//! Only regular files directly inside the target directory are touched.
//! Subdirectories (category folders included) are never entered, so a
//! second run over an organised directory moves nothing.

use super::category::{Category, ExtensionMap};
use super::error::OrganiseError;
use super::report::{EntryOutcome, MoveRecord, OrganiseReport, SkipReason, SkippedFile};
use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};
use std::fs::{self, DirEntry};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// What to do when the destination file already exists.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Leave the file in place and report it.
    #[default]
    Skip,
    /// Move it as `<stem>_<n><ext>` using the first free `n`.
    Rename,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrganiseOptions {
    pub collision_policy: CollisionPolicy,
    /// Plan only; do not create folders or move files.
    pub dry_run: bool,
}

/// Sorts the files of one directory into category subdirectories.
#[derive(Debug, Clone, Default)]
pub struct Organiser {
    map: ExtensionMap,
    options: OrganiseOptions,
}

impl Organiser {
    pub fn new(map: ExtensionMap, options: OrganiseOptions) -> Self {
        Self { map, options }
    }

    /// Organise `directory`.
    ///
    /// Fails only if the directory itself cannot be read. Problems with
    /// individual files are recorded in the report and the scan continues.
    pub fn organise(&self, directory: &Path) -> Result<OrganiseReport, OrganiseError> {
        let entries = list_entries(directory)?;

        info!(
            directory = %directory.display(),
            entries = entries.len(),
            dry_run = self.options.dry_run,
            "Starting to organise files"
        );

        let mut report = OrganiseReport::new(directory, self.options.dry_run);
        for entry in &entries {
            if let Some(outcome) = self.process_entry(directory, entry) {
                report.record(outcome);
            }
        }

        info!(
            moved = report.total_moved(),
            skipped = report.skipped.len(),
            collisions = report.collisions().count(),
            "File organisation complete"
        );

        Ok(report)
    }

    /// Classify and move a single entry. `None` for entries that are not
    /// regular files.
    fn process_entry(&self, directory: &Path, entry: &DirEntry) -> Option<EntryOutcome> {
        let os_name = entry.file_name();
        let file_name = os_name.to_string_lossy().into_owned();

        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(e) => {
                error!(file = %file_name, error = %e, "Failed to read entry type");
                return Some(EntryOutcome::Skipped(SkippedFile {
                    file_name,
                    reason: SkipReason::Error {
                        message: e.to_string(),
                    },
                }));
            }
        };

        if file_type.is_dir() {
            debug!(name = %file_name, "Skipping directory");
            return None;
        }
        if !file_type.is_file() {
            debug!(name = %file_name, "Skipping non-regular file");
            return None;
        }

        let source = entry.path();
        let category = self.map.classify_path(&source);

        match self.move_into_category(directory, &source, &os_name, &file_name, category) {
            Ok(record) => {
                info!(
                    file = %file_name,
                    category = %category,
                    to = %record.to.display(),
                    "Moved file"
                );
                Some(EntryOutcome::Moved(record))
            }
            Err(OrganiseError::Collision { destination }) => {
                warn!(
                    file = %file_name,
                    destination = %destination.display(),
                    "Destination already exists, leaving file in place"
                );
                Some(EntryOutcome::Skipped(SkippedFile {
                    file_name,
                    reason: SkipReason::Collision { destination },
                }))
            }
            Err(e) => {
                error!(file = %file_name, error = %e, "Failed to organise file");
                Some(EntryOutcome::Skipped(SkippedFile {
                    file_name,
                    reason: SkipReason::Error {
                        message: e.to_string(),
                    },
                }))
            }
        }
    }

    fn move_into_category(
        &self,
        directory: &Path,
        source: &Path,
        os_name: &OsStr,
        file_name: &str,
        category: Category,
    ) -> Result<MoveRecord, OrganiseError> {
        let category_dir = directory.join(category.dir_name());
        self.ensure_category_dir(&category_dir)?;

        let destination = self.destination_for(&category_dir, os_name)?;

        if !self.options.dry_run {
            fs::rename(source, &destination).map_err(|e| OrganiseError::Move {
                from: source.to_path_buf(),
                to: destination.clone(),
                source: e,
            })?;
        }

        Ok(MoveRecord {
            file_name: file_name.to_string(),
            from: source.to_path_buf(),
            to: destination,
            category,
        })
    }

    /// Reuse an existing category folder or create it on demand.
    fn ensure_category_dir(&self, path: &Path) -> Result<(), OrganiseError> {
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(OrganiseError::CreateDir {
                path: path.to_path_buf(),
                source: io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "a file with this name already exists",
                ),
            }),
            Err(_) if self.options.dry_run => Ok(()),
            Err(_) => {
                fs::create_dir(path).map_err(|e| OrganiseError::CreateDir {
                    path: path.to_path_buf(),
                    source: e,
                })?;
                info!(folder = %path.display(), "Created folder");
                Ok(())
            }
        }
    }

    fn destination_for(
        &self,
        category_dir: &Path,
        file_name: &OsStr,
    ) -> Result<PathBuf, OrganiseError> {
        let candidate = category_dir.join(file_name);
        if !path_exists(&candidate) {
            return Ok(candidate);
        }

        match self.options.collision_policy {
            CollisionPolicy::Skip => Err(OrganiseError::Collision {
                destination: candidate,
            }),
            CollisionPolicy::Rename => {
                let renamed = free_name(category_dir, file_name);
                debug!(
                    file = %file_name.to_string_lossy(),
                    renamed = %renamed.display(),
                    "Destination exists, renaming"
                );
                Ok(renamed)
            }
        }
    }
}

/// First `<stem>_<n><ext>` in `dir` that does not exist yet, `n >= 1`.
///
/// Works on the raw OS name so non-UTF-8 names survive unchanged.
fn free_name(dir: &Path, file_name: &OsStr) -> PathBuf {
    let name = Path::new(file_name);
    let stem = name.file_stem().unwrap_or(file_name);
    let ext = name.extension();

    let mut counter = 1u64;
    loop {
        let mut candidate = OsString::from(stem);
        candidate.push(format!("_{}", counter));
        if let Some(ext) = ext {
            candidate.push(".");
            candidate.push(ext);
        }

        let candidate = dir.join(candidate);
        if !path_exists(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Existence check that also sees dangling symlinks.
fn path_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Entries of `directory` sorted by file name.
fn list_entries(directory: &Path) -> Result<Vec<DirEntry>, OrganiseError> {
    let path_error = |reason: String| OrganiseError::Path {
        path: directory.to_path_buf(),
        reason,
    };

    let meta = fs::metadata(directory).map_err(|e| path_error(e.to_string()))?;
    if !meta.is_dir() {
        return Err(path_error("not a directory".to_string()));
    }

    let read_dir = fs::read_dir(directory).map_err(|e| path_error(e.to_string()))?;

    let mut entries = Vec::new();
    for entry in read_dir {
        match entry {
            Ok(entry) => entries.push(entry),
            Err(e) => warn!(error = %e, "Failed to read directory entry"),
        }
    }
    entries.sort_by_key(|e| e.file_name());

    Ok(entries)
}
