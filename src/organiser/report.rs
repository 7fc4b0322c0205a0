//! Per-entry outcomes and the run summary they fold into.

use super::category::Category;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// A file that was moved, or would be moved in a dry run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub file_name: String,
    pub from: PathBuf,
    pub to: PathBuf,
    pub category: Category,
}

/// Why a file was left where it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SkipReason {
    Collision { destination: PathBuf },
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub file_name: String,
    pub reason: SkipReason,
}

/// Result of processing a single directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Moved(MoveRecord),
    Skipped(SkippedFile),
}

/// Summary of one organiser run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrganiseReport {
    pub directory: PathBuf,
    pub dry_run: bool,
    /// Files moved per category. Categories with no moves are absent.
    pub moved: BTreeMap<Category, usize>,
    pub moves: Vec<MoveRecord>,
    pub skipped: Vec<SkippedFile>,
}

impl OrganiseReport {
    pub fn new(directory: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            directory: directory.into(),
            dry_run,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: EntryOutcome) {
        match outcome {
            EntryOutcome::Moved(record) => {
                *self.moved.entry(record.category).or_insert(0) += 1;
                self.moves.push(record);
            }
            EntryOutcome::Skipped(skipped) => self.skipped.push(skipped),
        }
    }

    pub fn total_moved(&self) -> usize {
        self.moves.len()
    }

    pub fn moved_in(&self, category: Category) -> usize {
        self.moved.get(&category).copied().unwrap_or(0)
    }

    pub fn collisions(&self) -> impl Iterator<Item = &SkippedFile> {
        self.skipped
            .iter()
            .filter(|s| matches!(s.reason, SkipReason::Collision { .. }))
    }

    pub fn errors(&self) -> impl Iterator<Item = &SkippedFile> {
        self.skipped
            .iter()
            .filter(|s| matches!(s.reason, SkipReason::Error { .. }))
    }
}

impl fmt::Display for OrganiseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.dry_run { "Would move" } else { "Moved" };
        writeln!(f, "Organised: {}", self.directory.display())?;
        for (category, count) in &self.moved {
            writeln!(f, "  {:<14} {}", category.dir_name(), count)?;
        }
        writeln!(
            f,
            "{} {} file(s), skipped {}",
            verb,
            self.total_moved(),
            self.skipped.len()
        )?;

        if !self.skipped.is_empty() {
            writeln!(f, "Skipped:")?;
            for skipped in &self.skipped {
                match &skipped.reason {
                    SkipReason::Collision { destination } => writeln!(
                        f,
                        "  {}: already exists at {}",
                        skipped.file_name,
                        destination.display()
                    )?,
                    SkipReason::Error { message } => {
                        writeln!(f, "  {}: {}", skipped.file_name, message)?
                    }
                }
            }
        }

        Ok(())
    }
}
