//! Error types for the file organiser

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrganiseError {
    /// Target directory is missing, not a directory, or unreadable. Fatal.
    #[error("Cannot organise '{}': {reason}", .path.display())]
    Path { path: PathBuf, reason: String },

    /// Destination file already exists. Recovered per file.
    #[error("Destination already exists: {}", .destination.display())]
    Collision { destination: PathBuf },

    #[error("Failed to create folder '{}': {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to move '{}' to '{}': {source}", .from.display(), .to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Invalid or unreadable organiser configuration. Fatal.
    #[error("Configuration error: {0}")]
    Config(String),
}
