//! File organiser: sorts the files of a single directory into category
//! subfolders (`Images/`, `Documents/`, ...) based on their extension.
//!
//! The pass is non-recursive and linear. Every regular file is classified
//! through an [`ExtensionMap`] and moved into `<dir>/<Category>/<name>`.
//! A file that cannot be moved (destination exists, folder cannot be
//! created) is recorded in the [`OrganiseReport`] and the scan continues.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tidymark::organiser::{ExtensionMap, OrganiseOptions, Organiser};
//!
//! let organiser = Organiser::new(ExtensionMap::builtin(), OrganiseOptions::default());
//! let report = organiser.organise(Path::new("/home/me/Downloads")).unwrap();
//! print!("{}", report);
//! ```

pub mod category;
pub mod config;
pub mod error;
pub mod organise;
pub mod report;

pub use category::{extension_of, normalize_extension, Category, ExtensionMap};
pub use config::OrganiserConfig;
pub use error::OrganiseError;
pub use organise::{CollisionPolicy, OrganiseOptions, Organiser};
pub use report::{EntryOutcome, MoveRecord, OrganiseReport, SkipReason, SkippedFile};
