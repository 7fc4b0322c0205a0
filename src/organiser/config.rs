//! Organiser configuration file.
//!
//! Optional YAML that extends the built-in extension table and sets the
//! default collision policy:
//!
//! ```yaml
//! on_collision: rename
//! extensions:
//!   Images: [".cr2", ".nef"]
//!   TextDocs: ["rst", ".txt"]
//! ```
//!
//! Entries listed here override the built-in category for that extension.
//! The file is only ever read.

use super::category::{normalize_extension, Category, ExtensionMap};
use super::error::OrganiseError;
use super::organise::CollisionPolicy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrganiserConfig {
    /// Default collision policy when the command line does not set one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_collision: Option<CollisionPolicy>,

    /// Extra extensions per category.
    #[serde(default)]
    pub extensions: BTreeMap<Category, Vec<String>>,
}

impl OrganiserConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, OrganiseError> {
        let config: OrganiserConfig =
            serde_yaml::from_str(yaml).map_err(|e| OrganiseError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, OrganiseError> {
        let yaml = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            OrganiseError::Config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_yaml(&yaml)
    }

    pub fn validate(&self) -> Result<(), OrganiseError> {
        let mut seen: HashMap<String, Category> = HashMap::new();

        for (category, extensions) in &self.extensions {
            for ext in extensions {
                let normalized = normalize_extension(ext);
                if normalized.len() < 2 {
                    return Err(OrganiseError::Config(format!(
                        "Empty extension listed under {}",
                        category
                    )));
                }
                if normalized[1..].contains(['.', '/', '\\']) {
                    return Err(OrganiseError::Config(format!(
                        "Extension '{}' under {} must be a single suffix",
                        ext, category
                    )));
                }
                if let Some(previous) = seen.insert(normalized.clone(), *category) {
                    if previous != *category {
                        return Err(OrganiseError::Config(format!(
                            "Extension '{}' is listed under both {} and {}",
                            normalized, previous, category
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Build the immutable lookup table for this configuration.
    pub fn extension_map(&self) -> ExtensionMap {
        ExtensionMap::with_overrides(self.extensions.iter().flat_map(|(category, exts)| {
            exts.iter().map(move |ext| (ext.clone(), *category))
        }))
    }
}
