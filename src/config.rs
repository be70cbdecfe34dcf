//! Configuration to acknowledge developer preferences as well as set defaults.
//!
//! Specifically, we try to find a sectionize.toml, and if present we load settings from there.
//! This provides the root section toggle, the metadata key names and static section properties.

use crate::options::{SectionizeOptions, DEFAULT_ID_PROPERTY_NAME, DEFAULT_RANK_PROPERTY_NAME};
use facet::Facet;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;

/// File looked up in the working directory when no config path is given.
pub const CONFIG_FILE: &str = "sectionize.toml";

#[derive(Debug, Error)]
/// Failures loading a config file.
pub enum ConfigError {
    #[error("failed to read config file at {path}: {source}")]
    /// The file exists but could not be read, or an explicit path is missing.
    Read {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    #[error("failed to parse config file at {path}: {message}")]
    /// The file is not valid TOML for [`Config`].
    Parse {
        /// Config file path.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },
}

#[derive(Facet, Clone, Debug)]
/// User preferences loaded from sectionize.toml or falling back to defaults.
pub struct Config {
    #[facet(default = false)]
    /// Emit the rank-0 root section as the single output node.
    pub enable_root_section: bool,
    #[facet(default = DEFAULT_RANK_PROPERTY_NAME.to_string())]
    /// Metadata key holding a section's rank.
    pub rank_property_name: String,
    #[facet(default = DEFAULT_ID_PROPERTY_NAME.to_string())]
    /// Metadata key holding a section's promoted identifier.
    pub id_property_name: String,
    #[facet(default = HashMap::new())]
    /// Static string properties merged into every section.
    pub properties: HashMap<String, String>,
}

impl Config {
    /// Load configuration from `path`, or from sectionize.toml if present.
    ///
    /// A missing sectionize.toml falls back to defaults; a missing explicit path does not.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(CONFIG_FILE), false),
        };
        match fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents, &path),
            Err(err) if !required && err.kind() == io::ErrorKind::NotFound => {
                Self::parse("", &path)
            }
            Err(source) => Err(ConfigError::Read { path, source }),
        }
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        facet_toml::from_str::<Self>(contents).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    #[must_use]
    /// Sectionizer options described by this configuration.
    pub fn to_options(&self) -> SectionizeOptions {
        SectionizeOptions {
            properties: self
                .properties
                .iter()
                .map(|(key, value)| (key.clone(), Value::from(value.as_str())))
                .collect(),
            enable_root_section: self.enable_root_section,
            rank_property_name: self.rank_property_name.clone(),
            id_property_name: self.id_property_name.clone(),
        }
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
