//! Options controlling how sections are synthesized.
//!
//! Every field is optional when deserialized: a partial mapping such as
//! `{"enableRootSection": true}` normalizes to the defaults for the rest.

use crate::sectionize::SectionizeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Default metadata key for a section's rank.
pub const DEFAULT_RANK_PROPERTY_NAME: &str = "dataHeadingRank";
/// Default metadata key for a section's promoted identifier.
pub const DEFAULT_ID_PROPERTY_NAME: &str = "ariaLabelledby";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Sectionizer configuration.
pub struct SectionizeOptions {
    /// Static properties merged into every section's metadata.
    pub properties: BTreeMap<String, Value>,
    /// Emit the rank-0 root section as the single output node.
    pub enable_root_section: bool,
    /// Metadata key holding a section's rank. Reserved: may not appear in `properties`.
    pub rank_property_name: String,
    /// Metadata key holding a section's promoted identifier.
    pub id_property_name: String,
}

impl Default for SectionizeOptions {
    fn default() -> Self {
        Self {
            properties: BTreeMap::new(),
            enable_root_section: false,
            rank_property_name: DEFAULT_RANK_PROPERTY_NAME.to_string(),
            id_property_name: DEFAULT_ID_PROPERTY_NAME.to_string(),
        }
    }
}

impl SectionizeOptions {
    #[must_use]
    /// Set a static property merged into every section.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    #[must_use]
    /// Keep the root section as the single output node.
    pub fn with_root_section(mut self, enabled: bool) -> Self {
        self.enable_root_section = enabled;
        self
    }

    /// Check the options before any input is processed.
    ///
    /// # Errors
    ///
    /// Returns [`SectionizeError::ReservedRankProperty`] if `properties` contains the
    /// rank key.
    pub fn validate(&self) -> Result<(), SectionizeError> {
        if self.properties.contains_key(&self.rank_property_name) {
            return Err(SectionizeError::ReservedRankProperty {
                key: self.rank_property_name.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/options.rs"]
mod tests;
