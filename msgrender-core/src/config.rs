//! Declarative context configuration in YAML.
//!
//! # Format
//!
//! ```yaml
//! - type: greeting
//!   name: Greeting messages
//!   placeholders:
//!     "%NAME%":
//!       title: Name
//!       description: Recipient's display name
//!       fetcher: user.name
//!       empty: (unknown)
//!       sample: Ann
//! ```
//!
//! Placeholder order in the file is kept. Fetchers are property paths; use a
//! [`ContextDefinition`] implementation for callbacks.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::definition::ContextDefinition;
use crate::error::ConfigError;
use crate::path::PropertyPath;
use crate::types::{Placeholder, Placeholders};

/// One context as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDescriptor {
    #[serde(rename = "type")]
    pub context_type: String,
    pub name: String,
    #[serde(default)]
    pub placeholders: IndexMap<String, PlaceholderSpec>,
}

/// One placeholder as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderSpec {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub fetcher: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample: Option<String>,
}

impl ContextDescriptor {
    /// Parse a single descriptor from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

impl ContextDefinition for ContextDescriptor {
    fn context_type(&self) -> &str {
        &self.context_type
    }

    fn name(&self) -> &str {
        &self.name
    }

    /// Every fetcher path is parsed here, so a malformed path fails at
    /// construction rather than at the first render.
    fn define_placeholders(&self) -> Result<Placeholders, ConfigError> {
        let mut placeholders = Placeholders::new();
        for (key, spec) in &self.placeholders {
            PropertyPath::parse(&spec.fetcher).map_err(|source| ConfigError::Path {
                key: key.clone(),
                source,
            })?;
            let mut placeholder = Placeholder::new(spec.fetcher.as_str())
                .title(spec.title.as_str())
                .description(spec.description.as_str());
            placeholder.empty = spec.empty.clone();
            placeholder.sample = spec.sample.clone();
            placeholders.insert(key.as_str(), placeholder)?;
        }
        Ok(placeholders)
    }
}

/// Parse a YAML list of descriptors.
pub fn parse_descriptors(yaml: &str) -> Result<Vec<ContextDescriptor>, ConfigError> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Read and parse a YAML list of descriptors from `path`.
pub fn load_descriptors(path: &Path) -> Result<Vec<ContextDescriptor>, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let descriptors = parse_descriptors(&contents)?;
    tracing::debug!(
        path = %path.display(),
        count = descriptors.len(),
        "loaded context descriptors"
    );
    Ok(descriptors)
}
