//! Error types for msgrender-core.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to parse a property path.
///
/// A path that parses but does not match the data is not an error; the
/// resolver reports it as an absent value instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path text is not valid property-path syntax.
    #[error("malformed property path '{path}': {reason}")]
    Malformed { path: String, reason: String },
}

/// All errors that can arise while building placeholder configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A placeholder was declared with an empty key.
    #[error("placeholder key must not be empty")]
    EmptyKey,

    /// The same placeholder key was declared twice in one context.
    #[error("placeholder '{key}' is declared more than once")]
    DuplicateKey { key: String },

    /// A declared fetcher path does not parse.
    #[error("invalid fetcher for placeholder '{key}': {source}")]
    Path {
        key: String,
        #[source]
        source: PathError,
    },

    /// Descriptor YAML could not be parsed.
    #[error("failed to parse context descriptors: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Descriptor file could not be read.
    #[error("failed to read context descriptors at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A dynamically-typed template that is neither a string nor a mapping of
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("template must be a string or a mapping of strings, got {found}")]
pub struct InvalidTemplate {
    /// What was supplied instead, e.g. `"array"` or `"member 'body': number"`.
    pub found: String,
}
