//! Error types for msgrender-renderer.

use indexmap::IndexMap;
use thiserror::Error;

use msgrender_core::{ConfigError, InvalidTemplate, PathError, Template};

/// Boxed error raised by a record source.
pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// All errors that can arise from rendering operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// At least one placeholder used by the template resolved to `""`.
    ///
    /// Carries the template and every resolved value so a caller can see
    /// which placeholders were missing.
    #[error("trying to render template with incomplete data (missing: {})", missing_list(.placeholders))]
    IncompleteData {
        template: Template,
        placeholders: IndexMap<String, String>,
    },

    /// The template is neither a string nor a mapping of strings.
    #[error("invalid template input: {0}")]
    InvalidInput(#[from] InvalidTemplate),

    /// A fetcher path has invalid syntax.
    #[error(transparent)]
    Path(#[from] PathError),

    /// The underlying record source failed.
    #[error("record source error: {0}")]
    Source(#[source] SourceError),
}

impl RenderError {
    /// Keys of the placeholders that resolved empty, in configuration order.
    ///
    /// Empty for every variant other than [`RenderError::IncompleteData`].
    pub fn missing(&self) -> Vec<&str> {
        match self {
            RenderError::IncompleteData { placeholders, .. } => missing_keys(placeholders),
            _ => Vec::new(),
        }
    }
}

fn missing_keys(placeholders: &IndexMap<String, String>) -> Vec<&str> {
    placeholders
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(key, _)| key.as_str())
        .collect()
}

fn missing_list(placeholders: &IndexMap<String, String>) -> String {
    missing_keys(placeholders).join(", ")
}

/// All errors that can arise from context registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A context with this type is already registered.
    #[error("message rendering context with type \"{context_type}\" has already registered")]
    AlreadyRegistered { context_type: String },

    /// No context with this type is registered.
    #[error("message rendering context with type \"{context_type}\" is not registered")]
    NotRegistered { context_type: String },

    /// A context entry could not be turned into a context.
    #[error("malformed configuration of message rendering context {entry}: {source}")]
    MalformedDescriptor {
        entry: String,
        #[source]
        source: ConfigError,
    },

    /// Rendering through the registry failed.
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}
