//! Context definitions: the capability a rendering context is built from.

use crate::error::ConfigError;
use crate::types::Placeholders;

/// Identity plus placeholder configuration for one message domain.
///
/// Implement this for code-defined contexts (where fetchers may be
/// callbacks), or use [`crate::config::ContextDescriptor`] for declarative
/// ones.
pub trait ContextDefinition {
    /// Unique machine identifier; the registry key.
    fn context_type(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Build the placeholder configuration.
    fn define_placeholders(&self) -> Result<Placeholders, ConfigError>;
}
