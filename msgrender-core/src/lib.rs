//! msgrender core library: placeholder model, value resolution, errors.
//!
//! - [`types`]: [`Placeholder`], [`Placeholders`], [`Fetcher`], [`Template`], [`Rendered`]
//! - [`path`]: property-path parsing and lookup
//! - [`fetcher`]: resolve a fetcher against a record
//! - [`definition`]: the [`ContextDefinition`] capability
//! - [`config`]: YAML context descriptors
//! - [`error`]: [`PathError`], [`ConfigError`], [`InvalidTemplate`]

pub mod config;
pub mod definition;
pub mod error;
pub mod fetcher;
pub mod path;
pub mod types;

pub use config::{load_descriptors, parse_descriptors, ContextDescriptor, PlaceholderSpec};
pub use definition::ContextDefinition;
pub use error::{ConfigError, InvalidTemplate, PathError};
pub use fetcher::{resolve, resolve_text, to_text};
pub use path::PropertyPath;
pub use types::{Fetcher, Placeholder, PlaceholderInfo, Placeholders, Rendered, Template};
