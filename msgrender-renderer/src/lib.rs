//! # msgrender-renderer
//!
//! Placeholder substitution engine: resolves configured placeholders against
//! JSON records, checks completeness, and substitutes them into templates.
//!
//! ## Usage
//!
//! ```rust
//! use msgrender_core::{Placeholder, Placeholders, Template};
//! use msgrender_renderer::RenderingContext;
//! use serde_json::json;
//!
//! let placeholders = Placeholders::new()
//!     .with("%NAME%", Placeholder::new("user.name").empty_fallback("(unknown)"))
//!     .expect("valid placeholders");
//! let context = RenderingContext::new("greeting", "Greeting", placeholders);
//!
//! let out = context
//!     .render(&Template::from("Hello, %NAME%!"), &json!({ "user": { "name": "Ann" } }))
//!     .expect("complete data");
//! assert_eq!(out.to_string(), "Hello, Ann!");
//! ```

pub mod batch;
pub mod context;
pub mod cursor;
pub mod error;
pub mod registry;
pub mod substitute;

pub use batch::{RecordKey, RenderingIterator};
pub use context::{RenderOptions, RenderingContext};
pub use cursor::{PageSource, PagedCursor, RecordCursor, DEFAULT_PAGE_SIZE};
pub use error::{RegistryError, RenderError, SourceError};
pub use registry::{ContextEntry, ContextRegistry};
