//! Context registry: rendering contexts keyed by type.

use std::fmt;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use serde_json::Value;

use msgrender_core::{ContextDefinition, ContextDescriptor, Fetcher, Rendered, Template};

use crate::batch::RenderingIterator;
use crate::context::{RenderOptions, RenderingContext};
use crate::cursor::RecordCursor;
use crate::error::RegistryError;

/// Anything [`ContextRegistry::set_contexts`] can turn into a context.
pub enum ContextEntry {
    /// A ready-made context.
    Instance(RenderingContext),
    /// A code-defined context, built on registration.
    Definition(Box<dyn ContextDefinition + Send + Sync>),
    /// A declarative context.
    Descriptor(ContextDescriptor),
    /// A declarative context still in YAML form.
    Yaml(String),
}

impl ContextEntry {
    fn build(self) -> Result<RenderingContext, RegistryError> {
        let described = self.to_string();
        let malformed = |source| RegistryError::MalformedDescriptor {
            entry: described.clone(),
            source,
        };
        match self {
            ContextEntry::Instance(context) => Ok(context),
            ContextEntry::Definition(definition) => {
                RenderingContext::from_definition(definition.as_ref()).map_err(malformed)
            }
            ContextEntry::Descriptor(descriptor) => {
                RenderingContext::from_definition(&descriptor).map_err(malformed)
            }
            ContextEntry::Yaml(yaml) => ContextDescriptor::from_yaml(&yaml)
                .and_then(|descriptor| RenderingContext::from_definition(&descriptor))
                .map_err(malformed),
        }
    }
}

impl fmt::Display for ContextEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextEntry::Instance(context) => write!(f, "instance \"{}\"", context.context_type()),
            ContextEntry::Definition(definition) => {
                write!(f, "definition \"{}\"", definition.context_type())
            }
            ContextEntry::Descriptor(descriptor) => {
                write!(f, "descriptor \"{}\"", descriptor.context_type)
            }
            ContextEntry::Yaml(_) => f.write_str("YAML descriptor"),
        }
    }
}

impl From<RenderingContext> for ContextEntry {
    fn from(context: RenderingContext) -> Self {
        ContextEntry::Instance(context)
    }
}

impl From<ContextDescriptor> for ContextEntry {
    fn from(descriptor: ContextDescriptor) -> Self {
        ContextEntry::Descriptor(descriptor)
    }
}

/// Rendering contexts keyed by their type, in registration order.
#[derive(Debug, Default)]
pub struct ContextRegistry {
    contexts: IndexMap<String, Arc<RenderingContext>>,
    available_types: OnceLock<IndexMap<String, String>>,
}

impl ContextRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `context`; fails if its type is already taken.
    pub fn register(
        &mut self,
        context: impl Into<Arc<RenderingContext>>,
    ) -> Result<Arc<RenderingContext>, RegistryError> {
        let context = context.into();
        let context_type = context.context_type().to_owned();
        if self.has(&context_type) {
            return Err(RegistryError::AlreadyRegistered { context_type });
        }
        tracing::debug!(context = %context_type, "registered rendering context");
        self.contexts.insert(context_type, Arc::clone(&context));
        self.available_types = OnceLock::new();
        Ok(context)
    }

    /// Replace every registered context with `entries`.
    ///
    /// Entries are built and registered in order. On error the registry is
    /// left unchanged.
    pub fn set_contexts<I>(&mut self, entries: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = ContextEntry>,
    {
        let mut replacement = ContextRegistry::new();
        for entry in entries {
            replacement.register(entry.build()?)?;
        }
        *self = replacement;
        Ok(())
    }

    pub fn has(&self, context_type: &str) -> bool {
        self.contexts.contains_key(context_type)
    }

    pub fn get(&self, context_type: &str) -> Result<&Arc<RenderingContext>, RegistryError> {
        self.contexts
            .get(context_type)
            .ok_or_else(|| RegistryError::NotRegistered {
                context_type: context_type.to_owned(),
            })
    }

    pub fn contexts(&self) -> impl Iterator<Item = &Arc<RenderingContext>> {
        self.contexts.values()
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Type → name for every registered context.
    ///
    /// Computed on first use and kept until the registry changes.
    pub fn available_types(&self) -> &IndexMap<String, String> {
        self.available_types.get_or_init(|| {
            self.contexts
                .iter()
                .map(|(context_type, context)| (context_type.clone(), context.name().to_owned()))
                .collect()
        })
    }

    /// Render with the context registered under `context_type`.
    pub fn render(
        &self,
        context_type: &str,
        template: &Template,
        data: &Value,
    ) -> Result<Rendered, RegistryError> {
        self.render_with(context_type, template, data, RenderOptions::default())
    }

    pub fn render_with(
        &self,
        context_type: &str,
        template: &Template,
        data: &Value,
        options: RenderOptions,
    ) -> Result<Rendered, RegistryError> {
        Ok(self.get(context_type)?.render_with(template, data, options)?)
    }

    pub fn render_sample(
        &self,
        context_type: &str,
        template: &Template,
    ) -> Result<Rendered, RegistryError> {
        Ok(self.get(context_type)?.render_sample(template)?)
    }

    /// Batch-render `template` over `cursor` with the context registered
    /// under `context_type`.
    pub fn render_batch<C: RecordCursor>(
        &self,
        context_type: &str,
        template: impl Into<Template>,
        cursor: C,
        address_fetcher: Option<Fetcher>,
    ) -> Result<RenderingIterator<C>, RegistryError> {
        let context = Arc::clone(self.get(context_type)?);
        let iterator = RenderingIterator::new(cursor, context, template);
        Ok(match address_fetcher {
            Some(fetcher) => iterator.with_address_fetcher(fetcher),
            None => iterator,
        })
    }
}
