//! Domain types for placeholder configuration and templates.
//!
//! Records are plain [`serde_json::Value`]s; nothing here assumes a shape
//! beyond what a fetcher's property path asks for.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, InvalidTemplate};

// ---------------------------------------------------------------------------
// Fetcher
// ---------------------------------------------------------------------------

/// Callback signature accepted by [`Fetcher::Callback`].
pub type FetchFn = dyn Fn(&Value) -> Value + Send + Sync;

/// Strategy for obtaining a value from a record.
#[derive(Clone)]
pub enum Fetcher {
    /// A property path such as `user.name` or `[object].property`.
    Path(String),
    /// A function of the record. Its result is never treated as absent.
    Callback(Arc<FetchFn>),
}

impl Fetcher {
    pub fn path(path: impl Into<String>) -> Self {
        Fetcher::Path(path.into())
    }

    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Fetcher::Callback(Arc::new(f))
    }
}

impl fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fetcher::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Fetcher::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

impl From<&str> for Fetcher {
    fn from(s: &str) -> Self {
        Fetcher::Path(s.to_owned())
    }
}

impl From<String> for Fetcher {
    fn from(s: String) -> Self {
        Fetcher::Path(s)
    }
}

// ---------------------------------------------------------------------------
// Placeholder definitions
// ---------------------------------------------------------------------------

/// One configured placeholder. The key lives in [`Placeholders`].
#[derive(Debug, Clone)]
pub struct Placeholder {
    /// Label shown to template authors.
    pub title: String,
    pub description: String,
    pub fetcher: Fetcher,
    /// Substituted when the fetcher yields an empty value.
    pub empty: Option<String>,
    /// Substituted in sample mode.
    pub sample: Option<String>,
}

impl Placeholder {
    pub fn new(fetcher: impl Into<Fetcher>) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            fetcher: fetcher.into(),
            empty: None,
            sample: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn empty_fallback(mut self, empty: impl Into<String>) -> Self {
        self.empty = Some(empty.into());
        self
    }

    pub fn sample(mut self, sample: impl Into<String>) -> Self {
        self.sample = Some(sample.into());
        self
    }

    /// Value used in sample mode: `sample`, else `empty`, else `""`.
    pub fn sample_value(&self) -> &str {
        self.sample
            .as_deref()
            .or(self.empty.as_deref())
            .unwrap_or_default()
    }
}

/// Documentation view of a placeholder, for template editors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderInfo {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample: Option<String>,
}

impl From<&Placeholder> for PlaceholderInfo {
    fn from(p: &Placeholder) -> Self {
        Self {
            title: p.title.clone(),
            description: p.description.clone(),
            sample: p.sample.clone(),
        }
    }
}

/// Ordered placeholder configuration: key → definition.
///
/// Keys are non-empty and unique; insertion order is kept.
#[derive(Debug, Clone, Default)]
pub struct Placeholders(IndexMap<String, Placeholder>);

impl Placeholders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a placeholder, rejecting empty or already-declared keys.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        placeholder: Placeholder,
    ) -> Result<(), ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::EmptyKey);
        }
        if self.0.contains_key(&key) {
            return Err(ConfigError::DuplicateKey { key });
        }
        self.0.insert(key, placeholder);
        Ok(())
    }

    /// Chaining form of [`Placeholders::insert`].
    pub fn with(
        mut self,
        key: impl Into<String>,
        placeholder: Placeholder,
    ) -> Result<Self, ConfigError> {
        self.insert(key, placeholder)?;
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&Placeholder> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Placeholder> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keep only entries for which `keep` returns `true`, preserving order.
    pub fn filtered<F>(&self, mut keep: F) -> Placeholders
    where
        F: FnMut(&str, &Placeholder) -> bool,
    {
        Placeholders(
            self.0
                .iter()
                .filter(|(k, p)| keep(k, p))
                .map(|(k, p)| (k.clone(), p.clone()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Placeholders {
    type Item = (&'a String, &'a Placeholder);
    type IntoIter = indexmap::map::Iter<'a, String, Placeholder>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ---------------------------------------------------------------------------
// Templates and results
// ---------------------------------------------------------------------------

/// A single template string, or a named bundle rendered as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Template {
    Single(String),
    Bundle(IndexMap<String, String>),
}

impl Template {
    /// Accept a JSON string or a JSON object whose members are all strings.
    pub fn from_value(value: Value) -> Result<Self, InvalidTemplate> {
        match value {
            Value::String(text) => Ok(Template::Single(text)),
            Value::Object(map) => map
                .into_iter()
                .map(|(key, member)| match member {
                    Value::String(text) => Ok((key, text)),
                    other => Err(InvalidTemplate {
                        found: format!("member '{key}': {}", kind(&other)),
                    }),
                })
                .collect::<Result<IndexMap<_, _>, _>>()
                .map(Template::Bundle),
            other => Err(InvalidTemplate {
                found: kind(&other).to_owned(),
            }),
        }
    }

    /// All template strings, in bundle order.
    pub fn texts(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            Template::Single(text) => Box::new(std::iter::once(text.as_str())),
            Template::Bundle(map) => Box::new(map.values().map(String::as_str)),
        }
    }

    /// `true` if `needle` occurs literally in any template string.
    pub fn contains(&self, needle: &str) -> bool {
        self.texts().any(|text| text.contains(needle))
    }
}

impl From<&str> for Template {
    fn from(s: &str) -> Self {
        Template::Single(s.to_owned())
    }
}

impl From<String> for Template {
    fn from(s: String) -> Self {
        Template::Single(s)
    }
}

impl From<IndexMap<String, String>> for Template {
    fn from(map: IndexMap<String, String>) -> Self {
        Template::Bundle(map)
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Template
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(entries: [(K, V); N]) -> Self {
        Template::Bundle(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Render output; mirrors the shape of the [`Template`] it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rendered {
    Single(String),
    Bundle(IndexMap<String, String>),
}

impl Rendered {
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Rendered::Single(text) => Some(text),
            Rendered::Bundle(_) => None,
        }
    }

    pub fn as_bundle(&self) -> Option<&IndexMap<String, String>> {
        match self {
            Rendered::Single(_) => None,
            Rendered::Bundle(map) => Some(map),
        }
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rendered::Single(text) => f.write_str(text),
            Rendered::Bundle(map) => {
                for (i, (key, text)) in map.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{key}: {text}")?;
                }
                Ok(())
            }
        }
    }
}
