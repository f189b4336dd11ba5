pub mod batch;
pub mod info;
pub mod render;
pub mod types;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde_json::Value;

use msgrender_core::{load_descriptors, Template};
use msgrender_renderer::{ContextEntry, ContextRegistry, RegistryError, RenderError};

/// Build a registry from the descriptor file at `path`.
pub fn load_registry(path: &Path) -> Result<ContextRegistry> {
    let descriptors = load_descriptors(path)
        .with_context(|| format!("failed to load contexts from {}", path.display()))?;
    let mut registry = ContextRegistry::new();
    registry
        .set_contexts(descriptors.into_iter().map(ContextEntry::from))
        .context("invalid context configuration")?;
    Ok(registry)
}

/// Where the template comes from: inline text or a JSON bundle file.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct TemplateArgs {
    /// Template text, e.g. "Hello, %NAME%!".
    #[arg(long, short = 't')]
    pub text: Option<String>,

    /// JSON file holding a string or an object of named template strings.
    #[arg(long, short = 'b', value_name = "FILE")]
    pub bundle: Option<PathBuf>,
}

impl TemplateArgs {
    pub fn load(&self) -> Result<Template> {
        match (&self.text, &self.bundle) {
            (Some(text), _) => Ok(Template::from(text.as_str())),
            (None, Some(path)) => {
                let value = read_json(path)?;
                Template::from_value(value)
                    .with_context(|| format!("invalid template in {}", path.display()))
            }
            (None, None) => anyhow::bail!("provide --text or --bundle"),
        }
    }
}

pub fn read_json(path: &Path) -> Result<Value> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Print the missing placeholders of an incomplete-data failure to stderr.
pub fn report_missing(err: &RegistryError) {
    if let RegistryError::Render(inner @ RenderError::IncompleteData { .. }) = err {
        eprintln!("{}", "Missing placeholder values:".red().bold());
        for key in inner.missing() {
            eprintln!("  {} {}", "✗".red(), key);
        }
        eprintln!("Pass --allow-incomplete to render anyway.");
    }
}
