//! `msgrender render` and `msgrender sample`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use msgrender_core::Rendered;
use msgrender_renderer::{ContextRegistry, RegistryError, RenderOptions};

use super::{read_json, report_missing, TemplateArgs};

/// Arguments for `msgrender render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Context type to render with.
    pub context_type: String,

    #[command(flatten)]
    pub template: TemplateArgs,

    /// JSON file holding the record.
    #[arg(long, short = 'd', value_name = "FILE")]
    pub data: PathBuf,

    /// Substitute empty values instead of failing.
    #[arg(long)]
    pub allow_incomplete: bool,
}

impl RenderArgs {
    pub fn run(self, registry: &ContextRegistry) -> Result<()> {
        let template = self.template.load()?;
        let record = read_json(&self.data)?;
        let options = RenderOptions {
            allow_incomplete: self.allow_incomplete,
        };
        let rendered = registry
            .render_with(&self.context_type, &template, &record, options)
            .inspect_err(report_missing)
            .with_context(|| format!("render failed for context '{}'", self.context_type))?;
        print_rendered(&rendered)
    }
}

/// Arguments for `msgrender sample`.
#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Context type to render with.
    pub context_type: String,

    #[command(flatten)]
    pub template: TemplateArgs,

    /// Substitute empty values instead of failing.
    #[arg(long)]
    pub allow_incomplete: bool,
}

impl SampleArgs {
    pub fn run(self, registry: &ContextRegistry) -> Result<()> {
        let template = self.template.load()?;
        let options = RenderOptions {
            allow_incomplete: self.allow_incomplete,
        };
        let context = registry
            .get(&self.context_type)
            .with_context(|| format!("unknown context '{}'", self.context_type))?;
        let rendered = context
            .render_sample_with(&template, options)
            .map_err(RegistryError::from)
            .inspect_err(report_missing)
            .with_context(|| format!("sample render failed for context '{}'", self.context_type))?;
        print_rendered(&rendered)
    }
}

/// Single templates print as text; bundles print as a JSON object.
fn print_rendered(rendered: &Rendered) -> Result<()> {
    match rendered {
        Rendered::Single(text) => println!("{text}"),
        Rendered::Bundle(_) => println!("{}", serde_json::to_string_pretty(rendered)?),
    }
    Ok(())
}
