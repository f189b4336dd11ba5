//! `msgrender batch`: render one template per record of a JSON array.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{json, Value};

use msgrender_core::Fetcher;
use msgrender_renderer::{ContextRegistry, PagedCursor};

use super::{read_json, TemplateArgs};

/// Arguments for `msgrender batch`.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Context type to render with.
    pub context_type: String,

    #[command(flatten)]
    pub template: TemplateArgs,

    /// JSON file holding an array of records.
    #[arg(long, short = 'd', value_name = "FILE")]
    pub data: PathBuf,

    /// Property path of each record's address; records are keyed by it.
    #[arg(long, short = 'a', value_name = "PATH")]
    pub address: Option<String>,

    /// Keep records whose address is empty.
    #[arg(long, requires = "address")]
    pub keep_empty_address: bool,
}

impl BatchArgs {
    pub fn run(self, registry: &ContextRegistry) -> Result<()> {
        let template = self.template.load()?;
        let records = match read_json(&self.data)? {
            Value::Array(records) => records,
            _ => anyhow::bail!("{} must hold a JSON array of records", self.data.display()),
        };
        let total = records.len();

        let batch = registry
            .render_batch(
                &self.context_type,
                template,
                PagedCursor::new(records),
                self.address.map(Fetcher::from),
            )
            .with_context(|| format!("unknown context '{}'", self.context_type))?
            .with_skip_empty_address(!self.keep_empty_address);

        let mut rendered = 0;
        for item in batch {
            let (key, message) = item.context("batch render failed")?;
            println!("{}", json!({ "key": key, "message": message }));
            rendered += 1;
        }
        tracing::info!(rendered, skipped = total - rendered, "batch finished");
        Ok(())
    }
}
