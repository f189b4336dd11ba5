//! `msgrender info <type>`: placeholder reference for template authors.

use anyhow::{Context, Result};
use clap::Args;
use tabled::{settings::Style, Table, Tabled};

use msgrender_renderer::ContextRegistry;

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Context type to describe.
    pub context_type: String,
}

#[derive(Tabled)]
struct PlaceholderRow {
    #[tabled(rename = "placeholder")]
    key: String,
    #[tabled(rename = "title")]
    title: String,
    #[tabled(rename = "description")]
    description: String,
    #[tabled(rename = "sample")]
    sample: String,
}

impl InfoArgs {
    pub fn run(self, registry: &ContextRegistry) -> Result<()> {
        let context = registry
            .get(&self.context_type)
            .with_context(|| format!("unknown context '{}'", self.context_type))?;
        println!("{} ({})", context.name(), context.context_type());

        let rows: Vec<PlaceholderRow> = context
            .placeholders_info()
            .into_iter()
            .map(|(key, info)| PlaceholderRow {
                key,
                title: info.title,
                description: info.description,
                sample: info.sample.unwrap_or_default(),
            })
            .collect();
        if rows.is_empty() {
            println!("No placeholders defined.");
            return Ok(());
        }
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}
