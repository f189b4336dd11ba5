//! `msgrender types`: list registered context types.

use anyhow::Result;
use clap::Args;
use tabled::{settings::Style, Table, Tabled};

use msgrender_renderer::ContextRegistry;

#[derive(Args, Debug)]
pub struct TypesArgs {}

#[derive(Tabled)]
struct TypeRow {
    #[tabled(rename = "type")]
    context_type: String,
    #[tabled(rename = "name")]
    name: String,
}

impl TypesArgs {
    pub fn run(self, registry: &ContextRegistry) -> Result<()> {
        if registry.is_empty() {
            println!("No contexts configured.");
            return Ok(());
        }
        let rows: Vec<TypeRow> = registry
            .available_types()
            .iter()
            .map(|(context_type, name)| TypeRow {
                context_type: context_type.clone(),
                name: name.clone(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}
