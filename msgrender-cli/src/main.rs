//! msgrender: render placeholder templates from the command line.
//!
//! # Usage
//!
//! ```text
//! msgrender --contexts <file> types
//! msgrender --contexts <file> info <type>
//! msgrender --contexts <file> render <type> (--text <T> | --bundle <file>) --data <file> [--allow-incomplete]
//! msgrender --contexts <file> sample <type> (--text <T> | --bundle <file>) [--allow-incomplete]
//! msgrender --contexts <file> batch <type> (--text <T> | --bundle <file>) --data <file> [--address <path>] [--keep-empty-address]
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    batch::BatchArgs,
    info::InfoArgs,
    render::{RenderArgs, SampleArgs},
    types::TypesArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "msgrender",
    version,
    about = "Render placeholder templates against JSON data",
    long_about = None,
)]
struct Cli {
    /// YAML file listing the rendering contexts.
    #[arg(long, short = 'c', global = true, default_value = "contexts.yaml")]
    contexts: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the available context types.
    Types(TypesArgs),

    /// Show the placeholders a context offers.
    Info(InfoArgs),

    /// Render a template against one JSON record.
    Render(RenderArgs),

    /// Render a template with sample values.
    Sample(SampleArgs),

    /// Render a template against every record of a JSON array.
    Batch(BatchArgs),
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let registry = commands::load_registry(&cli.contexts)?;
    match cli.command {
        Commands::Types(args) => args.run(&registry),
        Commands::Info(args) => args.run(&registry),
        Commands::Render(args) => args.run(&registry),
        Commands::Sample(args) => args.run(&registry),
        Commands::Batch(args) => args.run(&registry),
    }
}
