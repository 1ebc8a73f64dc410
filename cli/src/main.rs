//! Chronicle command line
//!
//! Usage:
//!   chronicle normalize --model timeline < timeline.json
//!   chronicle schema --model mdto
//!   chronicle assemble --store ./timelines --term "box 3" --input documents.json
//!   chronicle list --store ./timelines

use anyhow::{Context, Result};
use chronicle_cli::{Model, assemble, list, read_json};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "chronicle")]
#[command(about = "Normalise Chronicle records and assemble timelines")]
struct Args {
    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a record and print its canonical tree
    Normalize {
        #[arg(short, long, value_enum)]
        model: Model,

        /// JSON file to read (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Print a record type's fields and date/time rules
    Schema {
        #[arg(short, long, value_enum)]
        model: Model,
    },
    /// Build a timeline from processed documents and store it
    Assemble {
        /// Directory holding stored timelines
        #[arg(short, long)]
        store: PathBuf,

        /// Search term; the first non-empty one names the timeline
        #[arg(short, long = "term")]
        terms: Vec<String>,

        /// JSON array of processed documents (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// List stored timelines
    List {
        #[arg(short, long)]
        store: PathBuf,

        #[arg(short, long, default_value = "100")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    match args.command {
        Command::Normalize { model, input } => {
            let tree = model.normalize(&read_json(input.as_deref())?)?;
            println!("{}", serde_json::to_string_pretty(&tree)?);
        }
        Command::Schema { model } => {
            println!("{}", serde_json::to_string_pretty(&model.schema_summary())?);
        }
        Command::Assemble { store, terms, input } => {
            let documents = read_json(input.as_deref())?;
            let published = assemble(&store, &terms, &documents)
                .with_context(|| format!("Failed to assemble timeline in {}", store.display()))?;
            info!("Stored timeline {}", published.identifier);
            println!(
                "{} ({}): {} documents",
                published.name, published.identifier, published.documents_count
            );
        }
        Command::List { store, limit } => {
            for (identifier, name, count) in list(&store, limit)? {
                println!("{identifier}  {name}  ({count} documents)");
            }
        }
    }
    Ok(())
}
