//! MetaDB generator CLI.
//!
//! Reads a BioGateway-style RDF dump tree and bulk-loads denormalized,
//! search-ready documents into MongoDB. All process parameters live here;
//! the pipeline itself only sees the resulting `RunConfig`.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use metadb_cli::{run, RunConfig};
use metadb_store::{DocumentStore, MemoryStore, MongoStore};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "metadb")]
#[command(author, version, about = "MetaDB generator: RDF dump -> search-ready document collections")]
struct Cli {
    /// Root directory of the RDF dump tree.
    #[arg(long, default_value = "uploads")]
    path: PathBuf,

    /// Bulk-writer worker count per namespace.
    #[arg(short = 't', long = "threads", default_value_t = 10)]
    threads: usize,

    /// Datastore connection address.
    #[arg(long, default_value = "mongodb://localhost:27027")]
    mongo_uri: String,

    /// Target database name.
    #[arg(long, default_value = "metadb")]
    database: String,

    /// Taxon identifiers to ingest (comma separated).
    #[arg(long, value_delimiter = ',', default_value = "9606")]
    taxa: Vec<String>,

    /// Accumulate and score without touching the datastore.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    println!("{}", "MetaDB generator started".bold());

    let store: Arc<dyn DocumentStore> = if cli.dry_run {
        println!("{}", "dry run: writing to the in-memory store".yellow());
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(MongoStore::connect(&cli.mongo_uri, &cli.database).await?)
    };

    let config = RunConfig {
        input_root: cli.path,
        workers: cli.threads,
        taxa: cli.taxa,
    };
    run(&config, store).await?;

    println!("{}", "Done!".green());
    Ok(())
}
