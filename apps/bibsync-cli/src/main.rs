//! bibsync - sync a local paper library with a remote reference manager
//!
//! Credentials and addressing come from the environment: `ZOTERO_API_KEY`,
//! `ZOTERO_LIBRARY_ID`, `ZOTERO_LIBRARY_TYPE`, `ZOTERO_COLLECTION_KEY`,
//! and `OPENALEX_MAILTO`.

use std::env;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use bibsync_core::{PaperLibrary, WorkQuery};
use openalex_client::{OpenAlexClient, OpenAlexConfig};
use zotero_client::{ZoteroClient, ZoteroConfig};

#[derive(Parser)]
#[command(name = "bibsync", about = "Sync a local paper library with a remote reference manager")]
struct Cli {
    /// Working collection key; defaults to ZOTERO_COLLECTION_KEY.
    #[arg(long, global = true)]
    collection: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pull the remote library into the local table and print the report.
    Pull,
    /// Push the local table to the remote library (pulls first).
    Push {
        /// Update existing remote items instead of skipping them.
        #[arg(long)]
        update_existing: bool,
    },
    /// Two-way sync: pull, then push.
    Sync {
        #[arg(long)]
        update_existing: bool,
    },
    /// Count search results for a query on the metadata source.
    Count {
        /// Searched text, matched against titles and abstracts.
        query: String,
    },
    /// Search the metadata source and merge the results into the table.
    Search {
        query: String,
        /// Maximum number of works to retrieve.
        #[arg(long)]
        limit: Option<usize>,
        /// Export the resulting table to this CSV file.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Pull the remote library and export it to a CSV file.
    Export { output: PathBuf },
    /// Pull the remote library and write each record's full text to a file.
    DumpFulltext {
        /// Output directory for the text files.
        #[arg(long, default_value = "./fulltexts")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let collection = cli
        .collection
        .or_else(|| env::var("ZOTERO_COLLECTION_KEY").ok())
        .filter(|key| !key.is_empty());

    let source = OpenAlexClient::new(OpenAlexConfig::from_env())?;
    let store = ZoteroClient::new(ZoteroConfig::from_env()?)?;
    let mut library = PaperLibrary::new(source, store, collection);

    match cli.command {
        Command::Pull => {
            println!("{}", library.update_from_remote()?);
        }
        Command::Push { update_existing } => {
            library.update_from_remote()?;
            println!("{}", library.push_to_remote(update_existing)?);
        }
        Command::Sync { update_existing } => {
            println!("{}", library.sync_remote(update_existing)?);
        }
        Command::Count { query } => {
            let query = WorkQuery::searching("title_and_abstract", query);
            println!("{}", library.count_search_results(&query)?);
        }
        Command::Search { query, limit, output } => {
            let query = WorkQuery::searching("title_and_abstract", query);
            let works = library.retrieve_papers(&query, limit)?;
            if works.is_empty() {
                println!("No papers found for the query");
            } else {
                println!("{}", library.add_papers(&works)?);
            }
            if let Some(path) = output {
                println!("{}", library.export_to_csv(&path)?);
            }
        }
        Command::Export { output } => {
            library.update_from_remote()?;
            println!("{}", library.export_to_csv(&output)?);
        }
        Command::DumpFulltext { out_dir } => {
            println!("{}", library.update_from_remote()?);
            fs::create_dir_all(&out_dir)?;
            let mut written = 0usize;
            for record in library.records() {
                if record.fulltext.is_empty() {
                    continue;
                }
                let title = record.title.clone().unwrap_or_else(|| record.id.clone());
                let filename = format!("{}.txt", title.replace('/', "_"));
                fs::write(out_dir.join(&filename), &record.fulltext)?;
                info!(file = %filename, "saved full text");
                written += 1;
            }
            println!("Saved {written} full texts to {}", out_dir.display());
        }
    }

    Ok(())
}
