//! Repoload CLI - Transform the repoDB dataset into per-drug JSON documents
//!
//! # Main Commands
//!
//! ```bash
//! repoload transform full.csv       # Full pipeline: parse, revise names, group
//! repoload lookup DB00002 DB00584   # Resolve current drug names
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! repoload parse full.csv           # Just parse CSV to JSON
//! repoload group full.csv           # Group rows without name revision
//! ```

use clap::{Parser, Subcommand};
use repoload::{
    group_records, load_vocabulary, parse_csv_file, to_ndjson, transform_csv, MyChemClient,
    NameMap, RepodbDoc, TransformOptions,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "repoload")]
#[command(about = "Transform the repoDB drug repurposing CSV into per-drug documents", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse the repoDB CSV and output its rows as JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve current drug names for DrugBank identifiers
    Lookup {
        /// DrugBank identifiers (e.g. DB00002)
        #[arg(required = true)]
        ids: Vec<String>,

        /// Resolve against a local vocabulary CSV instead of the API
        #[arg(long)]
        vocab: Option<PathBuf>,

        /// Annotation service base URL
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Full pipeline: CSV → name revision → grouped documents
    Transform {
        /// Input CSV file
        input: PathBuf,

        /// Resolve names from a local vocabulary CSV instead of the API
        #[arg(long)]
        vocab: Option<PathBuf>,

        /// Annotation service base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Maximum number of ids per batch request
        #[arg(long, default_value = "1000")]
        batch_size: usize,

        /// Skip the name revision step
        #[arg(long)]
        skip_revision: bool,

        /// Output file, one JSON document per line (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Group CSV rows into documents without revising names
    Group {
        /// Input CSV file
        input: PathBuf,

        /// Output file, one JSON document per line (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(cli.verbose >= 2)
        .init();

    let result = match cli.command {
        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),

        Commands::Lookup {
            ids,
            vocab,
            base_url,
        } => cmd_lookup(&ids, vocab.as_deref(), base_url.as_deref()).await,

        Commands::Transform {
            input,
            vocab,
            base_url,
            batch_size,
            skip_revision,
            output,
        } => {
            cmd_transform(
                &input,
                vocab,
                base_url,
                batch_size,
                skip_revision,
                output.as_deref(),
            )
            .await
        }

        Commands::Group { input, output } => cmd_group(&input, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let outcome = parse_csv_file(input)?;
    eprintln!("   Encoding: {}", outcome.encoding);
    eprintln!("✅ Parsed {} rows", outcome.records.len());

    let json = serde_json::to_string_pretty(&outcome.records)?;
    write_output(&json, output)?;

    Ok(())
}

async fn cmd_lookup(
    ids: &[String],
    vocab: Option<&Path>,
    base_url: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let names: NameMap = match vocab {
        Some(path) => {
            eprintln!("📄 Loading vocabulary: {}", path.display());
            load_vocabulary(path)?
        }
        None => {
            let mut client = MyChemClient::from_env();
            if let Some(url) = base_url {
                client = client.with_base_url(url);
            }
            if let [id] = ids {
                let name = client.query_drugbank_name(id).await?;
                let mut map = NameMap::new();
                map.insert(id.clone(), name);
                map
            } else {
                client.query_drugbank_names(ids).await?
            }
        }
    };

    for id in ids {
        match names.get(id) {
            Some(Some(name)) => println!("{}\t{}", id, name),
            _ => println!("{}\tNA", id),
        }
    }

    Ok(())
}

async fn cmd_transform(
    input: &Path,
    vocab: Option<PathBuf>,
    base_url: Option<String>,
    batch_size: usize,
    skip_revision: bool,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", input.display());

    // Build options
    let options = TransformOptions {
        vocab_path: vocab,
        base_url,
        batch_size,
        skip_revision,
    };

    // Run pipeline
    let report = transform_csv(input, options).await?;

    // Display info
    eprintln!("   Encoding: {}", report.csv_info.encoding);
    eprintln!("   Rows: {}", report.csv_info.row_count);
    if !skip_revision {
        eprintln!("   Resolved names: {}/{}", report.resolved, report.looked_up);
    }

    eprintln!("\n📦 Grouped: {} drugs", report.docs.len());

    let ndjson = to_ndjson(&report.docs)?;
    write_output(&ndjson, output)?;

    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_group(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📦 Grouping: {}", input.display());

    let outcome = parse_csv_file(input)?;
    eprintln!("   {} rows", outcome.records.len());

    let docs: Vec<RepodbDoc> = group_records(outcome.records).collect();
    eprintln!("   {} drugs", docs.len());

    let ndjson = to_ndjson(&docs)?;
    write_output(&ndjson, output)?;

    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
