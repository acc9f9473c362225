//! fourfold - generate connection puzzles from a JSON item pool
//!
//! Reads a JSON array of items, generates one puzzle (or a batch) and prints
//! the result as JSON on stdout. Logs go to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fourfold_common::logging::init_logging;
use fourfold_common::Item;
use fourfold_engine::{GeneratorConfigUpdate, Settings};
use tracing::info;

/// Command-line arguments for fourfold
#[derive(Parser, Debug)]
#[command(name = "fourfold")]
#[command(about = "Generate four-group connection puzzles from an item pool")]
#[command(version)]
struct Args {
    /// JSON file holding an array of items
    #[arg(short, long)]
    pool: PathBuf,

    /// Settings file (TOML)
    #[arg(short, long, env = "FOURFOLD_CONFIG")]
    config: Option<PathBuf>,

    /// Number of puzzles; more than one runs a deduplicated batch
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,

    /// Override the quality threshold (0-100)
    #[arg(long)]
    threshold: Option<f64>,

    /// Override the maximum attempts per puzzle
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let settings = Settings::load(args.config.as_deref()).context("Failed to load settings")?;
    init_logging(&settings.logging).context("Failed to initialize logging")?;

    let content = std::fs::read_to_string(&args.pool)
        .with_context(|| format!("Failed to read pool file {}", args.pool.display()))?;
    let pool: Vec<Item> = serde_json::from_str(&content).context("Pool file is not a JSON array of items")?;
    info!(items = pool.len(), path = %args.pool.display(), "Loaded item pool");

    let mut generator = settings.build_generator().context("Failed to build generator")?;
    generator.configure(&GeneratorConfigUpdate {
        quality_threshold: args.threshold,
        max_attempts: args.max_attempts,
        ..Default::default()
    });

    let output = if args.count > 1 {
        let batch = generator.generate_batch(&pool, args.count).await;
        serde_json::to_value(&batch)?
    } else {
        let result = generator
            .generate_single(&pool, None, None)
            .await
            .context("Puzzle generation failed")?;
        serde_json::to_value(&result)?
    };

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", rendered);
    Ok(())
}
