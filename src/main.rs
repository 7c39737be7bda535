mod checkpoint;
mod config;
mod discover;
mod extract;
mod fetch;
mod graph;
mod model;
mod parser;
mod pipeline;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use checkpoint::CheckpointStore;
use config::{Config, GraphConfig, SiteConfig};
use fetch::HttpFetcher;
use graph::neo4j::Neo4jStore;
use pipeline::Orchestrator;

#[derive(Parser)]
#[command(
    name = "food_graph_crawler",
    about = "Crawl 10000recipe.com into a Neo4j food/recipe graph"
)]
struct Cli {
    #[command(flatten)]
    opts: Opts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Opts {
    /// Checkpoint file (progress + food list)
    #[arg(long, global = true, env = "CRAWL_CHECKPOINT", default_value = config::DEFAULT_CHECKPOINT)]
    checkpoint: PathBuf,

    /// Recipe site root
    #[arg(long, global = true, env = "RECIPE_BASE_URL", default_value = config::DEFAULT_BASE_URL)]
    base_url: String,

    /// Recipe pages crawled per food (1-10)
    #[arg(long, global = true, default_value_t = config::MAX_CANDIDATES)]
    max_candidates: usize,

    #[arg(long, global = true, env = "NEO4J_URI", default_value = config::DEFAULT_NEO4J_URI)]
    neo4j_uri: String,

    #[arg(long, global = true, env = "NEO4J_USER", default_value = config::DEFAULT_NEO4J_USER)]
    neo4j_user: String,

    #[arg(long, global = true, env = "NEO4J_PASSWORD", default_value = config::DEFAULT_NEO4J_PASSWORD, hide_env_values = true)]
    neo4j_password: String,

    #[arg(long, global = true, env = "NEO4J_DATABASE", default_value = config::DEFAULT_NEO4J_DB)]
    neo4j_db: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover foods if needed, then crawl and ingest from the checkpoint
    Run {
        /// Max foods to process this run (default: all remaining)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Build the food list checkpoint without touching the database
    Discover,
    /// Show checkpoint progress
    Status,
}

impl Opts {
    fn into_config(self) -> anyhow::Result<Config> {
        Ok(Config {
            site: SiteConfig::new(&self.base_url)?,
            graph: GraphConfig {
                uri: self.neo4j_uri,
                user: self.neo4j_user,
                password: self.neo4j_password,
                database: self.neo4j_db,
            },
            checkpoint_path: self.checkpoint,
            max_candidates: Config::clamp_candidates(self.max_candidates),
        })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let config = cli.opts.into_config()?;

    let result = match cli.command {
        Commands::Run { limit } => {
            let fetcher = HttpFetcher::new().context("Failed to build HTTP client")?;
            let store = Neo4jStore::connect(&config.graph)
                .await
                .with_context(|| format!("Failed to connect to {}", config.graph.uri))?;
            let mut orchestrator = Orchestrator::new(config, fetcher, store);
            let summary = orchestrator.run(limit).await?;
            println!(
                "Saved {} foods ({} recipes, {} candidates skipped). Progress {}/{}.",
                summary.foods,
                summary.recipes,
                summary.failed_candidates,
                summary.processed,
                summary.total
            );
            Ok(())
        }
        Commands::Discover => {
            let fetcher = HttpFetcher::new().context("Failed to build HTTP client")?;
            let store = CheckpointStore::new(config.checkpoint_path.clone());
            let (state, created) =
                pipeline::ensure_checkpoint(&fetcher, &config.site, &store).await?;
            if created {
                println!(
                    "Wrote {} foods to {}",
                    state.foods.len(),
                    store.path().display()
                );
            } else {
                println!(
                    "Checkpoint {} already exists ({} foods), left untouched.",
                    store.path().display(),
                    state.foods.len()
                );
            }
            Ok(())
        }
        Commands::Status => {
            let store = CheckpointStore::new(config.checkpoint_path.clone());
            match store.load()? {
                None => println!(
                    "No checkpoint at {}. Run 'discover' or 'run' first.",
                    store.path().display()
                ),
                Some(state) => {
                    let total = state.foods.len();
                    println!("Checkpoint: {}", store.path().display());
                    println!("Processed: {}/{}", state.processed, total);
                    println!("Remaining: {}", state.remaining().len());
                    if let Some(next) = state.remaining().first() {
                        println!("Next:      {}", next);
                    }
                }
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
