use std::error::Error as StdError;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;
use tracing::{info, warn};

use crate::checkpoint::{CheckpointError, CheckpointState, CheckpointStore};
use crate::config::{Config, SiteConfig};
use crate::discover::{discover_food_names, DiscoveryError};
use crate::extract::extract_food;
use crate::fetch::PageFetcher;
use crate::graph::{write_food, GraphStore};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    #[error("graph write failed for {food:?}, checkpoint left at {progress}: {source}")]
    Write {
        food: String,
        progress: usize,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

/// Totals for one invocation of [`Orchestrator::run`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub foods: usize,
    pub recipes: usize,
    pub failed_candidates: usize,
    pub processed: usize,
    pub total: usize,
}

/// Load the checkpoint, or discover the food list and persist a fresh one.
///
/// Returns the state and whether it was just created.
pub async fn ensure_checkpoint<F: PageFetcher>(
    fetcher: &F,
    site: &SiteConfig,
    store: &CheckpointStore,
) -> Result<(CheckpointState, bool), PipelineError> {
    if let Some(state) = store.load()? {
        info!(
            "Resuming from {} at {}/{}",
            store.path().display(),
            state.processed,
            state.foods.len()
        );
        return Ok((state, false));
    }

    info!("No checkpoint at {}, discovering foods", store.path().display());
    let foods = discover_food_names(fetcher, site).await?;
    let state = CheckpointState::new(foods);
    store.save(&state)?;
    info!("Checkpoint created with {} foods", state.foods.len());
    Ok((state, true))
}

/// Drives discover → load → extract/write/advance, one food at a time.
pub struct Orchestrator<F, G> {
    config: Config,
    fetcher: F,
    graph: G,
    checkpoint: CheckpointStore,
}

impl<F: PageFetcher, G: GraphStore> Orchestrator<F, G> {
    pub fn new(config: Config, fetcher: F, graph: G) -> Self {
        let checkpoint = CheckpointStore::new(config.checkpoint_path.clone());
        Self {
            config,
            fetcher,
            graph,
            checkpoint,
        }
    }

    /// Process remaining foods, at most `limit` of them.
    ///
    /// A failed graph write stops the run without advancing the checkpoint,
    /// so the same food is retried on the next run.
    pub async fn run(&mut self, limit: Option<usize>) -> Result<RunSummary, PipelineError> {
        let (mut state, _) =
            ensure_checkpoint(&self.fetcher, &self.config.site, &self.checkpoint).await?;

        let todo: Vec<String> = state
            .remaining()
            .iter()
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        let mut summary = RunSummary {
            total: state.foods.len(),
            processed: state.processed,
            ..Default::default()
        };
        if todo.is_empty() {
            info!("Nothing to do: {}/{} foods processed", state.processed, state.foods.len());
            return Ok(summary);
        }

        let pb = ProgressBar::new(todo.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg} (eta {eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );

        for name in todo {
            let t0 = Instant::now();
            pb.set_message(name.clone());
            info!(
                "Adding recipes for {} ({}/{})",
                name,
                state.processed + 1,
                state.foods.len()
            );

            let extraction = extract_food(
                &self.fetcher,
                &self.config.site,
                &name,
                self.config.max_candidates,
            )
            .await;
            match &extraction.search_error {
                Some(e) => warn!("Search failed for {} ({}), saving it without recipes", name, e),
                None if extraction.food.recipes.is_empty() => {
                    warn!("No recipes parsed for {}", name)
                }
                None => {}
            }

            if let Err(source) = write_food(&mut self.graph, &extraction.food).await {
                pb.abandon();
                return Err(PipelineError::Write {
                    food: name,
                    progress: state.processed,
                    source: source.into(),
                });
            }

            state.advance();
            self.checkpoint.save(&state)?;

            summary.foods += 1;
            summary.recipes += extraction.food.recipes.len();
            summary.failed_candidates += extraction.failures.len();
            summary.processed = state.processed;
            info!(
                "Saved {}: {} recipes, {} skipped in {:.1}s",
                name,
                extraction.food.recipes.len(),
                extraction.failures.len(),
                t0.elapsed().as_secs_f64()
            );
            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(summary)
    }

    #[cfg(test)]
    pub fn graph(&self) -> &G {
        &self.graph
    }

    #[cfg(test)]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}
