use thiserror::Error;
use tracing::{debug, warn};

use crate::config::SiteConfig;
use crate::fetch::{FetchError, PageFetcher};
use crate::model::{Food, Recipe};
use crate::parser::{recipe, search, ParseError};

/// Why a single candidate recipe page was dropped.
#[derive(Error, Debug)]
pub enum CandidateError {
    #[error("no search result at position {0}")]
    NoCandidate(usize),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

pub enum CandidateOutcome {
    Parsed(Recipe),
    Failed {
        position: usize,
        error: CandidateError,
    },
}

/// Result of crawling one food: the recipes that parsed, plus what didn't.
pub struct Extraction {
    pub food: Food,
    pub failures: Vec<(usize, CandidateError)>,
    /// Set when the search page itself could not be fetched.
    pub search_error: Option<FetchError>,
}

impl Extraction {
    fn aggregate(name: &str, outcomes: Vec<CandidateOutcome>) -> Self {
        let mut food = Food::new(name);
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                CandidateOutcome::Parsed(r) => food.recipes.push(r),
                CandidateOutcome::Failed { position, error } => failures.push((position, error)),
            }
        }
        Self {
            food,
            failures,
            search_error: None,
        }
    }
}

/// Crawl up to `max_candidates` search results for `name`.
///
/// Never fails: a broken candidate is logged and skipped, and a broken
/// search page yields a food with no recipes.
pub async fn extract_food<F: PageFetcher>(
    fetcher: &F,
    site: &SiteConfig,
    name: &str,
    max_candidates: usize,
) -> Extraction {
    let ids = match fetcher.get(&site.search_url(name)).await {
        Ok(html) => search::parse_candidate_ids(&html),
        Err(e) => {
            let mut extraction = Extraction::aggregate(name, Vec::new());
            extraction.search_error = Some(e);
            return extraction;
        }
    };

    let mut outcomes = Vec::with_capacity(max_candidates);
    for position in 0..max_candidates {
        debug!("Crawling {}/{} recipes for {}", position + 1, max_candidates, name);
        let outcome = match fetch_candidate(fetcher, site, ids.get(position), position).await {
            Ok(recipe) => CandidateOutcome::Parsed(recipe),
            Err(error) => {
                warn!("Skipping candidate {} for {}: {}", position + 1, name, error);
                CandidateOutcome::Failed { position, error }
            }
        };
        outcomes.push(outcome);
    }

    Extraction::aggregate(name, outcomes)
}

async fn fetch_candidate<F: PageFetcher>(
    fetcher: &F,
    site: &SiteConfig,
    id: Option<&String>,
    position: usize,
) -> Result<Recipe, CandidateError> {
    let id = id.ok_or(CandidateError::NoCandidate(position))?;
    let html = fetcher.get(&site.recipe_url(id)).await?;
    Ok(recipe::parse_recipe(&html)?)
}
