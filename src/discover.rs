use std::collections::HashSet;

use thiserror::Error;
use tracing::info;

use crate::config::SiteConfig;
use crate::fetch::{FetchError, PageFetcher};
use crate::parser::{listing, ParseError};

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("failed to fetch listing page: {0}")]
    Fetch(#[from] FetchError),

    #[error("failed to parse root listing: {0}")]
    Parse(#[from] ParseError),
}

/// Walk the category listing and return every food name, deduplicated in
/// first-seen order. Any failed request aborts the whole discovery.
pub async fn discover_food_names<F: PageFetcher>(
    fetcher: &F,
    site: &SiteConfig,
) -> Result<Vec<String>, DiscoveryError> {
    let root_url = site.listing_url();
    info!("Fetching category listing: {}", root_url);
    let root = fetcher.get(&root_url).await?;
    let codes = listing::parse_category_codes(&root)?;
    info!("Found {} categories", codes.len());

    let mut seen = HashSet::new();
    let mut foods = Vec::new();
    for code in &codes {
        info!("Getting food from category {}", code);
        let page = fetcher.get(&site.category_url(code)).await?;
        for name in listing::parse_food_names(&page) {
            if seen.insert(name.clone()) {
                foods.push(name);
            }
        }
    }

    info!("Discovered {} foods", foods.len());
    Ok(foods)
}
